use std::sync::Arc;

use futures::poll;
use salario_agents::{ChatRouter, OfflineRemote, RouterState};
use salario_core::replies::{
    greeting, ADD_EMPLOYEE_ACK, FIGURES_OUT_OF_RANGE, PAYSLIP_GUIDANCE, REMOTE_FALLBACK,
};
use salario_core::{Action, AppSettings, ChatRole, ConversationContext, Intent, Tab};
use salario_observability::AppMetrics;
use salario_tests::{
    sample_roster, GatedRemote, PanickingRemote, RecordingUi, ScriptedRemote, UiEvent,
};

fn router<R: salario_agents::RemoteChat>(
    remote: Arc<R>,
    ui: Arc<RecordingUi>,
) -> ChatRouter<R, RecordingUi> {
    ChatRouter::new(remote, ui, AppMetrics::shared(), "Priya")
}

#[tokio::test]
async fn savings_question_is_answered_locally() {
    let remote = Arc::new(ScriptedRemote::default());
    let ui = Arc::new(RecordingUi::default());
    let router = router(remote.clone(), ui.clone());
    let employees = sample_roster();
    let settings = AppSettings::default();
    let context = ConversationContext {
        employees: &employees,
        settings: &settings,
    };

    let response = router
        .handle_message("What about savings and efficiency?", &context)
        .await;

    assert_eq!(response.intent, Intent::Savings);
    assert!(response.response_text.contains("**₹165,000**"));
    assert!(!response.response_text.contains("Efficiency Ratio"));
    assert!(response.side_effects.is_empty());
    assert!(remote.calls().is_empty());
    assert!(ui.events().is_empty());
}

#[tokio::test]
async fn utilization_reflects_roster() {
    let remote = Arc::new(ScriptedRemote::default());
    let router = router(remote, Arc::new(RecordingUi::default()));
    let employees = sample_roster();
    let settings = AppSettings::default();
    let context = ConversationContext {
        employees: &employees,
        settings: &settings,
    };

    let response = router.handle_message("How is our UTILIZATION?", &context).await;
    assert_eq!(response.intent, Intent::Efficiency);
    assert!(response.response_text.contains("**67.0%**"));
}

#[tokio::test]
async fn payslip_request_gives_guidance_without_side_effects() {
    let ui = Arc::new(RecordingUi::default());
    let router = router(Arc::new(ScriptedRemote::default()), ui.clone());
    let settings = AppSettings::default();
    let context = ConversationContext {
        employees: &[],
        settings: &settings,
    };

    let response = router.handle_message("how do I download a payslip", &context).await;
    assert_eq!(response.response_text, PAYSLIP_GUIDANCE);
    assert!(response.side_effects.is_empty());
    assert!(ui.events().is_empty());
}

#[tokio::test]
async fn registration_navigates_then_opens_form() {
    let ui = Arc::new(RecordingUi::default());
    let remote = Arc::new(ScriptedRemote::default());
    let router = router(remote.clone(), ui.clone());
    let settings = AppSettings::default();
    let context = ConversationContext {
        employees: &[],
        settings: &settings,
    };

    let response = router
        .handle_message("please register a new employee", &context)
        .await;

    assert_eq!(response.response_text, ADD_EMPLOYEE_ACK);
    assert!(!response.response_text.is_empty());
    assert_eq!(
        response.side_effects,
        vec![Action::NavigateTo(Tab::Employees), Action::OpenAddEmployeeForm]
    );
    assert_eq!(
        ui.events(),
        vec![UiEvent::Navigate("employees"), UiEvent::OpenAddEmployeeForm]
    );
    assert!(remote.calls().is_empty());
}

#[tokio::test]
async fn open_questions_go_to_remote_verbatim() {
    let remote = Arc::new(ScriptedRemote::replying(vec![Ok(
        "You have **3** employees.\nAll are active.".to_string(),
    )]));
    let router = router(remote.clone(), Arc::new(RecordingUi::default()));
    let employees = sample_roster();
    let settings = AppSettings::default();
    let context = ConversationContext {
        employees: &employees,
        settings: &settings,
    };

    let response = router.handle_message("  Who joined LAST? ", &context).await;

    assert_eq!(response.intent, Intent::Unknown);
    assert_eq!(
        response.response_text,
        "You have **3** employees.\nAll are active."
    );
    assert_eq!(remote.calls(), vec![("  Who joined LAST? ".to_string(), 3)]);
    assert_eq!(router.state(), RouterState::Idle);
}

#[tokio::test]
async fn remote_failure_falls_back_and_router_recovers() {
    let remote = Arc::new(ScriptedRemote::replying(vec![
        Err("network unreachable".to_string()),
        Ok("Sunny in the payroll office.".to_string()),
    ]));
    let metrics = AppMetrics::shared();
    let router = ChatRouter::new(
        remote.clone(),
        Arc::new(RecordingUi::default()),
        metrics.clone(),
        "Priya",
    );
    let settings = AppSettings::default();
    let context = ConversationContext {
        employees: &[],
        settings: &settings,
    };

    let first = router
        .send_message("what's the weather", &context)
        .await
        .expect("non-blank input is handled");
    assert_eq!(first.response_text, REMOTE_FALLBACK);
    for topic in ["Savings", "Efficiency", "Navigation"] {
        assert!(first.response_text.contains(topic));
    }
    assert_eq!(router.state(), RouterState::Idle);

    let second = router
        .send_message("and tomorrow?", &context)
        .await
        .expect("router accepts the next message");
    assert_eq!(second.response_text, "Sunny in the payroll office.");
    assert_eq!(remote.calls().len(), 2);

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.remote_calls_total, 2);
    assert_eq!(snapshot.remote_fallback_total, 1);
}

#[tokio::test]
async fn offline_remote_uses_fallback() {
    let router = ChatRouter::new(
        Arc::new(OfflineRemote),
        Arc::new(RecordingUi::default()),
        AppMetrics::shared(),
        "Priya",
    );
    let settings = AppSettings::default();
    let context = ConversationContext {
        employees: &[],
        settings: &settings,
    };

    let response = router.handle_message("tell me a joke", &context).await;
    assert_eq!(response.response_text, REMOTE_FALLBACK);
}

#[tokio::test]
async fn panicking_remote_is_absorbed() {
    let router = router(Arc::new(PanickingRemote), Arc::new(RecordingUi::default()));
    let settings = AppSettings::default();
    let context = ConversationContext {
        employees: &[],
        settings: &settings,
    };

    let response = router.handle_message("what's the weather", &context).await;
    assert_eq!(response.response_text, REMOTE_FALLBACK);
    assert_eq!(router.state(), RouterState::Idle);
}

#[tokio::test]
async fn state_is_awaiting_remote_while_call_is_pending() {
    let (remote, release) = GatedRemote::new();
    let router = router(Arc::new(remote), Arc::new(RecordingUi::default()));
    let settings = AppSettings::default();
    let context = ConversationContext {
        employees: &[],
        settings: &settings,
    };

    assert_eq!(router.state(), RouterState::Idle);

    let pending = router.send_message("summarise this month", &context);
    tokio::pin!(pending);
    assert!(poll!(&mut pending).is_pending());
    assert_eq!(router.state(), RouterState::AwaitingRemote);

    release.send("All salaries processed.".to_string()).unwrap();
    let response = pending.await.expect("non-blank input is handled");

    assert_eq!(response.response_text, "All salaries processed.");
    assert_eq!(router.state(), RouterState::Idle);
}

#[tokio::test]
async fn history_is_chronological_and_skips_blank_input() {
    let remote = Arc::new(ScriptedRemote::default());
    let router = router(remote, Arc::new(RecordingUi::default()));
    let settings = AppSettings::default();
    let context = ConversationContext {
        employees: &[],
        settings: &settings,
    };

    assert!(router.send_message("   \n", &context).await.is_none());
    router.send_message("savings?", &context).await;

    let history = router.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].role, ChatRole::Model);
    assert_eq!(history[0].text, greeting("Priya"));
    assert_eq!(history[1].role, ChatRole::User);
    assert_eq!(history[1].text, "savings?");
    assert_eq!(history[2].role, ChatRole::Model);
    assert!(history[2].text.contains("savings margin"));
    assert!(history[1].at <= history[2].at);
}

#[tokio::test]
async fn misconfigured_budget_never_fails_the_turn() {
    let router = router(
        Arc::new(ScriptedRemote::default()),
        Arc::new(RecordingUi::default()),
    );
    let employees = sample_roster();
    let settings = AppSettings {
        monthly_budget: rust_decimal::Decimal::ZERO,
        ..AppSettings::default()
    };
    let context = ConversationContext {
        employees: &employees,
        settings: &settings,
    };

    let response = router.handle_message("savings", &context).await;
    assert_eq!(response.intent, Intent::Savings);
    assert!(response.response_text.contains("Settings"));
}

#[tokio::test]
async fn tiny_budget_against_huge_payroll_still_answers() {
    let router = router(
        Arc::new(ScriptedRemote::default()),
        Arc::new(RecordingUi::default()),
    );
    let mut employees = sample_roster();
    employees[0].monthly_income = rust_decimal::Decimal::from_i128_with_scale(10_i128.pow(27), 0);
    let settings = AppSettings {
        monthly_budget: rust_decimal::Decimal::new(1, 2),
        ..AppSettings::default()
    };
    let context = ConversationContext {
        employees: &employees,
        settings: &settings,
    };

    let response = router.handle_message("show efficiency", &context).await;
    assert_eq!(response.intent, Intent::Efficiency);
    assert_eq!(response.response_text, FIGURES_OUT_OF_RANGE);
    assert_eq!(router.state(), RouterState::Idle);
}
