use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use parking_lot::Mutex;
use salario_core::replies::{greeting, REMOTE_FALLBACK};
use salario_core::{
    classify_intent, compose_local_reply, Action, ChatMessage, ChatResponse, ConversationContext,
    Employee, Intent,
};
use salario_observability::AppMetrics;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::remote::{RemoteChat, UiActions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouterState {
    Idle,
    AwaitingRemote,
}

/// Local-first chat dispatcher. Canned intents answer synchronously; anything
/// else goes to the remote model, whose failures are replaced by a fixed
/// fallback reply.
///
/// The host is expected to serialise sends while [`RouterState::AwaitingRemote`]
/// is reported; overlapping calls are logged but not rejected.
pub struct ChatRouter<R, U>
where
    R: RemoteChat,
    U: UiActions,
{
    remote: Arc<R>,
    ui: Arc<U>,
    metrics: Arc<AppMetrics>,
    state: Mutex<RouterState>,
    history: Mutex<Vec<ChatMessage>>,
}

impl<R, U> ChatRouter<R, U>
where
    R: RemoteChat,
    U: UiActions,
{
    pub fn new(remote: Arc<R>, ui: Arc<U>, metrics: Arc<AppMetrics>, username: &str) -> Self {
        Self {
            remote,
            ui,
            metrics,
            state: Mutex::new(RouterState::Idle),
            history: Mutex::new(vec![ChatMessage::model(greeting(username))]),
        }
    }

    pub fn state(&self) -> RouterState {
        *self.state.lock()
    }

    pub fn history(&self) -> Vec<ChatMessage> {
        self.history.lock().clone()
    }

    /// Records a user turn, routes it and records the reply. Blank input is
    /// ignored and leaves the history untouched.
    pub async fn send_message(
        &self,
        text: &str,
        context: &ConversationContext<'_>,
    ) -> Option<ChatResponse> {
        if text.trim().is_empty() {
            return None;
        }

        self.history.lock().push(ChatMessage::user(text));
        let response = self.handle_message(text, context).await;
        self.history
            .lock()
            .push(ChatMessage::model(response.response_text.clone()));

        Some(response)
    }

    #[instrument(skip(self, raw_text, context), fields(employees = context.employees.len()))]
    pub async fn handle_message(
        &self,
        raw_text: &str,
        context: &ConversationContext<'_>,
    ) -> ChatResponse {
        let started = Instant::now();
        self.metrics.inc_chat_turn();

        if self.state() == RouterState::AwaitingRemote {
            warn!("message received while a remote reply is still pending");
        }

        let intent = classify_intent(raw_text);
        let response = match compose_local_reply(intent, context) {
            Some(reply) => {
                self.metrics.inc_local_intent(intent_label(intent));
                self.dispatch(&reply.side_effects);
                reply
            }
            None => self.ask_remote(raw_text, context.employees).await,
        };

        self.metrics.observe_latency(started.elapsed());
        info!(
            intent = ?response.intent,
            side_effects = response.side_effects.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "chat handled"
        );

        response
    }

    async fn ask_remote(&self, raw_text: &str, employees: &[Employee]) -> ChatResponse {
        self.metrics.inc_remote_call();
        let _awaiting = StateGuard::enter(&self.state);

        let outcome = AssertUnwindSafe(self.remote.get_chat_response(raw_text, employees))
            .catch_unwind()
            .await;

        let response_text = match outcome {
            Ok(Ok(text)) => text,
            Ok(Err(error)) => {
                warn!(error = %error, "remote chat failed, answering with fallback");
                self.metrics.inc_remote_fallback();
                REMOTE_FALLBACK.to_string()
            }
            Err(_) => {
                warn!("remote chat panicked, answering with fallback");
                self.metrics.inc_remote_fallback();
                REMOTE_FALLBACK.to_string()
            }
        };

        ChatResponse {
            response_text,
            side_effects: Vec::new(),
            intent: Intent::Unknown,
        }
    }

    fn dispatch(&self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::NavigateTo(tab) => self.ui.navigate_to(*tab),
                Action::OpenAddEmployeeForm => self.ui.open_add_employee_form(),
            }
        }
    }
}

/// Holds `AwaitingRemote` for its lifetime and restores `Idle` on drop.
struct StateGuard<'a> {
    state: &'a Mutex<RouterState>,
}

impl<'a> StateGuard<'a> {
    fn enter(state: &'a Mutex<RouterState>) -> Self {
        *state.lock() = RouterState::AwaitingRemote;
        Self { state }
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock() = RouterState::Idle;
    }
}

fn intent_label(intent: Intent) -> &'static str {
    match intent {
        Intent::Savings => "savings",
        Intent::Efficiency => "efficiency",
        Intent::Payslip => "payslip",
        Intent::AddEmployee => "add_employee",
        Intent::Unknown => "unknown",
    }
}
