use rust_decimal::Decimal;

use crate::error::PayrollError;
use crate::models::{Action, BudgetSummary, ChatResponse, ConversationContext, Intent, Tab};
use crate::payroll::summarize_budget;

pub const PAYSLIP_GUIDANCE: &str = "I can help with that. Please go to the 'Employees' tab to select a specific employee, or click here to generate the latest batch.";

pub const ADD_EMPLOYEE_ACK: &str = "Opening the registration form for you...";

pub const REMOTE_FALLBACK: &str = "I am currently in training mode. I can help with Savings, Efficiency stats, and Navigation. Please try one of those topics!";

pub const BUDGET_NOT_CONFIGURED: &str = "I can't work that out yet because the monthly budget is not a positive amount. Please set it under **Settings** first.";

pub const FIGURES_OUT_OF_RANGE: &str = "Those payroll figures are too large for me to compare against the monthly budget. Please check the salaries and budget under **Settings**.";

pub fn greeting(username: &str) -> String {
    format!(
        "Hello {username}! I see you are the Administrator. How can I help you with payroll today?"
    )
}

/// Answers the locally handled intents. Returns `None` for `Intent::Unknown`,
/// which the caller hands to the remote model.
pub fn compose_local_reply(intent: Intent, context: &ConversationContext<'_>) -> Option<ChatResponse> {
    let (response_text, side_effects) = match intent {
        Intent::Savings => (savings_reply(context), Vec::new()),
        Intent::Efficiency => (efficiency_reply(context), Vec::new()),
        Intent::Payslip => (PAYSLIP_GUIDANCE.to_string(), Vec::new()),
        Intent::AddEmployee => (
            ADD_EMPLOYEE_ACK.to_string(),
            vec![Action::NavigateTo(Tab::Employees), Action::OpenAddEmployeeForm],
        ),
        Intent::Unknown => return None,
    };

    Some(ChatResponse {
        response_text,
        side_effects,
        intent,
    })
}

fn savings_reply(context: &ConversationContext<'_>) -> String {
    let summary = match summarize_budget(context.employees, context.settings) {
        Ok(summary) => summary,
        Err(error) => return unavailable_reply(&error),
    };

    // remaining never exceeds the budget, so the share stays within 0..=100
    let share = summary
        .remaining_budget
        .checked_div(summary.monthly_budget)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO);
    format!(
        "Your current savings margin is **{}**, which is {:.1}% of the monthly budget.",
        context.settings.currency.format_amount(summary.remaining_budget),
        share
    )
}

fn efficiency_reply(context: &ConversationContext<'_>) -> String {
    match summarize_budget(context.employees, context.settings) {
        Ok(BudgetSummary {
            utilization_percent,
            ..
        }) => format!(
            "The Efficiency Ratio is currently at **{utilization_percent:.1}%**. Would you like to see the detailed report?"
        ),
        Err(error) => unavailable_reply(&error),
    }
}

fn unavailable_reply(error: &PayrollError) -> String {
    match error {
        PayrollError::InvalidConfiguration(_) => BUDGET_NOT_CONFIGURED.to_string(),
        _ => FIGURES_OUT_OF_RANGE.to_string(),
    }
}
