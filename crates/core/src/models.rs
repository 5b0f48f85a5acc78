use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::PayrollError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "Lead Developer")]
    LeadDeveloper,
    #[serde(rename = "Senior Engineer")]
    SeniorEngineer,
    #[serde(rename = "HR Manager")]
    HrManager,
    #[serde(rename = "Marketing Lead")]
    MarketingLead,
    #[serde(rename = "Designer")]
    Designer,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Self::LeadDeveloper,
        Self::SeniorEngineer,
        Self::HrManager,
        Self::MarketingLead,
        Self::Designer,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "lead developer" => Some(Self::LeadDeveloper),
            "senior engineer" => Some(Self::SeniorEngineer),
            "hr manager" => Some(Self::HrManager),
            "marketing lead" => Some(Self::MarketingLead),
            "designer" => Some(Self::Designer),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LeadDeveloper => "Lead Developer",
            Self::SeniorEngineer => "Senior Engineer",
            Self::HrManager => "HR Manager",
            Self::MarketingLead => "Marketing Lead",
            Self::Designer => "Designer",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmployeeStatus {
    #[default]
    Active,
    #[serde(rename = "On Leave")]
    OnLeave,
    Terminated,
}

impl EmployeeStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(['-', '_'], " ").as_str() {
            "active" => Some(Self::Active),
            "on leave" | "leave" => Some(Self::OnLeave),
            "terminated" => Some(Self::Terminated),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::OnLeave => "On Leave",
            Self::Terminated => "Terminated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub position: Position,
    pub monthly_income: Decimal,
    pub date_joined: NaiveDate,
    #[serde(default)]
    pub status: EmployeeStatus,
}

/// Fields an administrator fills in when registering or editing an employee.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployeeDraft {
    pub full_name: String,
    pub email: String,
    pub position: Position,
    pub monthly_income: Decimal,
    pub date_joined: NaiveDate,
    pub status: EmployeeStatus,
}

impl EmployeeDraft {
    pub fn validate(&self) -> Result<(), PayrollError> {
        if self.full_name.trim().is_empty() {
            return Err(PayrollError::InvalidInput(
                "employee name cannot be empty".to_string(),
            ));
        }
        if self.monthly_income < Decimal::ZERO {
            return Err(PayrollError::InvalidInput(
                "salary cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn into_employee(self, id: String) -> Employee {
        Employee {
            id,
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            position: self.position,
            monthly_income: self.monthly_income,
            date_joined: self.date_joined,
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
    Eur,
}

impl Currency {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "INR" | "₹" => Some(Self::Inr),
            "USD" | "$" => Some(Self::Usd),
            "EUR" | "€" => Some(Self::Eur),
            _ => None,
        }
    }

    pub fn as_code(self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Inr => "₹",
        }
    }

    /// Renders an amount for display: symbol, comma-grouped integer part and
    /// at most two fraction digits.
    pub fn format_amount(self, amount: Decimal) -> String {
        format!("{}{}", self.symbol(), group_thousands(amount))
    }
}

pub fn group_thousands(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (index, digit) in digits.iter().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit as char);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

pub const MAX_TAX_RATE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub monthly_budget: Decimal,
    pub tax_rate: Decimal,
    pub currency: Currency,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            monthly_budget: Decimal::from(500_000),
            tax_rate: Decimal::from(18),
            currency: Currency::Inr,
        }
    }
}

impl AppSettings {
    /// Checks the values an administrator is allowed to save.
    pub fn validate(&self) -> Result<(), PayrollError> {
        if self.monthly_budget <= Decimal::ZERO {
            return Err(PayrollError::InvalidConfiguration(
                "monthly budget must be positive".to_string(),
            ));
        }
        if self.tax_rate < Decimal::ZERO || self.tax_rate > Decimal::from(MAX_TAX_RATE) {
            return Err(PayrollError::InvalidConfiguration(format!(
                "tax rate must be between 0 and {MAX_TAX_RATE} percent"
            )));
        }
        Ok(())
    }

    /// Mirrors the settings form, which caps the rate at the maximum instead of rejecting it.
    pub fn with_tax_rate_clamped(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate.min(Decimal::from(MAX_TAX_RATE));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
            at: Utc::now(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Savings,
    Efficiency,
    Payslip,
    AddEmployee,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Dashboard,
    Analytics,
    Employees,
    Payroll,
    Settings,
}

impl Tab {
    pub fn as_id(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Analytics => "analytics",
            Self::Employees => "employees",
            Self::Payroll => "payroll",
            Self::Settings => "settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "tab", rename_all = "snake_case")]
pub enum Action {
    NavigateTo(Tab),
    OpenAddEmployeeForm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollBreakdown {
    pub gross: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub net_pay: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRow {
    pub employee_id: String,
    pub full_name: String,
    pub position: Position,
    pub status: EmployeeStatus,
    pub breakdown: PayrollBreakdown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub employee_count: usize,
    pub monthly_budget: Decimal,
    pub total_expenditure: Decimal,
    pub average_salary: Decimal,
    pub remaining_budget: Decimal,
    pub utilization_percent: Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct ConversationContext<'a> {
    pub employees: &'a [Employee],
    pub settings: &'a AppSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response_text: String,
    pub side_effects: Vec<Action>,
    pub intent: Intent,
}
