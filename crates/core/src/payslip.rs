use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PayrollError;
use crate::models::{group_thousands, AppSettings, Currency, Employee, Position};
use crate::payroll::breakdown_for;

pub const STATEMENT_TITLE: &str = "SALARIO";
pub const STATEMENT_SUBTITLE: &str = "Official Payroll Statement";
pub const STATEMENT_FOOTER: &str =
    "This is a computer generated document and does not require a signature.";

/// Everything a payslip document shows, with amounts already computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayslipStatement {
    pub employee_name: String,
    pub position: Position,
    pub email: String,
    pub date_joined: NaiveDate,
    pub currency: Currency,
    pub basic_salary: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub net_pay: Decimal,
}

impl PayslipStatement {
    pub fn build(employee: &Employee, settings: &AppSettings) -> Result<Self, PayrollError> {
        let breakdown = breakdown_for(employee, settings)?;
        Ok(Self {
            employee_name: employee.full_name.clone(),
            position: employee.position,
            email: employee.email.clone(),
            date_joined: employee.date_joined,
            currency: settings.currency,
            basic_salary: breakdown.gross,
            tax_rate: breakdown.tax_rate,
            tax_amount: breakdown.tax_amount,
            net_pay: breakdown.net_pay,
        })
    }

    /// `payslip_<name>` with whitespace runs collapsed to underscores.
    pub fn file_stem(&self) -> String {
        let name = self
            .employee_name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_")
            .to_lowercase();
        format!("payslip_{name}")
    }

    pub fn render_text(&self) -> String {
        let symbol = self.currency.symbol();
        let rule = "-".repeat(60);
        let mut lines = vec![
            format!("{:^60}", STATEMENT_TITLE),
            format!("{:^60}", STATEMENT_SUBTITLE),
            String::new(),
            "Employee Details:".to_string(),
            format!("Name: {}", self.employee_name),
            format!("Position: {}", self.position.label()),
            format!("Email: {}", self.email),
            format!("Date of Joining: {}", self.date_joined),
            rule.clone(),
            "Income Breakdown".to_string(),
            format!("{:<40}{:>20}", "Description", format!("Amount ({symbol})")),
            rule.clone(),
            format!("{:<40}{:>20}", "Basic Salary", group_thousands(self.basic_salary)),
            format!(
                "{:<40}{:>20}",
                format!("Deductions (Income Tax {}%)", self.tax_rate.normalize()),
                format!("- {}", group_thousands(self.tax_amount))
            ),
            rule,
            format!(
                "{:<40}{:>20}",
                "Net Pay:",
                self.currency.format_amount(self.net_pay)
            ),
            String::new(),
            STATEMENT_FOOTER.to_string(),
        ];
        lines.push(String::new());
        lines.join("\n")
    }
}
