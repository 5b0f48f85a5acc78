use std::str::FromStr;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::error::PayrollError;
use crate::models::{AppSettings, BudgetSummary, Employee, PayrollBreakdown, PayrollRow};

/// Splits a gross monthly income into income tax and net pay.
///
/// Rates are not capped here; anything non-negative is accepted even though
/// the settings form never saves more than 50%.
pub fn compute_breakdown(
    monthly_income: Decimal,
    tax_rate_percent: Decimal,
) -> Result<PayrollBreakdown, PayrollError> {
    if monthly_income < Decimal::ZERO {
        return Err(PayrollError::InvalidInput(format!(
            "monthly income cannot be negative (got {monthly_income})"
        )));
    }
    if tax_rate_percent < Decimal::ZERO {
        return Err(PayrollError::InvalidInput(format!(
            "tax rate cannot be negative (got {tax_rate_percent})"
        )));
    }

    let tax_amount = monthly_income
        .checked_mul(tax_rate_percent)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(|| PayrollError::InvalidInput("amount out of range".to_string()))?;
    let net_pay = monthly_income
        .checked_sub(tax_amount)
        .ok_or_else(|| PayrollError::InvalidInput("amount out of range".to_string()))?;

    Ok(PayrollBreakdown {
        gross: monthly_income,
        tax_rate: tax_rate_percent,
        tax_amount,
        net_pay,
    })
}

pub fn breakdown_for(
    employee: &Employee,
    settings: &AppSettings,
) -> Result<PayrollBreakdown, PayrollError> {
    compute_breakdown(employee.monthly_income, settings.tax_rate)
}

/// Converts a host float into an amount. NaN and infinities are rejected.
pub fn amount_from_f64(value: f64) -> Result<Decimal, PayrollError> {
    if !value.is_finite() {
        return Err(PayrollError::InvalidInput(format!(
            "amount must be a finite number (got {value})"
        )));
    }
    Decimal::from_f64(value)
        .ok_or_else(|| PayrollError::InvalidInput(format!("amount out of range (got {value})")))
}

pub fn parse_amount(value: &str) -> Result<Decimal, PayrollError> {
    let cleaned = value
        .trim()
        .chars()
        .filter(|ch| *ch != ',' && *ch != '_')
        .collect::<String>();
    Decimal::from_str(&cleaned)
        .map_err(|_| PayrollError::InvalidInput(format!("'{}' is not a number", value.trim())))
}

pub fn summarize_budget(
    employees: &[Employee],
    settings: &AppSettings,
) -> Result<BudgetSummary, PayrollError> {
    if settings.monthly_budget <= Decimal::ZERO {
        return Err(PayrollError::InvalidConfiguration(format!(
            "monthly budget must be positive (got {})",
            settings.monthly_budget
        )));
    }

    let total_expenditure = employees
        .iter()
        .try_fold(Decimal::ZERO, |sum, employee| {
            sum.checked_add(employee.monthly_income)
        })
        .ok_or_else(|| PayrollError::InvalidInput("total payroll out of range".to_string()))?;

    let average_salary = if employees.is_empty() {
        Decimal::ZERO
    } else {
        total_expenditure
            .checked_div(Decimal::from(employees.len()))
            .ok_or_else(|| PayrollError::InvalidInput("average salary out of range".to_string()))?
    };

    let remaining_budget = settings
        .monthly_budget
        .checked_sub(total_expenditure)
        .map_or(Decimal::ZERO, |remaining| remaining.max(Decimal::ZERO));
    let utilization_percent = total_expenditure
        .checked_div(settings.monthly_budget)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| PayrollError::InvalidInput("budget utilization out of range".to_string()))?;

    Ok(BudgetSummary {
        employee_count: employees.len(),
        monthly_budget: settings.monthly_budget,
        total_expenditure,
        average_salary,
        remaining_budget,
        utilization_percent,
    })
}

pub fn payroll_rows(
    employees: &[Employee],
    settings: &AppSettings,
) -> Result<Vec<PayrollRow>, PayrollError> {
    employees
        .iter()
        .map(|employee| {
            Ok(PayrollRow {
                employee_id: employee.id.clone(),
                full_name: employee.full_name.clone(),
                position: employee.position,
                status: employee.status,
                breakdown: breakdown_for(employee, settings)?,
            })
        })
        .collect()
}
