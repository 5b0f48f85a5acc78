use uuid::Uuid;

use crate::error::PayrollError;
use crate::models::{Employee, EmployeeDraft};

pub fn new_employee_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Validates a draft and appends it to the roster under a fresh id.
pub fn add_employee(
    roster: &[Employee],
    draft: EmployeeDraft,
) -> Result<(Vec<Employee>, Employee), PayrollError> {
    draft.validate()?;
    let employee = draft.into_employee(new_employee_id());
    let mut next = roster.to_vec();
    next.push(employee.clone());
    Ok((next, employee))
}

/// Overwrites an existing employee in place; no history is kept.
pub fn update_employee(
    roster: &[Employee],
    id: &str,
    draft: EmployeeDraft,
) -> Result<Vec<Employee>, PayrollError> {
    draft.validate()?;
    let index = position_of(roster, id)?;
    let mut next = roster.to_vec();
    next[index] = draft.into_employee(id.to_string());
    Ok(next)
}

pub fn remove_employee(roster: &[Employee], id: &str) -> Result<Vec<Employee>, PayrollError> {
    let index = position_of(roster, id)?;
    let mut next = roster.to_vec();
    next.remove(index);
    Ok(next)
}

/// Case-insensitive match on name or position, as the employee table filters.
pub fn search_employees<'a>(roster: &'a [Employee], term: &str) -> Vec<&'a Employee> {
    let needle = term.trim().to_lowercase();
    roster
        .iter()
        .filter(|employee| {
            needle.is_empty()
                || employee.full_name.to_lowercase().contains(&needle)
                || employee.position.label().to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn find_employee<'a>(roster: &'a [Employee], id: &str) -> Result<&'a Employee, PayrollError> {
    roster
        .iter()
        .find(|employee| employee.id == id)
        .ok_or_else(|| PayrollError::EmployeeNotFound(id.to_string()))
}

fn position_of(roster: &[Employee], id: &str) -> Result<usize, PayrollError> {
    roster
        .iter()
        .position(|employee| employee.id == id)
        .ok_or_else(|| PayrollError::EmployeeNotFound(id.to_string()))
}
