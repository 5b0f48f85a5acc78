use crate::models::Intent;

pub fn normalize_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// First matching rule wins; the order below is the priority order.
pub fn classify_intent(text: &str) -> Intent {
    let lower = normalize_text(text);

    if contains_any(&lower, &["savings"]) {
        return Intent::Savings;
    }

    if contains_any(&lower, &["efficiency", "utilization"]) {
        return Intent::Efficiency;
    }

    if contains_any(&lower, &["payslip", "download"]) {
        return Intent::Payslip;
    }

    if contains_any(&lower, &["add employee", "new employee", "register"]) {
        return Intent::AddEmployee;
    }

    Intent::Unknown
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}
