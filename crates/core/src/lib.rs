pub mod error;
pub mod intent;
pub mod models;
pub mod payroll;
pub mod payslip;
pub mod replies;
pub mod roster;

pub use error::PayrollError;
pub use intent::{classify_intent, normalize_text};
pub use models::*;
pub use payroll::{
    amount_from_f64, breakdown_for, compute_breakdown, parse_amount, payroll_rows,
    summarize_budget,
};
pub use payslip::PayslipStatement;
pub use replies::compose_local_reply;
