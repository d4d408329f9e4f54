//! Guard applied when an expense's status changes on update.
//!
//! ```text
//! planned ──► confirmed     allowed
//! confirmed ──► planned     InvalidStatusTransition
//! ```

use crate::error::{AppError, AppResult};
use crate::models::ExpenseStatus;

use super::validation;

/// Resolves the status an update should persist. A missing request keeps
/// `current`; a supplied one is normalized and checked against the guard.
pub fn resolve(current: ExpenseStatus, requested: Option<&str>) -> AppResult<ExpenseStatus> {
    let desired = validation::status(requested)?.unwrap_or(current);
    check_transition(current, desired)?;
    Ok(desired)
}

pub fn check_transition(current: ExpenseStatus, desired: ExpenseStatus) -> AppResult<()> {
    match (current, desired) {
        (ExpenseStatus::Confirmed, ExpenseStatus::Planned) => {
            Err(AppError::InvalidStatusTransition)
        }
        _ => Ok(()),
    }
}
