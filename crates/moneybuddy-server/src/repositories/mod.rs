//! Storage contracts consumed by the services, plus their SQLite backends.
//!
//! Lookups signal absence with `Ok(None)`. Write paths may still surface a
//! `QueryReturnedNoRows` driver error when the row vanished mid-request; the
//! services treat that as not-found.

pub mod sqlite;

use crate::error::AppResult;
use crate::models::{Category, Expense, ExpenseRecord, FixedCost, FixedCostInput, User};

#[cfg_attr(test, mockall::automock)]
pub trait ExpenseStore: Send + Sync {
    fn create(&self, user_id: &str, record: &ExpenseRecord) -> AppResult<Expense>;
    fn list(&self, user_id: &str) -> AppResult<Vec<Expense>>;
    fn get_by_id(&self, user_id: &str, id: i64) -> AppResult<Option<Expense>>;
    fn update(&self, user_id: &str, id: i64, record: &ExpenseRecord) -> AppResult<Expense>;
    fn delete(&self, user_id: &str, id: i64) -> AppResult<()>;
}

#[cfg_attr(test, mockall::automock)]
pub trait CategoryStore: Send + Sync {
    fn exists(&self, id: i64) -> AppResult<bool>;
    fn list(&self) -> AppResult<Vec<Category>>;
}

/// User settings, always accessed inside a transaction of type `Tx`.
pub trait UserStore<Tx>: Send + Sync {
    fn get_by_id(&self, tx: &Tx, id: &str) -> AppResult<Option<User>>;
    fn create(&self, tx: &Tx, id: &str, income: i64, saving_goal: i64) -> AppResult<()>;
    fn update_settings(&self, tx: &Tx, id: &str, income: i64, saving_goal: i64) -> AppResult<()>;
}

pub trait FixedCostStore<Tx>: Send + Sync {
    fn delete_all_by_user(&self, tx: &Tx, user_id: &str) -> AppResult<()>;
    fn bulk_create(&self, tx: &Tx, user_id: &str, items: &[FixedCostInput]) -> AppResult<()>;
    fn list_by_user(&self, tx: &Tx, user_id: &str) -> AppResult<Vec<FixedCost>>;
}
