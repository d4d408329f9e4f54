use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{CreateExpenseInput, Expense, ExpenseRecord, UpdateExpenseInput};
use crate::repositories::{CategoryStore, ExpenseStore};

use super::{status, validation};

/// Expense lifecycle: validation, the status guard, then persistence.
pub struct ExpenseService {
    expenses: Arc<dyn ExpenseStore>,
    categories: Arc<dyn CategoryStore>,
}

impl ExpenseService {
    pub fn new(expenses: Arc<dyn ExpenseStore>, categories: Arc<dyn CategoryStore>) -> Self {
        Self {
            expenses,
            categories,
        }
    }

    /// Checks run in a fixed order and stop at the first failure: amount,
    /// category id, spent-at, memo, status, then category existence.
    pub fn create_expense(&self, user_id: &str, input: CreateExpenseInput) -> AppResult<Expense> {
        let amount = validation::amount(input.amount)?;
        let category_id = validation::category_id(input.category_id)?;
        let spent_at = validation::spent_at(&input.spent_at)?;
        validation::memo(&input.memo)?;
        let status = validation::status(input.status.as_deref())?;

        self.ensure_category_exists(category_id)?;

        let record = ExpenseRecord {
            amount,
            category_id,
            memo: input.memo,
            spent_at,
            status,
        };
        self.expenses
            .create(user_id, &record)
            .map_err(classify_store_error)
    }

    pub fn list_expenses(&self, user_id: &str) -> AppResult<Vec<Expense>> {
        self.expenses.list(user_id).map_err(classify_store_error)
    }

    /// A missing record is reported as an invalid transition, not as not-found.
    pub fn update_expense(&self, user_id: &str, input: UpdateExpenseInput) -> AppResult<Expense> {
        let current = match self.expenses.get_by_id(user_id, input.id) {
            Ok(Some(expense)) => expense,
            Ok(None) => return Err(AppError::InvalidStatusTransition),
            Err(e) if e.is_no_rows() => return Err(AppError::InvalidStatusTransition),
            Err(e) => return Err(classify_store_error(e)),
        };

        let status = status::resolve(current.status, input.status.as_deref())?;

        let amount = match input.amount {
            Some(amount) => validation::check_amount(amount)?,
            None => current.amount,
        };
        let category_id = match input.category_id {
            Some(id) => validation::check_category_id(id)?,
            None => current.category.id,
        };
        let spent_at = match input.spent_at.as_deref() {
            Some(raw) => validation::spent_at(raw)?,
            None => current.spent_at,
        };
        let memo = input.memo.unwrap_or(current.memo);
        validation::memo(&memo)?;

        if category_id != current.category.id {
            self.ensure_category_exists(category_id)?;
        }

        let record = ExpenseRecord {
            amount,
            category_id,
            memo,
            spent_at,
            status: Some(status),
        };
        self.expenses
            .update(user_id, input.id, &record)
            .map_err(classify_store_error)
    }

    /// Deletion is not gated by status.
    pub fn delete_expense(&self, user_id: &str, id: i64) -> AppResult<()> {
        match self.expenses.get_by_id(user_id, id) {
            Ok(Some(_)) => {}
            Ok(None) => return Err(AppError::NotFound("expense not found".into())),
            Err(e) => return Err(classify_store_error(e)),
        }

        self.expenses
            .delete(user_id, id)
            .map_err(classify_store_error)
    }

    fn ensure_category_exists(&self, category_id: i64) -> AppResult<()> {
        match self.categories.exists(category_id) {
            Ok(true) => Ok(()),
            Ok(false) => Err(AppError::validation("category_id is invalid")),
            Err(e) => {
                tracing::error!(category_id, "category lookup failed: {e}");
                Err(AppError::internal())
            }
        }
    }
}

/// Maps a store failure onto what callers may see. Driver detail never
/// leaves this function except through the log.
pub(crate) fn classify_store_error(err: AppError) -> AppError {
    if err.is_no_rows() {
        return AppError::NotFound("expense not found".into());
    }

    let text = err.to_string().to_lowercase();
    if text.contains("foreign key") && text.contains("category") {
        return AppError::validation("category_id is invalid");
    }

    tracing::error!("expense store failure: {err}");
    AppError::internal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ExpenseStatus};
    use crate::repositories::{MockCategoryStore, MockExpenseStore};
    use chrono::{DateTime, TimeZone, Utc};

    const USER: &str = "user-1";

    fn valid_input() -> CreateExpenseInput {
        CreateExpenseInput {
            amount: Some(100),
            category_id: Some(1),
            memo: String::new(),
            spent_at: "2020-01-02".to_string(),
            status: None,
        }
    }

    fn stored(id: i64, status: ExpenseStatus) -> Expense {
        Expense {
            id,
            amount: 500,
            memo: "lunch".to_string(),
            spent_at: Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap(),
            status,
            category: Category {
                id: 1,
                name: "Food".to_string(),
            },
        }
    }

    fn echo(id: i64, record: &ExpenseRecord) -> Expense {
        Expense {
            id,
            amount: record.amount,
            memo: record.memo.clone(),
            spent_at: record.spent_at,
            status: record.status.unwrap_or(ExpenseStatus::Confirmed),
            category: Category {
                id: record.category_id,
                name: "Food".to_string(),
            },
        }
    }

    fn categories_existing() -> MockCategoryStore {
        let mut categories = MockCategoryStore::new();
        categories.expect_exists().returning(|_| Ok(true));
        categories
    }

    fn service(expenses: MockExpenseStore, categories: MockCategoryStore) -> ExpenseService {
        ExpenseService::new(Arc::new(expenses), Arc::new(categories))
    }

    fn assert_validation(result: AppResult<Expense>, expected: &str) {
        match result {
            Err(AppError::Validation(msg)) => assert_eq!(msg, expected),
            other => panic!("expected validation error {expected:?}, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_amounts_never_reach_the_store() {
        for amount in [-5, 0, 1_000_000_001, i64::MAX] {
            let mut expenses = MockExpenseStore::new();
            expenses.expect_create().never();
            let mut categories = MockCategoryStore::new();
            categories.expect_exists().never();

            let input = CreateExpenseInput {
                amount: Some(amount),
                ..valid_input()
            };
            let result = service(expenses, categories).create_expense(USER, input);
            assert!(matches!(result, Err(AppError::Validation(_))), "amount {amount}");
        }
    }

    #[test]
    fn missing_amount_is_reported_first() {
        let input = CreateExpenseInput {
            amount: None,
            category_id: None,
            spent_at: String::new(),
            ..valid_input()
        };
        let result = service(MockExpenseStore::new(), MockCategoryStore::new())
            .create_expense(USER, input);
        assert_validation(result, "amount must be provided");
    }

    #[test]
    fn non_positive_category_ids_skip_the_existence_check() {
        for category_id in [0, -1] {
            let mut expenses = MockExpenseStore::new();
            expenses.expect_create().never();
            let mut categories = MockCategoryStore::new();
            categories.expect_exists().never();

            let input = CreateExpenseInput {
                category_id: Some(category_id),
                ..valid_input()
            };
            let result = service(expenses, categories).create_expense(USER, input);
            assert_validation(result, "category_id must be greater than 0");
        }
    }

    #[test]
    fn date_only_spent_at_is_stored_as_midnight_utc() {
        let mut expenses = MockExpenseStore::new();
        expenses
            .expect_create()
            .times(1)
            .withf(|user_id, record| {
                user_id == USER
                    && record.spent_at == Utc.with_ymd_and_hms(2020, 1, 2, 0, 0, 0).unwrap()
            })
            .returning(|_, record| Ok(echo(1, record)));

        let created = service(expenses, categories_existing())
            .create_expense(USER, valid_input())
            .unwrap();
        assert_eq!(created.amount, 100);
    }

    #[test]
    fn rfc3339_spent_at_is_preserved() {
        let expected: DateTime<Utc> = Utc.with_ymd_and_hms(2020, 1, 2, 15, 4, 5).unwrap();
        let mut expenses = MockExpenseStore::new();
        expenses
            .expect_create()
            .times(1)
            .withf(move |_, record| record.spent_at == expected)
            .returning(|_, record| Ok(echo(2, record)));

        let input = CreateExpenseInput {
            amount: Some(200),
            category_id: Some(2),
            spent_at: "2020-01-02T15:04:05Z".to_string(),
            ..valid_input()
        };
        let created = service(expenses, categories_existing())
            .create_expense(USER, input)
            .unwrap();
        assert_eq!(created.spent_at, expected);
    }

    #[test]
    fn zero_and_empty_spent_at_are_rejected() {
        for spent_at in ["0001-01-01T00:00:00Z", ""] {
            let mut expenses = MockExpenseStore::new();
            expenses.expect_create().never();

            let input = CreateExpenseInput {
                spent_at: spent_at.to_string(),
                ..valid_input()
            };
            let result = service(expenses, MockCategoryStore::new()).create_expense(USER, input);
            assert!(matches!(result, Err(AppError::Validation(_))), "{spent_at:?}");
        }
    }

    #[test]
    fn overlong_memo_is_rejected() {
        let mut expenses = MockExpenseStore::new();
        expenses.expect_create().never();

        let input = CreateExpenseInput {
            memo: "a".repeat(5001),
            ..valid_input()
        };
        let result = service(expenses, MockCategoryStore::new()).create_expense(USER, input);
        assert_validation(result, "memo exceeds maximum length");
    }

    #[test]
    fn status_is_normalized_before_reaching_the_store() {
        let mut expenses = MockExpenseStore::new();
        expenses
            .expect_create()
            .times(1)
            .withf(|_, record| record.status == Some(ExpenseStatus::Planned))
            .returning(|_, record| Ok(echo(3, record)));

        let input = CreateExpenseInput {
            status: Some("PlAnNeD".to_string()),
            ..valid_input()
        };
        let created = service(expenses, categories_existing())
            .create_expense(USER, input)
            .unwrap();
        assert_eq!(created.status, ExpenseStatus::Planned);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let mut expenses = MockExpenseStore::new();
        expenses.expect_create().never();
        let mut categories = MockCategoryStore::new();
        categories.expect_exists().never();

        let input = CreateExpenseInput {
            status: Some("draft".to_string()),
            ..valid_input()
        };
        let result = service(expenses, categories).create_expense(USER, input);
        assert_validation(result, "status must be 'planned' or 'confirmed'");
    }

    #[test]
    fn unknown_category_is_a_validation_error() {
        let mut expenses = MockExpenseStore::new();
        expenses.expect_create().never();
        let mut categories = MockCategoryStore::new();
        categories
            .expect_exists()
            .times(1)
            .withf(|id| *id == 9999)
            .returning(|_| Ok(false));

        let input = CreateExpenseInput {
            category_id: Some(9999),
            ..valid_input()
        };
        let result = service(expenses, categories).create_expense(USER, input);
        assert_validation(result, "category_id is invalid");
    }

    #[test]
    fn category_lookup_failure_is_internal() {
        let mut expenses = MockExpenseStore::new();
        expenses.expect_create().never();
        let mut categories = MockCategoryStore::new();
        categories
            .expect_exists()
            .returning(|_| Err(AppError::Storage("db error".into())));

        let result = service(expenses, categories).create_expense(USER, valid_input());
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[test]
    fn store_errors_are_reclassified() {
        let no_rows = classify_store_error(AppError::Database(rusqlite::Error::QueryReturnedNoRows));
        assert!(matches!(no_rows, AppError::NotFound(ref msg) if msg.contains("not found")));

        let fk = classify_store_error(AppError::Storage(
            "insert or update on table \"expenses\" violates foreign key constraint \"expenses_category_id_fkey\"".into(),
        ));
        assert!(matches!(fk, AppError::Validation(ref msg) if msg == "category_id is invalid"));

        let other = classify_store_error(AppError::Storage("some db problem".into()));
        assert!(matches!(other, AppError::Internal(ref msg) if msg == "internal error"));
    }

    #[test]
    fn create_surfaces_reclassified_store_errors() {
        let mut expenses = MockExpenseStore::new();
        expenses.expect_create().returning(|_, _| {
            Err(AppError::Storage("expenses.category_id: FOREIGN KEY constraint failed".into()))
        });

        let result = service(expenses, categories_existing()).create_expense(USER, valid_input());
        assert_validation(result, "category_id is invalid");
    }

    #[test]
    fn update_from_confirmed_to_planned_is_refused() {
        let mut expenses = MockExpenseStore::new();
        expenses
            .expect_get_by_id()
            .returning(|_, id| Ok(Some(stored(id, ExpenseStatus::Confirmed))));
        expenses.expect_update().never();

        let input = UpdateExpenseInput {
            id: 7,
            status: Some("planned".to_string()),
            ..Default::default()
        };
        let result = service(expenses, MockCategoryStore::new()).update_expense(USER, input);
        assert!(matches!(result, Err(AppError::InvalidStatusTransition)));
    }

    #[test]
    fn update_of_missing_expense_reports_invalid_transition() {
        let mut expenses = MockExpenseStore::new();
        expenses.expect_get_by_id().returning(|_, _| Ok(None));
        expenses.expect_update().never();

        let input = UpdateExpenseInput {
            id: 404,
            status: Some("confirmed".to_string()),
            ..Default::default()
        };
        let result = service(expenses, MockCategoryStore::new()).update_expense(USER, input);
        assert!(matches!(result, Err(AppError::InvalidStatusTransition)));
    }

    #[test]
    fn update_when_lookup_reports_no_rows_is_an_invalid_transition() {
        let mut expenses = MockExpenseStore::new();
        expenses
            .expect_get_by_id()
            .times(1)
            .returning(|_, _| Err(AppError::Database(rusqlite::Error::QueryReturnedNoRows)));
        expenses.expect_update().never();
        let mut categories = MockCategoryStore::new();
        categories.expect_exists().never();

        let input = UpdateExpenseInput {
            id: 7,
            amount: Some(900),
            ..Default::default()
        };
        let result = service(expenses, categories).update_expense(USER, input);
        assert!(matches!(result, Err(AppError::InvalidStatusTransition)));
    }

    #[test]
    fn update_without_status_keeps_current_and_merges_fields() {
        let mut expenses = MockExpenseStore::new();
        expenses
            .expect_get_by_id()
            .returning(|_, id| Ok(Some(stored(id, ExpenseStatus::Confirmed))));
        expenses
            .expect_update()
            .times(1)
            .withf(|user_id, id, record| {
                user_id == USER
                    && *id == 7
                    && record.amount == 800
                    && record.category_id == 1
                    && record.memo == "lunch"
                    && record.status == Some(ExpenseStatus::Confirmed)
            })
            .returning(|_, id, record| Ok(echo(id, record)));

        let input = UpdateExpenseInput {
            id: 7,
            amount: Some(800),
            ..Default::default()
        };
        let updated = service(expenses, MockCategoryStore::new())
            .update_expense(USER, input)
            .unwrap();
        assert_eq!(updated.amount, 800);
    }

    #[test]
    fn update_from_planned_to_confirmed_checks_new_category() {
        let mut expenses = MockExpenseStore::new();
        expenses
            .expect_get_by_id()
            .returning(|_, id| Ok(Some(stored(id, ExpenseStatus::Planned))));
        expenses
            .expect_update()
            .times(1)
            .withf(|_, _, record| {
                record.category_id == 3 && record.status == Some(ExpenseStatus::Confirmed)
            })
            .returning(|_, id, record| Ok(echo(id, record)));
        let mut categories = MockCategoryStore::new();
        categories
            .expect_exists()
            .times(1)
            .withf(|id| *id == 3)
            .returning(|_| Ok(true));

        let input = UpdateExpenseInput {
            id: 7,
            category_id: Some(3),
            status: Some("Confirmed".to_string()),
            ..Default::default()
        };
        let updated = service(expenses, categories).update_expense(USER, input).unwrap();
        assert_eq!(updated.status, ExpenseStatus::Confirmed);
    }

    #[test]
    fn update_validates_supplied_fields() {
        let mut expenses = MockExpenseStore::new();
        expenses
            .expect_get_by_id()
            .returning(|_, id| Ok(Some(stored(id, ExpenseStatus::Planned))));
        expenses.expect_update().never();

        let input = UpdateExpenseInput {
            id: 7,
            amount: Some(0),
            ..Default::default()
        };
        let result = service(expenses, MockCategoryStore::new()).update_expense(USER, input);
        assert_validation(result, "amount must be greater than 0");
    }

    #[test]
    fn delete_of_missing_expense_is_not_found() {
        let mut expenses = MockExpenseStore::new();
        expenses.expect_get_by_id().returning(|_, _| Ok(None));
        expenses.expect_delete().never();

        let result = service(expenses, MockCategoryStore::new()).delete_expense(USER, 404);
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn delete_ignores_status() {
        let mut expenses = MockExpenseStore::new();
        expenses
            .expect_get_by_id()
            .returning(|_, id| Ok(Some(stored(id, ExpenseStatus::Confirmed))));
        expenses
            .expect_delete()
            .times(1)
            .withf(|user_id, id| user_id == USER && *id == 9)
            .returning(|_, _| Ok(()));

        service(expenses, MockCategoryStore::new())
            .delete_expense(USER, 9)
            .unwrap();
    }
}
