use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension};

use super::now_timestamp;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Category, Expense, ExpenseRecord, ExpenseStatus};
use crate::repositories::ExpenseStore;

const EXPENSE_SELECT: &str = "SELECT e.id, e.amount, e.memo, e.spent_at, e.status, c.id, c.name
     FROM expenses e JOIN categories c ON c.id = e.category_id";

#[derive(Clone)]
pub struct SqliteExpenseStore {
    pool: DbPool,
}

impl SqliteExpenseStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn fetch(conn: &Connection, user_id: &str, id: i64) -> rusqlite::Result<Expense> {
        conn.query_row(
            &format!("{EXPENSE_SELECT} WHERE e.id = ?1 AND e.user_id = ?2"),
            rusqlite::params![id, user_id],
            row_to_expense,
        )
    }
}

fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
    let memo: Option<String> = row.get(2)?;
    let spent_at: String = row.get(3)?;
    let status: String = row.get(4)?;

    let spent_at = DateTime::parse_from_rfc3339(&spent_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?
        .with_timezone(&Utc);
    let status = ExpenseStatus::normalize(&status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            Type::Text,
            format!("unknown expense status {status:?}").into(),
        )
    })?;

    Ok(Expense {
        id: row.get(0)?,
        amount: row.get(1)?,
        memo: memo.unwrap_or_default(),
        spent_at,
        status,
        category: Category {
            id: row.get(5)?,
            name: row.get(6)?,
        },
    })
}

/// Fixed-width so that text order in `list` matches chronological order.
fn format_spent_at(spent_at: &DateTime<Utc>) -> String {
    spent_at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn memo_column(memo: &str) -> Option<&str> {
    (!memo.is_empty()).then_some(memo)
}

/// Annotates foreign-key failures with the offending column so callers can
/// tell a bad category reference from other storage failures.
fn write_error(e: rusqlite::Error) -> AppError {
    let foreign_key = matches!(
        &e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    );
    if foreign_key {
        AppError::Storage(format!("expenses.category_id: {e}"))
    } else {
        AppError::Database(e)
    }
}

impl ExpenseStore for SqliteExpenseStore {
    fn create(&self, user_id: &str, record: &ExpenseRecord) -> AppResult<Expense> {
        let conn = self.pool.get()?;
        let now = now_timestamp();
        let status = record.status.unwrap_or(ExpenseStatus::Confirmed);

        let id: i64 = conn
            .query_row(
                "INSERT INTO expenses (user_id, amount, category_id, memo, spent_at, status, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING id",
                rusqlite::params![
                    user_id,
                    record.amount,
                    record.category_id,
                    memo_column(&record.memo),
                    format_spent_at(&record.spent_at),
                    status.as_str(),
                    now,
                    now
                ],
                |row| row.get(0),
            )
            .map_err(write_error)?;

        Ok(Self::fetch(&conn, user_id, id)?)
    }

    fn list(&self, user_id: &str) -> AppResult<Vec<Expense>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(&format!(
            "{EXPENSE_SELECT} WHERE e.user_id = ?1 ORDER BY e.spent_at DESC, e.id DESC"
        ))?;
        let rows = stmt.query_map(rusqlite::params![user_id], row_to_expense)?;
        let expenses: Result<Vec<_>, _> = rows.collect();
        Ok(expenses?)
    }

    fn get_by_id(&self, user_id: &str, id: i64) -> AppResult<Option<Expense>> {
        let conn = self.pool.get()?;
        Ok(Self::fetch(&conn, user_id, id).optional()?)
    }

    fn update(&self, user_id: &str, id: i64, record: &ExpenseRecord) -> AppResult<Expense> {
        let conn = self.pool.get()?;
        let status = record.status.unwrap_or(ExpenseStatus::Confirmed);

        let affected = conn
            .execute(
                "UPDATE expenses SET amount = ?1, category_id = ?2, memo = ?3, spent_at = ?4, status = ?5, updated_at = ?6
                 WHERE id = ?7 AND user_id = ?8",
                rusqlite::params![
                    record.amount,
                    record.category_id,
                    memo_column(&record.memo),
                    format_spent_at(&record.spent_at),
                    status.as_str(),
                    now_timestamp(),
                    id,
                    user_id
                ],
            )
            .map_err(write_error)?;

        if affected == 0 {
            return Err(AppError::Database(rusqlite::Error::QueryReturnedNoRows));
        }

        Ok(Self::fetch(&conn, user_id, id)?)
    }

    fn delete(&self, user_id: &str, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "DELETE FROM expenses WHERE id = ?1 AND user_id = ?2",
            rusqlite::params![id, user_id],
        )?;
        Ok(())
    }
}
