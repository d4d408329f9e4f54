use rusqlite::OptionalExtension;

use super::now_timestamp;
use crate::db::SqliteTx;
use crate::error::AppResult;
use crate::models::User;
use crate::repositories::UserStore;

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteUserStore;

impl UserStore<SqliteTx> for SqliteUserStore {
    fn get_by_id(&self, tx: &SqliteTx, id: &str) -> AppResult<Option<User>> {
        let user = tx
            .conn()
            .query_row(
                "SELECT id, income, saving_goal, created_at, updated_at FROM users WHERE id = ?1",
                rusqlite::params![id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        income: row.get(1)?,
                        saving_goal: row.get(2)?,
                        created_at: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    fn create(&self, tx: &SqliteTx, id: &str, income: i64, saving_goal: i64) -> AppResult<()> {
        let now = now_timestamp();
        tx.conn().execute(
            "INSERT INTO users (id, income, saving_goal, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![id, income, saving_goal, now, now],
        )?;
        Ok(())
    }

    fn update_settings(&self, tx: &SqliteTx, id: &str, income: i64, saving_goal: i64) -> AppResult<()> {
        tx.conn().execute(
            "UPDATE users SET income = ?1, saving_goal = ?2, updated_at = ?3 WHERE id = ?4",
            rusqlite::params![income, saving_goal, now_timestamp(), id],
        )?;
        Ok(())
    }
}
