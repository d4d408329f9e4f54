use super::now_timestamp;
use crate::db::SqliteTx;
use crate::error::AppResult;
use crate::models::{FixedCost, FixedCostInput};
use crate::repositories::FixedCostStore;

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteFixedCostStore;

impl FixedCostStore<SqliteTx> for SqliteFixedCostStore {
    fn delete_all_by_user(&self, tx: &SqliteTx, user_id: &str) -> AppResult<()> {
        tx.conn().execute(
            "DELETE FROM fixed_costs WHERE user_id = ?1",
            rusqlite::params![user_id],
        )?;
        Ok(())
    }

    fn bulk_create(&self, tx: &SqliteTx, user_id: &str, items: &[FixedCostInput]) -> AppResult<()> {
        if items.is_empty() {
            return Ok(());
        }

        let now = now_timestamp();
        let mut stmt = tx.conn().prepare_cached(
            "INSERT INTO fixed_costs (user_id, name, amount, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for item in items {
            stmt.execute(rusqlite::params![user_id, item.name, item.amount, now, now])?;
        }
        Ok(())
    }

    fn list_by_user(&self, tx: &SqliteTx, user_id: &str) -> AppResult<Vec<FixedCost>> {
        let mut stmt = tx.conn().prepare(
            "SELECT id, user_id, name, amount FROM fixed_costs WHERE user_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(rusqlite::params![user_id], |row| {
            Ok(FixedCost {
                id: row.get(0)?,
                user_id: row.get(1)?,
                name: row.get(2)?,
                amount: row.get(3)?,
            })
        })?;
        let costs: Result<Vec<_>, _> = rows.collect();
        Ok(costs?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{memory_pool, SqliteTxManager};
    use crate::repositories::sqlite::SqliteUserStore;
    use crate::repositories::UserStore;
    use crate::services::tx::{Transaction, TxManager};

    fn item(name: &str, amount: i64) -> FixedCostInput {
        FixedCostInput {
            name: name.to_string(),
            amount,
        }
    }

    #[test]
    fn delete_all_then_bulk_create_replaces_the_set() {
        let manager = SqliteTxManager::new(memory_pool());
        let store = SqliteFixedCostStore;

        let tx = manager.begin().unwrap();
        SqliteUserStore.create(&tx, "u1", 100, 0).unwrap();
        store
            .bulk_create(&tx, "u1", &[item("rent", 80_000), item("phone", 5_000)])
            .unwrap();

        store.delete_all_by_user(&tx, "u1").unwrap();
        store.bulk_create(&tx, "u1", &[item("gym", 7_000)]).unwrap();

        let costs = store.list_by_user(&tx, "u1").unwrap();
        assert_eq!(costs.len(), 1);
        assert_eq!(costs[0].name, "gym");
        assert_eq!(costs[0].amount, 7_000);
        tx.commit().unwrap();
    }

    #[test]
    fn bulk_create_for_unknown_user_violates_foreign_key() {
        let manager = SqliteTxManager::new(memory_pool());
        let tx = manager.begin().unwrap();

        let result = SqliteFixedCostStore.bulk_create(&tx, "ghost", &[item("rent", 1)]);
        assert!(result.is_err());
        tx.rollback().unwrap();
    }
}
