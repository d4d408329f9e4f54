use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::Category;
use crate::repositories::CategoryStore;

#[derive(Clone)]
pub struct SqliteCategoryStore {
    pool: DbPool,
}

impl SqliteCategoryStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CategoryStore for SqliteCategoryStore {
    fn exists(&self, id: i64) -> AppResult<bool> {
        let conn = self.pool.get()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1)",
            rusqlite::params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn list(&self) -> AppResult<Vec<Category>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT id, name FROM categories ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        let categories: Result<Vec<_>, _> = rows.collect();
        Ok(categories?)
    }
}
