mod migrations;
pub mod tx;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use std::path::Path;

use anyhow::Context;

pub use tx::{SqliteTx, SqliteTxManager};

pub type DbPool = Pool<SqliteConnectionManager>;

const CONNECTION_PRAGMAS: &str = "PRAGMA journal_mode = WAL;
     PRAGMA foreign_keys = ON;
     PRAGMA busy_timeout = 5000;";

pub fn create_pool(sqlite_path: &str, max_size: u32) -> anyhow::Result<DbPool> {
    if let Some(parent) = Path::new(sqlite_path).parent() {
        std::fs::create_dir_all(parent).context("Failed to create database directory")?;
    }

    let manager = SqliteConnectionManager::file(sqlite_path)
        .with_flags(
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )
        .with_init(|conn| conn.execute_batch(CONNECTION_PRAGMAS));

    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .context("Failed to create database pool")?;

    migrate(&pool)?;
    Ok(pool)
}

/// Single-connection pool over a private in-memory database. Every pooled
/// connection would otherwise see its own empty database.
#[cfg(test)]
pub fn memory_pool() -> DbPool {
    let manager = SqliteConnectionManager::memory()
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .expect("in-memory pool");
    migrate(&pool).expect("migrations");
    pool
}

fn migrate(pool: &DbPool) -> anyhow::Result<()> {
    let conn = pool.get().context("Failed to get connection for migrations")?;
    migrations::run(&conn).context("Failed to run migrations")?;
    Ok(())
}
