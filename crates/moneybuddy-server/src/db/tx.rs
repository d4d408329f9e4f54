use r2d2::PooledConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::services::tx::{Transaction, TxManager};

/// Hands out SQLite transactions, each pinned to its own pooled connection.
#[derive(Clone)]
pub struct SqliteTxManager {
    pool: DbPool,
}

impl SqliteTxManager {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl TxManager for SqliteTxManager {
    type Tx = SqliteTx;

    fn begin(&self) -> AppResult<SqliteTx> {
        let conn = self.pool.get()?;
        // IMMEDIATE takes the write lock up front, so concurrent writers queue
        // on busy_timeout instead of failing at their first write.
        conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(SqliteTx { conn })
    }

    fn begin_read(&self) -> AppResult<SqliteTx> {
        let conn = self.pool.get()?;
        // DEFERRED only takes a shared lock at the first read; under WAL that
        // never waits on a writer.
        conn.execute_batch("BEGIN DEFERRED")?;
        Ok(SqliteTx { conn })
    }
}

/// An open transaction. Stores run their statements on [`SqliteTx::conn`].
pub struct SqliteTx {
    conn: PooledConnection<SqliteConnectionManager>,
}

impl SqliteTx {
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl Transaction for SqliteTx {
    fn commit(self) -> AppResult<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback(self) -> AppResult<()> {
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }
}

impl Drop for SqliteTx {
    fn drop(&mut self) {
        // Never hand a connection with an open transaction back to the pool
        if !self.conn.is_autocommit() {
            if let Err(e) = self.conn.execute_batch("ROLLBACK") {
                tracing::warn!("Failed to roll back abandoned transaction: {e}");
            }
        }
    }
}
