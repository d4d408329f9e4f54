use crate::error::AppResult;

/// A unit of work opened by a [`TxManager`]. Finishing it consumes the handle,
/// so a transaction cannot be used after commit or rollback.
pub trait Transaction: Send {
    fn commit(self) -> AppResult<()>;
    fn rollback(self) -> AppResult<()>;
}

pub trait TxManager: Send + Sync {
    type Tx: Transaction;

    /// Opens a transaction that will write.
    fn begin(&self) -> AppResult<Self::Tx>;

    /// Opens a transaction that only reads and must not block writers.
    fn begin_read(&self) -> AppResult<Self::Tx>;
}
