use std::fmt::{Display, Formatter};

use redb::{CommitError, DatabaseError, Error as RedbError, StorageError, TableError, TransactionError};
use serde_json::Error as SerdeError;

/// Failure categories surfaced by the storage core.
///
/// Not-found conditions are never represented here; lookups return
/// `Ok(None)` (or `Ok(false)` for restore/delete) and leave the decision
/// to the caller.
#[derive(Debug)]
pub enum StoreError {
    /// The underlying redb database rejected an operation.
    Database(String),
    /// A value could not be serialized to or parsed from JSON.
    Serialization(String),
    /// A file could not be read or written.
    Io(String),
    /// An import payload failed structural validation.
    Validation(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(msg) => write!(f, "Database error: {}", msg),
            StoreError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            StoreError::Io(msg) => write!(f, "IO error: {}", msg),
            StoreError::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<RedbError> for StoreError {
    fn from(err: RedbError) -> Self {
        match err {
            RedbError::TableDoesNotExist(name) =>
                StoreError::Database(format!("Table '{}' not found", name)),
            RedbError::Corrupted(msg) =>
                StoreError::Database(format!("Database is corrupted: {}", msg)),
            RedbError::Io(io_err) =>
                StoreError::Database(format!("IO error: {}", io_err)),
            _ => StoreError::Database(format!("Database error: {:?}", err)),
        }
    }
}

impl From<DatabaseError> for StoreError {
    fn from(err: DatabaseError) -> Self {
        StoreError::Database(format!("Failed to open database: {:?}", err))
    }
}

impl From<SerdeError> for StoreError {
    fn from(err: SerdeError) -> Self {
        StoreError::Serialization(format!("JSON serialization error: {}", err))
    }
}

impl From<TransactionError> for StoreError {
    fn from(err: TransactionError) -> Self {
        StoreError::Database(format!("Transaction error: {:?}", err))
    }
}

impl From<TableError> for StoreError {
    fn from(err: TableError) -> Self {
        StoreError::Database(format!("Table operation error: {:?}", err))
    }
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        StoreError::Database(format!("Storage error: {:?}", err))
    }
}

impl From<CommitError> for StoreError {
    fn from(err: CommitError) -> Self {
        StoreError::Database(format!("Commit error: {:?}", err))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(format!("{}", err))
    }
}
