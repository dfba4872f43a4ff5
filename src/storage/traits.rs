//! Storage traits and error types

use crate::state::JobRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A destination that holds a whole record set
///
/// Saves replace the previous contents entirely; there is no append mode.
pub trait RecordStore: Send + Sync {
    /// Loads every record, or an empty set if nothing has been written yet
    fn load(&self) -> StorageResult<Vec<JobRecord>>;

    /// Replaces the stored set with `records`
    fn save(&self, records: &[JobRecord]) -> StorageResult<()>;

    /// Where the records live, for log messages
    fn describe(&self) -> String;
}
