//! Storage module for persisting collected records
//!
//! This module handles:
//! - Reading a prior dataset so a run can resume
//! - Writing the full record set as CSV, atomically
//! - Periodic progress checkpoints kept apart from the canonical dataset

mod checkpoint;
mod csv_store;
mod traits;

pub use checkpoint::CheckpointWriter;
pub use csv_store::{CsvRecordStore, RECORD_HEADERS};
pub use traits::{RecordStore, StorageError, StorageResult};

use std::path::Path;

/// Opens the CSV store at `path`
pub fn open_store(path: impl AsRef<Path>) -> CsvRecordStore {
    CsvRecordStore::new(path.as_ref())
}
