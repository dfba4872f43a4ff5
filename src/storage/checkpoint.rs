use crate::state::JobRecord;
use crate::storage::{RecordStore, StorageResult};

/// Writes the whole record set to the progress store every `interval` records
pub struct CheckpointWriter {
    store: Box<dyn RecordStore>,
    interval: usize,
    last_written: Option<usize>,
}

impl CheckpointWriter {
    pub fn new(store: Box<dyn RecordStore>, interval: usize) -> Self {
        Self {
            store,
            interval: interval.max(1),
            last_written: None,
        }
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Checkpoints when the record count is a non-zero multiple of the interval
    ///
    /// Returns whether a write happened. A count that was already written is
    /// not written again.
    pub fn maybe_checkpoint(&mut self, records: &[JobRecord]) -> StorageResult<bool> {
        let count = records.len();
        if count == 0 || count % self.interval != 0 || self.last_written == Some(count) {
            return Ok(false);
        }
        self.flush(records)?;
        Ok(true)
    }

    /// Writes the record set unconditionally
    pub fn flush(&mut self, records: &[JobRecord]) -> StorageResult<()> {
        self.store.save(records)?;
        self.last_written = Some(records.len());
        tracing::info!(
            "Progress saved: {} records to {}",
            records.len(),
            self.store.describe()
        );
        Ok(())
    }
}
