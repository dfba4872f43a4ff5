use crate::state::JobRecord;
use crate::storage::{RecordStore, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Column order of the persisted dataset
pub const RECORD_HEADERS: [&str; 11] = [
    "url",
    "title",
    "description",
    "compensation",
    "employment_type",
    "location",
    "company",
    "post_date",
    "partition_region",
    "partition_category",
    "label",
];

/// Record set stored as a single CSV file with a header row
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file written first and then renamed over the real path
    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RecordStore for CsvRecordStore {
    fn load(&self) -> StorageResult<Vec<JobRecord>> {
        if !self.path.exists() {
            tracing::debug!("No existing dataset at {}", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();

        for (index, row) in reader.deserialize::<JobRecord>().enumerate() {
            match row {
                Ok(record) => records.push(record),
                Err(e) => {
                    // Row numbers are 1-based and count the header
                    tracing::warn!(
                        "Skipping unreadable row {} in {}: {}",
                        index + 2,
                        self.path.display(),
                        e
                    );
                }
            }
        }

        Ok(records)
    }

    fn save(&self, records: &[JobRecord]) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let staging = self.staging_path();
        {
            // Header is written explicitly so an empty set still yields a valid file
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&staging)?;
            writer.write_record(RECORD_HEADERS)?;
            for record in records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        fs::rename(&staging, &self.path)?;

        tracing::debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
