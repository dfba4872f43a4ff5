use crate::state::{JobRecord, SeenUrls};

/// Result of offering a record to the crawl state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The record was added
    Appended,
    /// A record with the same URL is already held
    Duplicate,
    /// The target count has been reached; nothing more is accepted
    TargetReached,
}

/// Records collected for one run
///
/// The record sequence and the seen set are only mutated through
/// [`CrawlState::append`], which keeps URLs unique and never grows the
/// sequence past the target. A prior dataset larger than the target is
/// kept as loaded, never truncated.
///
/// URLs whose posting could not be collected are remembered for the rest of
/// the run so a cross-listed posting is not fetched twice. They are not
/// persisted, so a later run tries them again.
#[derive(Debug, Clone)]
pub struct CrawlState {
    target: usize,
    records: Vec<JobRecord>,
    seen: SeenUrls,
    failed: SeenUrls,
    loaded: usize,
}

impl CrawlState {
    /// Creates an empty state
    pub fn new(target: usize) -> Self {
        Self::seeded(target, Vec::new())
    }

    /// Creates a state from a previously persisted dataset
    ///
    /// Rows with an empty URL or a URL seen earlier in the file are dropped.
    pub fn seeded(target: usize, prior: Vec<JobRecord>) -> Self {
        let mut seen = SeenUrls::new();
        let mut records = Vec::with_capacity(prior.len().max(target));
        let total = prior.len();

        for record in prior {
            if record.url.is_empty() || !seen.add(&record.url) {
                continue;
            }
            records.push(record);
        }

        if records.len() < total {
            tracing::warn!(
                "Dropped {} prior rows with missing or duplicate URLs",
                total - records.len()
            );
        }

        let loaded = records.len();
        Self {
            target,
            records,
            seen,
            failed: SeenUrls::new(),
            loaded,
        }
    }

    /// Adds a record if its URL is new and the target is not yet met
    pub fn append(&mut self, record: JobRecord) -> AppendOutcome {
        if self.is_complete() {
            return AppendOutcome::TargetReached;
        }
        if !self.seen.add(&record.url) {
            return AppendOutcome::Duplicate;
        }
        self.records.push(record);
        AppendOutcome::Appended
    }

    /// Drops `url` from consideration for the rest of this run
    pub fn mark_failed(&mut self, url: &str) {
        if !self.seen.contains(url) {
            self.failed.add(url);
        }
    }

    /// True if `url` was collected, or already failed in this run
    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url) || self.failed.contains(url)
    }

    /// True if a record with this URL is held
    pub fn is_collected(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// URLs dropped in this run after a failed fetch or extraction
    pub fn failed(&self) -> usize {
        self.failed.len()
    }

    pub fn target(&self) -> usize {
        self.target
    }

    /// Records still needed to reach the target
    pub fn remaining(&self) -> usize {
        self.target.saturating_sub(self.records.len())
    }

    pub fn is_complete(&self) -> bool {
        self.records.len() >= self.target
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records carried over from the prior dataset
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// Number of records collected in this run
    pub fn added(&self) -> usize {
        self.records.len() - self.loaded
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<JobRecord> {
        self.records
    }
}
