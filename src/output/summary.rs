//! Summary of a dataset by partition

use crate::state::JobRecord;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// A count and its share of the whole dataset
#[derive(Debug, Clone, PartialEq)]
pub struct ShareCount {
    pub name: String,
    pub count: usize,
    pub percent: f64,
}

/// End-of-run summary
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Records in the dataset
    pub total_records: usize,

    /// Records carried over from the prior dataset
    pub loaded_records: usize,

    /// Records collected by this run
    pub added_records: usize,

    /// The configured target
    pub target_count: usize,

    /// Whether the run was interrupted before finishing its plan
    pub cancelled: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Counts by region, largest first
    pub by_region: Vec<ShareCount>,

    /// Counts by category label, largest first
    pub by_category: Vec<ShareCount>,
}

impl CrawlSummary {
    /// Summarizes `records` as they stand at the end of a run
    pub fn from_records(
        records: &[JobRecord],
        loaded_records: usize,
        target_count: usize,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            total_records: records.len(),
            loaded_records,
            added_records: records.len().saturating_sub(loaded_records),
            target_count,
            cancelled: false,
            started_at,
            finished_at: Utc::now(),
            by_region: count_by(records, |r| r.partition_region.as_str()),
            by_category: count_by(records, |r| r.partition_category.as_str()),
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    pub fn target_reached(&self) -> bool {
        self.total_records >= self.target_count
    }
}

/// Counts records by a key, sorted by count descending then name
pub fn count_by<F>(records: &[JobRecord], key: F) -> Vec<ShareCount>
where
    F: Fn(&JobRecord) -> &str,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(key(record)).or_insert(0) += 1;
    }

    let total = records.len();
    let mut shares: Vec<ShareCount> = counts
        .into_iter()
        .map(|(name, count)| ShareCount {
            name: name.to_string(),
            count,
            percent: if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            },
        })
        .collect();

    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    shares
}

/// Prints the summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Overview:");
    println!(
        "  Records: {} / {} target{}",
        summary.total_records,
        summary.target_count,
        if summary.target_reached() { " (reached)" } else { "" }
    );
    println!("  Loaded from previous runs: {}", summary.loaded_records);
    println!("  Collected this run: {}", summary.added_records);
    println!("  Duration: {}s", summary.duration_seconds());
    if summary.cancelled {
        println!("  Run was interrupted; progress was saved");
    }
    println!();

    print_shares("Jobs by region", &summary.by_region);
    print_shares("Jobs by category", &summary.by_category);
}

fn print_shares(title: &str, shares: &[ShareCount]) {
    if shares.is_empty() {
        return;
    }
    println!("{}:", title);
    for share in shares {
        let name = if share.name.is_empty() {
            "(unknown)"
        } else {
            share.name.as_str()
        };
        println!("  {}: {} jobs ({:.1}%)", name, share.count, share.percent);
    }
    println!();
}
