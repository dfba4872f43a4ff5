//! Output module for crawl summaries
//!
//! This module handles:
//! - Counting records by region and by category
//! - Printing the end-of-run summary

mod summary;

pub use summary::{count_by, print_summary, CrawlSummary, ShareCount};
