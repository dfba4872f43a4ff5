//! Crawler module for collecting job postings
//!
//! This module contains the core crawling logic, including:
//! - Page fetching behind the `PageRenderer` capability, with pacing
//! - Listing page link extraction and posting detail extraction
//! - Per-partition quota planning
//! - Overall crawl coordination

mod coordinator;
mod detail;
mod fetcher;
mod links;
mod pacing;
mod planner;

pub use coordinator::{run_crawl, Coordinator, CrawlPhase, LinkOutcome, SkipReason};
pub use detail::{extract_record, strip_artifact, QR_CODE_ARTIFACT};
pub use fetcher::{FetchError, Fetcher, HttpRenderer, PageRenderer};
pub use links::extract_links;
pub use pacing::{pacer_from_config, Pacer, RandomDelay, TokenBucket};
pub use planner::{plan, QuotaPlan};
