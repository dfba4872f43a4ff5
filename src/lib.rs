//! Job-Harvest: an incremental, polite job-listing crawler
//!
//! This crate collects a bounded number of job postings spread fairly across
//! many (region, category) partitions of a classifieds site. Runs resume from
//! a previously written dataset without re-fetching known postings, and
//! progress is checkpointed so a crash loses at most one interval of work.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for Job-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to initialize fetcher: {reason}")]
    FetcherInit { reason: String },

    #[error("HTML parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Invalid partition {region}/{category}: {reason}")]
    InvalidPartition {
        region: String,
        category: String,
        reason: String,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Job-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlPhase};
pub use state::{CrawlState, JobRecord, Partition};
