use serde::Deserialize;
use std::time::Duration;

/// Desktop Chrome identity presented when the config does not override it
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36";

/// Main configuration structure for Job-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub site: SiteConfig,
    pub output: OutputConfig,
    #[serde(default, rename = "region")]
    pub regions: Vec<RegionEntry>,
    #[serde(default, rename = "category")]
    pub categories: Vec<CategoryEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Total number of records the dataset should hold
    #[serde(rename = "target-count")]
    pub target_count: usize,

    /// Number of records between progress checkpoints
    #[serde(rename = "checkpoint-interval", default = "default_checkpoint_interval")]
    pub checkpoint_interval: usize,

    /// Lower bound of the politeness delay after each fetch (milliseconds)
    #[serde(rename = "min-delay-ms", default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Upper bound of the politeness delay after each fetch (milliseconds)
    #[serde(rename = "max-delay-ms", default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How fetches are spaced out
    #[serde(default)]
    pub pacing: PacingMode,
}

/// Politeness strategy applied after every fetch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PacingMode {
    /// Sleep a uniformly random time within the delay range
    #[default]
    RandomDelay,
    /// At most one fetch per `min-delay-ms`, shared by every caller
    TokenBucket,
}

impl CrawlerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

fn default_checkpoint_interval() -> usize {
    25
}

fn default_min_delay_ms() -> u64 {
    2000
}

fn default_max_delay_ms() -> u64 {
    7000
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Client identity configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Full User-Agent header value
    #[serde(default = "default_user_agent")]
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Site layout: how a partition maps onto listing URLs
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base origin for a region, with a `{region}` placeholder
    #[serde(rename = "origin-template")]
    pub origin_template: String,

    /// Listing path relative to the origin, with a `{category}` placeholder
    #[serde(rename = "listing-path", default = "default_listing_path")]
    pub listing_path: String,
}

fn default_listing_path() -> String {
    "/search/{category}".to_string()
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Canonical dataset, read on startup and written on completion
    #[serde(rename = "records-path")]
    pub records_path: String,

    /// Progress checkpoint file, kept apart from the canonical dataset
    #[serde(rename = "progress-path")]
    pub progress_path: String,
}

/// A site region (e.g. a city subdomain)
#[derive(Debug, Clone, Deserialize)]
pub struct RegionEntry {
    pub code: String,
}

/// A listing category and its human-readable label
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    pub code: String,
    pub label: String,
}
