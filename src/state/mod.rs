//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `Partition`: one (region, category) listing the crawler visits
//! - `JobRecord`: one collected posting, the unit of output
//! - `SeenUrls`: the set of posting URLs already collected
//! - `CrawlState`: the record sequence for one run, which owns the seen set

mod crawl_state;
mod partition;
mod record;
mod seen;

// Re-export main types
pub use crawl_state::{AppendOutcome, CrawlState};
pub use partition::{CandidateLink, Partition};
pub use record::JobRecord;
pub use seen::SeenUrls;
