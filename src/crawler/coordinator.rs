//! Crawler coordinator - main crawl orchestration logic
//!
//! A run moves through `Init → LoadExisting → Plan → Crawl → Finalize → Done`:
//! - `Init` builds the fetcher; failure here is fatal and nothing is touched
//! - `LoadExisting` seeds the crawl state from the canonical dataset
//! - `Plan` splits the remaining target across partitions, or skips straight
//!   to `Finalize` when the target is already met
//! - `Crawl` walks partitions, fetching listings and then postings up to quota
//! - `Finalize` writes the full record set and summarizes it
//!
//! A failed posting is logged and skipped; it never aborts the partition or
//! the run. Cancellation is checked between postings and flushes a checkpoint
//! before finalizing.

use crate::config::{validate, Config};
use crate::crawler::detail::extract_record;
use crate::crawler::fetcher::{FetchError, Fetcher, HttpRenderer, PageRenderer};
use crate::crawler::links::extract_links;
use crate::crawler::pacing::pacer_from_config;
use crate::crawler::planner::{plan, QuotaPlan};
use crate::output::CrawlSummary;
use crate::state::{AppendOutcome, CandidateLink, CrawlState, JobRecord, Partition};
use crate::storage::{open_store, CheckpointWriter, RecordStore};
use crate::HarvestError;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Init,
    LoadExisting,
    Plan,
    Crawl,
    Finalize,
    Done,
}

/// Why a posting was dropped
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{0}")]
    Parse(String),
}

/// Result of processing one candidate link
#[derive(Debug)]
pub enum LinkOutcome {
    Collected(JobRecord),
    Skipped { url: String, reason: SkipReason },
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Fetcher,
    partitions: Vec<Partition>,
    output: Box<dyn RecordStore>,
    checkpoints: CheckpointWriter,
    rng: StdRng,
    cancel: CancellationToken,
    phase: CrawlPhase,
    fresh: bool,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `fresh` - Ignore any existing dataset instead of resuming from it
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError::FetcherInit)` - No HTTP client could be built
    pub fn new(config: Config, fresh: bool) -> Result<Self, HarvestError> {
        let renderer = HttpRenderer::from_config(&config)?;
        Self::with_renderer(config, Arc::new(renderer), fresh)
    }

    /// Creates a coordinator around any page renderer
    pub fn with_renderer(
        config: Config,
        renderer: Arc<dyn PageRenderer>,
        fresh: bool,
    ) -> Result<Self, HarvestError> {
        validate(&config)?;
        let partitions = Partition::enumerate(&config)?;
        let fetcher = Fetcher::new(renderer, pacer_from_config(&config.crawler));
        let output = Box::new(open_store(&config.output.records_path));
        let checkpoints = CheckpointWriter::new(
            Box::new(open_store(&config.output.progress_path)),
            config.crawler.checkpoint_interval,
        );

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            partitions,
            output,
            checkpoints,
            rng: StdRng::from_os_rng(),
            cancel: CancellationToken::new(),
            phase: CrawlPhase::Init,
            fresh,
        })
    }

    /// Uses `token` to stop the run early
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Makes shuffling reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    /// Runs the crawl to completion
    ///
    /// Returns the summary of the dataset as written. Only storage failures
    /// on load or on the final write surface as errors.
    pub async fn run(&mut self) -> crate::Result<CrawlSummary> {
        let started_at = Utc::now();

        self.enter(CrawlPhase::LoadExisting);
        let prior = if self.fresh {
            tracing::info!("Fresh run: ignoring {}", self.output.describe());
            Vec::new()
        } else {
            self.output.load()?
        };
        let mut state = CrawlState::seeded(self.config.crawler.target_count, prior);
        tracing::info!("Loaded {} existing job records", state.loaded());

        self.enter(CrawlPhase::Plan);
        let mut cancelled = false;
        if state.remaining() == 0 {
            tracing::info!(
                "Target of {} already met with {} records, nothing to crawl",
                state.target(),
                state.len()
            );
        } else {
            let quota_plan = plan(state.remaining(), &self.partitions, &mut self.rng);
            tracing::info!(
                "Need {} more jobs; planning about {} per partition across {} partitions",
                quota_plan.remaining,
                quota_plan.quota,
                quota_plan.order.len()
            );

            self.enter(CrawlPhase::Crawl);
            cancelled = self.crawl(&mut state, &quota_plan).await;
        }

        self.enter(CrawlPhase::Finalize);
        self.output.save(state.records())?;
        tracing::info!(
            "Saved {} with {} jobs ({} new)",
            self.output.describe(),
            state.len(),
            state.added()
        );

        if state.failed() > 0 {
            tracing::info!("{} postings skipped after failures", state.failed());
        }

        let mut summary = CrawlSummary::from_records(
            state.records(),
            state.loaded(),
            state.target(),
            started_at,
        );
        summary.cancelled = cancelled;
        for share in &summary.by_region {
            tracing::info!("  {}: {} jobs ({:.1}%)", share.name, share.count, share.percent);
        }

        self.enter(CrawlPhase::Done);
        Ok(summary)
    }

    /// Walks partitions in plan order; returns true if cancelled
    async fn crawl(&mut self, state: &mut CrawlState, quota_plan: &QuotaPlan) -> bool {
        for partition in &quota_plan.order {
            if state.is_complete() {
                tracing::info!("Target of {} reached", state.target());
                break;
            }
            if self.cancel.is_cancelled() {
                self.flush_on_cancel(state);
                return true;
            }
            if self.crawl_partition(state, partition, quota_plan.quota).await {
                return true;
            }
        }
        false
    }

    /// Collects up to `quota` new postings from one partition; returns true if cancelled
    async fn crawl_partition(
        &mut self,
        state: &mut CrawlState,
        partition: &Partition,
        quota: usize,
    ) -> bool {
        tracing::info!("Scraping {}", partition);

        let listing = match self.fetcher.fetch(partition.listing_url()).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Skipping partition {}: {}", partition, e);
                return false;
            }
        };

        let candidates = extract_links(&listing, partition, &mut self.rng);
        let found = candidates.len();
        let mut links: Vec<CandidateLink<'_>> = candidates
            .into_iter()
            .filter(|link| !state.contains(link.url.as_str()))
            .collect();
        tracing::info!(
            "Found {} links on {}, {} new",
            found,
            partition.listing_url(),
            links.len()
        );

        if links.is_empty() {
            tracing::info!("No new links for {}, skipping", partition);
            return false;
        }
        links.truncate(quota);

        let mut added = 0;
        for (index, link) in links.iter().enumerate() {
            if self.cancel.is_cancelled() {
                self.flush_on_cancel(state);
                return true;
            }
            if state.is_complete() {
                break;
            }

            tracing::info!(
                "Processing job {}/{} ({}/{})",
                index + 1,
                links.len(),
                state.len() + 1,
                state.target()
            );

            match self.process_link(link).await {
                LinkOutcome::Collected(record) => match state.append(record) {
                    AppendOutcome::Appended => {
                        added += 1;
                        if let Err(e) = self.checkpoints.maybe_checkpoint(state.records()) {
                            tracing::error!("Checkpoint failed: {}", e);
                        }
                    }
                    AppendOutcome::Duplicate => {
                        tracing::debug!("Already collected {}", link.url);
                    }
                    AppendOutcome::TargetReached => break,
                },
                LinkOutcome::Skipped { url, reason } => {
                    tracing::warn!("Skipping {}: {}", url, reason);
                    state.mark_failed(&url);
                }
            }
        }

        tracing::info!("Collected {} jobs from {}", added, partition);
        false
    }

    /// Fetches and extracts one posting
    pub async fn process_link(&self, link: &CandidateLink<'_>) -> LinkOutcome {
        let html = match self.fetcher.fetch(&link.url).await {
            Ok(html) => html,
            Err(e) => {
                return LinkOutcome::Skipped {
                    url: link.url.to_string(),
                    reason: e.into(),
                }
            }
        };

        match extract_record(&html, link) {
            Ok(record) => LinkOutcome::Collected(record),
            Err(e) => LinkOutcome::Skipped {
                url: link.url.to_string(),
                reason: SkipReason::Parse(e.to_string()),
            },
        }
    }

    fn flush_on_cancel(&mut self, state: &CrawlState) {
        tracing::warn!("Crawl cancelled with {} records, saving progress", state.len());
        if let Err(e) = self.checkpoints.flush(state.records()) {
            tracing::error!("Checkpoint on cancel failed: {}", e);
        }
    }

    fn enter(&mut self, phase: CrawlPhase) {
        tracing::debug!("Crawl phase {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}

/// Runs a crawl with the HTTP fetcher, resuming from any existing dataset
///
/// # Example
///
/// ```no_run
/// use job_harvest::config::load_config;
/// use job_harvest::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let summary = run_crawl(config).await?;
/// println!("{} records", summary.total_records);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlSummary, HarvestError> {
    let mut coordinator = Coordinator::new(config, false)?;
    coordinator.run().await
}
