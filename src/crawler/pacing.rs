//! Politeness pacing between fetches
//!
//! Callers only ever `await_slot()`; whether that is a random sleep or a
//! shared token bucket is decided when the crawler is built.

use crate::config::{CrawlerConfig, PacingMode};
use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use rand::Rng;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Something that decides when the next request may go out
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn await_slot(&self);
}

/// Sleeps a uniformly random duration in `[min, max]`
#[derive(Debug, Clone)]
pub struct RandomDelay {
    min: Duration,
    max: Duration,
}

impl RandomDelay {
    /// Creates a delay range; bounds given in the wrong order are swapped
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Picks the next pause
    pub fn next_delay(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let millis = rand::rng().random_range(self.min.as_millis()..=self.max.as_millis());
        Duration::from_millis(millis as u64)
    }
}

#[async_trait]
impl Pacer for RandomDelay {
    async fn await_slot(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tracing::trace!("Pausing {:?} before next request", delay);
            tokio::time::sleep(delay).await;
        }
    }
}

/// Token bucket shared by every caller: one slot per `period`
pub struct TokenBucket {
    limiter: DefaultDirectRateLimiter,
}

impl TokenBucket {
    /// Returns `None` when `period` is zero
    pub fn new(period: Duration) -> Option<Self> {
        let quota = Quota::with_period(period)?.allow_burst(NonZeroU32::MIN);
        Some(Self {
            limiter: RateLimiter::direct(quota),
        })
    }
}

#[async_trait]
impl Pacer for TokenBucket {
    async fn await_slot(&self) {
        self.limiter.until_ready().await;
    }
}

/// Builds the pacer selected by `[crawler] pacing`
pub fn pacer_from_config(config: &CrawlerConfig) -> Arc<dyn Pacer> {
    let random = || -> Arc<dyn Pacer> {
        Arc::new(RandomDelay::new(config.min_delay(), config.max_delay()))
    };

    match config.pacing {
        PacingMode::RandomDelay => random(),
        PacingMode::TokenBucket => match TokenBucket::new(config.min_delay()) {
            Some(bucket) => Arc::new(bucket),
            None => {
                tracing::warn!("Token bucket needs a non-zero period, using random delay");
                random()
            }
        },
    }
}
