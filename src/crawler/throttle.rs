//! Politeness delay between requests
//!
//! The crawl is sequential, so a single pause after each fetched URL is the
//! whole rate limit. The pause is the configured delay raised to any
//! robots.txt crawl-delay, then spread by a symmetric random jitter.

use crate::config::MAX_DELAY_SECS;
use rand::Rng;
use std::time::Duration;

/// Computes and applies the pause between consecutive fetches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throttle {
    base: Duration,
    jitter: Duration,
}

impl Throttle {
    /// Creates a throttle from seconds
    ///
    /// Negative values and NaN count as zero; oversized values are clamped to
    /// [`MAX_DELAY_SECS`].
    pub fn new(delay_secs: f64, jitter_secs: f64) -> Self {
        Self {
            base: secs(delay_secs),
            jitter: secs(jitter_secs),
        }
    }

    /// Raises the base delay to at least `floor`
    pub fn with_floor(mut self, floor: Option<Duration>) -> Self {
        if let Some(floor) = floor {
            self.base = self.base.max(floor);
        }
        self
    }

    pub fn base(&self) -> Duration {
        self.base
    }

    /// Picks the next pause: `base ± jitter`, never negative
    ///
    /// A zero base disables pausing entirely, jitter included.
    pub fn next_delay(&self) -> Duration {
        if self.base.is_zero() {
            return Duration::ZERO;
        }
        if self.jitter.is_zero() {
            return self.base;
        }

        let spread = self.jitter.as_secs_f64();
        let offset = rand::thread_rng().gen_range(-spread..=spread);
        secs(self.base.as_secs_f64() + offset)
    }

    /// Sleeps for the next pause
    pub async fn wait(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tracing::trace!("Sleeping {:?} before next request", delay);
            tokio::time::sleep(delay).await;
        }
    }
}

/// Converts seconds, clamping to `[0, MAX_DELAY_SECS]`; NaN counts as zero
fn secs(value: f64) -> Duration {
    if value.is_nan() || value <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(value.min(MAX_DELAY_SECS)).unwrap_or(Duration::ZERO)
}
