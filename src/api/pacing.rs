// src/api/pacing.rs
//! Randomized pauses between requests.

use crate::constants::{DETAIL_DELAY_MAX_SECS, DETAIL_DELAY_MIN_SECS};
use crate::types::ValidationError;
use rand::Rng;
use std::time::Duration;

/// An inclusive range a pause length is drawn from uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    pub fn new(min: Duration, max: Duration) -> Result<Self, ValidationError> {
        if min > max {
            return Err(ValidationError::InvalidDelayRange {
                min_secs: min.as_secs_f64(),
                max_secs: max.as_secs_f64(),
            });
        }
        Ok(Self { min, max })
    }

    /// Builds a range from (possibly fractional) seconds, as given on the command line.
    pub fn from_secs_f64(min_secs: f64, max_secs: f64) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDelayRange { min_secs, max_secs };
        // Rejects negative, non-finite and out-of-range values
        let min = Duration::try_from_secs_f64(min_secs).map_err(|_| invalid())?;
        let max = Duration::try_from_secs_f64(max_secs).map_err(|_| invalid())?;
        Self::new(min, max)
    }

    /// No pause at all.
    pub const fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    /// Draws one pause length, at millisecond resolution.
    pub fn sample(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let low = self.min.as_millis() as u64;
        let high = self.max.as_millis() as u64;
        Duration::from_millis(rand::rng().random_range(low..=high))
    }

    /// Sleeps for one sampled pause.
    pub async fn pause(&self) {
        let delay = self.sample();
        if delay.is_zero() {
            return;
        }
        log::debug!("Pausing {:.1}s before request", delay.as_secs_f64());
        tokio::time::sleep(delay).await;
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(DETAIL_DELAY_MIN_SECS),
            max: Duration::from_secs(DETAIL_DELAY_MAX_SECS),
        }
    }
}
