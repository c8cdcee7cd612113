//! Dataset freshness timestamp.

use std::sync::atomic::{AtomicI64, Ordering};

use crate::types::{now_epoch_seconds, EpochSeconds};

/// When the dataset refresh was last triggered, in epoch seconds.
///
/// Shared between the refresh scheduler (writer) and the request handlers
/// (readers). The value only ever moves forward.
#[derive(Debug)]
pub struct FreshnessTracker {
    last_updated: AtomicI64,
}

impl FreshnessTracker {
    /// Start tracking from the current time.
    pub fn new() -> Self {
        Self::starting_at(now_epoch_seconds())
    }

    pub fn starting_at(epoch: EpochSeconds) -> Self {
        Self {
            last_updated: AtomicI64::new(epoch),
        }
    }

    pub fn last_updated(&self) -> EpochSeconds {
        self.last_updated.load(Ordering::Acquire)
    }

    /// Record a refresh at `epoch`. Older values are ignored.
    ///
    /// Returns the value held afterwards.
    pub fn record(&self, epoch: EpochSeconds) -> EpochSeconds {
        let previous = self.last_updated.fetch_max(epoch, Ordering::AcqRel);
        previous.max(epoch)
    }

    /// Record a refresh happening now.
    pub fn touch(&self) -> EpochSeconds {
        self.record(now_epoch_seconds())
    }
}

impl Default for FreshnessTracker {
    fn default() -> Self {
        Self::new()
    }
}
