//! Dataset updater capability.
//!
//! The listings table is rebuilt by an external program. The service only
//! needs to start it and learn whether it failed, so the capability is a
//! single [`Updater::trigger`] operation. [`CommandUpdater`] is the
//! subprocess-backed implementation; tests substitute their own.

pub mod command;

pub use command::CommandUpdater;

/// Result of one updater run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Success,
    /// The run failed; the string is a human-readable reason for the log.
    Failure(String),
}

impl UpdateOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, UpdateOutcome::Success)
    }
}

/// Something that can refresh the listings dataset.
#[async_trait::async_trait]
pub trait Updater: Send + Sync {
    /// Run one refresh to completion and report how it went.
    async fn trigger(&self) -> UpdateOutcome;
}
