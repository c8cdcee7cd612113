/// Timestamps exposed over the API are whole seconds since the Unix epoch.
pub type EpochSeconds = i64;

/// Current wall-clock time in epoch seconds.
pub fn now_epoch_seconds() -> EpochSeconds {
    chrono::Utc::now().timestamp()
}
