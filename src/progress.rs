use std::time::Duration;

/// Snapshot handed to observers after each processed outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub completed: u64,
    pub failures: u64,
    pub avg_latency: Duration,
    pub sleep_time: Duration,
}

/// Callback interface for live progress rendering.
///
/// The scheduler calls `on_progress` once per processed outcome, after the
/// throttle has been re-evaluated. Implementations must not block; the
/// consumer loop runs on their time.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, update: ProgressUpdate);
}

/// Observer that discards every update.
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_progress(&self, _update: ProgressUpdate) {}
}
