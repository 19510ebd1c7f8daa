use crate::fetcher::FetchOutcome;
use crate::metrics::summary::RunSummary;
use std::time::Duration;

/// Number of trailing latency samples the rolling average covers.
pub const LATENCY_WINDOW: usize = 10;

/// Additive step applied to the delay on an overload signal.
pub const SLEEP_INCREMENT: Duration = Duration::from_millis(100);

/// Additive step removed from the delay when the run looks healthy.
pub const SLEEP_DECREMENT: Duration = Duration::from_millis(50);

/// Upper bound on the inter-completion delay.
pub const SLEEP_CAP: Duration = Duration::from_secs(2);

/// Mutable per-run accounting plus the adaptive throttle state.
///
/// Owned by the single task that consumes the completion stream; workers
/// never touch it, so no synchronization is needed. `completed` equals
/// `latencies.len()` at every observation point.
#[derive(Debug)]
pub struct RunMetrics {
    completed: u64,
    failures: u64,
    successes: u64,
    latencies: Vec<Duration>,
    sleep_time: Duration,
    max_latency: Duration,
    max_failures: u64,
    adaptive: bool,
}

impl RunMetrics {
    pub fn new(max_latency: Duration, max_failures: u64, adaptive: bool) -> Self {
        Self {
            completed: 0,
            failures: 0,
            successes: 0,
            latencies: Vec::new(),
            sleep_time: Duration::ZERO,
            max_latency,
            max_failures,
            adaptive,
        }
    }

    /// Records one completed outcome and re-evaluates the throttle.
    ///
    /// The failure counter is cumulative over the whole run yet compared
    /// against `max_failures` on every iteration; see DESIGN.md for the
    /// windowed alternative.
    pub fn observe(&mut self, outcome: &FetchOutcome) {
        self.latencies.push(outcome.latency);
        self.completed += 1;
        if !outcome.succeeded {
            self.failures += 1;
        } else if outcome.status == Some(200) {
            self.successes += 1;
        }
        self.adjust();
    }

    /// Mean of the trailing `LATENCY_WINDOW` samples, or of all samples
    /// while fewer have been recorded. Recomputed from scratch each call.
    pub fn avg_latency(&self) -> Duration {
        if self.latencies.is_empty() {
            return Duration::ZERO;
        }
        let tail = if self.latencies.len() >= LATENCY_WINDOW {
            &self.latencies[self.latencies.len() - LATENCY_WINDOW..]
        } else {
            &self.latencies[..]
        };
        tail.iter().sum::<Duration>() / tail.len() as u32
    }

    // One AIAD step per completion. The increase is twice the decrease, so
    // the throttle backs off faster than it recovers.
    fn adjust(&mut self) {
        if !self.adaptive {
            return;
        }
        if self.avg_latency() > self.max_latency || self.failures > self.max_failures {
            self.sleep_time = (self.sleep_time + SLEEP_INCREMENT).min(SLEEP_CAP);
        } else {
            self.sleep_time = self.sleep_time.saturating_sub(SLEEP_DECREMENT);
        }
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn sleep_time(&self) -> Duration {
        self.sleep_time
    }

    pub fn latencies(&self) -> &[Duration] {
        &self.latencies
    }

    /// Overall mean latency across the whole run, for the final summary.
    pub fn overall_avg_latency(&self) -> Duration {
        if self.latencies.is_empty() {
            return Duration::ZERO;
        }
        self.latencies.iter().sum::<Duration>() / self.latencies.len() as u32
    }

    pub fn summary(&self, total_urls: usize, workers: usize) -> RunSummary {
        RunSummary {
            total_urls,
            workers,
            successes: self.successes,
            failures: self.failures,
            avg_latency_secs: self.overall_avg_latency().as_secs_f64(),
        }
    }
}
