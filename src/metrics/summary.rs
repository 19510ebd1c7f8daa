use serde::{Deserialize, Serialize};

/// End-of-run accounting emitted once all outcomes have been processed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_urls: usize,
    pub workers: usize,
    pub successes: u64,
    pub failures: u64,
    pub avg_latency_secs: f64,
}
