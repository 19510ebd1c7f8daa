pub mod config;
pub mod error;
pub mod fetcher;
pub mod metrics;
pub mod output;
pub mod progress;
pub mod scheduler;

pub use config::{ConfigLoader, OutputConfig, RunConfig};
pub use error::{Error, Result};
pub use fetcher::FetchOutcome;
pub use metrics::{RunMetrics, RunSummary};
pub use output::{FetchRecord, RecordSink};
pub use progress::{NullObserver, ProgressObserver, ProgressUpdate};
pub use scheduler::FetchEngine;
