use crate::error::Result;
use crate::fetcher::FetchOutcome;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod console;
pub mod csv;
pub mod json;
pub mod sqlite;

/// One durable record per completed fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchRecord {
    pub url: String,
    pub status: Option<u16>,
    pub latency_secs: f64,
    pub timestamp: DateTime<Utc>,
    pub body: String,
    pub snippet: String,
}

impl FetchRecord {
    pub fn from_outcome(outcome: &FetchOutcome) -> Self {
        Self {
            url: outcome.url.clone(),
            status: outcome.status,
            latency_secs: outcome.latency.as_secs_f64(),
            timestamp: Utc::now(),
            body: outcome.body.clone(),
            snippet: outcome.snippet.clone(),
        }
    }
}

/// Destination for fetch records. Writes are issued one at a time by the
/// consumer loop; each write must be atomic per record.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn write(&mut self, record: &FetchRecord) -> Result<()>;
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
