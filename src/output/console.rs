use super::{FetchRecord, RecordSink};
use crate::error::Result;
use async_trait::async_trait;
use indicatif::MultiProgress;
use std::sync::Arc;

pub struct ConsoleSink {
    multi: Option<Arc<MultiProgress>>,
}

impl ConsoleSink {
    pub fn new(multi: Option<Arc<MultiProgress>>) -> Self {
        Self { multi }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl RecordSink for ConsoleSink {
    async fn write(&mut self, record: &FetchRecord) -> Result<()> {
        // The raw body is not worth a terminal dump; print everything else.
        let line = serde_json::json!({
            "url": record.url,
            "status": record.status,
            "latency_secs": record.latency_secs,
            "timestamp": record.timestamp,
            "snippet": record.snippet,
        })
        .to_string();

        if let Some(multi) = &self.multi {
            multi.println(&line)?;
        } else {
            println!("{}", line);
        }
        Ok(())
    }
}
