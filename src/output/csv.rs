use super::{FetchRecord, RecordSink};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::PathBuf;

pub struct CsvSink {
    writer: csv::Writer<std::fs::File>,
    headers_written: bool,
}

impl CsvSink {
    pub fn new(path: PathBuf) -> Result<Self> {
        let writer =
            csv::Writer::from_path(path).map_err(|e| Error::Internal(e.to_string()))?;

        Ok(Self {
            writer,
            headers_written: false,
        })
    }
}

#[async_trait]
impl RecordSink for CsvSink {
    async fn write(&mut self, record: &FetchRecord) -> Result<()> {
        if !self.headers_written {
            self.writer
                .write_record([
                    "url",
                    "status",
                    "latency_secs",
                    "timestamp",
                    "body",
                    "snippet",
                ])
                .map_err(|e| Error::Internal(e.to_string()))?;
            self.headers_written = true;
        }

        self.writer
            .write_record([
                record.url.as_str(),
                &record.status.map(|s| s.to_string()).unwrap_or_default(),
                &format!("{:.6}", record.latency_secs),
                &record.timestamp.to_rfc3339(),
                record.body.as_str(),
                record.snippet.as_str(),
            ])
            .map_err(|e| Error::Internal(e.to_string()))?;

        self.writer
            .flush()
            .map_err(|e| Error::Internal(e.to_string()))?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::Internal(e.to_string()))?;
        Ok(())
    }
}
