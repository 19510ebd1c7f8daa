use super::{FetchRecord, RecordSink};
use crate::error::Result;
use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

/// Writes records as a single JSON array, one element per fetch.
pub struct JsonSink {
    file: File,
    first: bool,
}

impl JsonSink {
    pub fn new(path: PathBuf) -> Result<Self> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        write!(file, "[")?;

        Ok(Self { file, first: true })
    }
}

#[async_trait]
impl RecordSink for JsonSink {
    async fn write(&mut self, record: &FetchRecord) -> Result<()> {
        if !self.first {
            write!(self.file, ",")?;
        } else {
            self.first = false;
        }

        serde_json::to_writer(&mut self.file, record)?;
        self.file.flush()?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        write!(self.file, "]")?;
        self.file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchOutcome;
    use std::time::Duration;

    fn record(url: &str) -> FetchRecord {
        FetchRecord::from_outcome(&FetchOutcome {
            url: url.to_string(),
            status: Some(200),
            latency: Duration::from_millis(120),
            body: "<html></html>".to_string(),
            snippet: "hello".to_string(),
            succeeded: true,
        })
    }

    #[tokio::test]
    async fn writes_a_parseable_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        let mut sink = JsonSink::new(path.clone()).unwrap();
        sink.write(&record("https://example.com/a")).await.unwrap();
        sink.write(&record("https://example.com/b")).await.unwrap();
        sink.close().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<FetchRecord> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].url, "https://example.com/a");
        assert_eq!(parsed[1].url, "https://example.com/b");
    }

    #[tokio::test]
    async fn empty_run_produces_an_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        let mut sink = JsonSink::new(path.clone()).unwrap();
        sink.close().await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<FetchRecord> = serde_json::from_str(&content).unwrap();
        assert!(parsed.is_empty());
    }
}
