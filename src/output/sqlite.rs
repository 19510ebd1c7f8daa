use super::{FetchRecord, RecordSink};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use std::path::PathBuf;

/// Durable sink backed by a sqlite database. The connection is established
/// and the table created up front, so a broken backend fails the run before
/// any task is submitted.
pub struct SqliteSink {
    pool: SqlitePool,
    table: String,
}

impl SqliteSink {
    pub async fn new(path: PathBuf, table: String) -> Result<Self> {
        let conn_str = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&conn_str).await?;

        let query = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY,
                url TEXT NOT NULL,
                status INTEGER,
                latency_secs REAL NOT NULL,
                timestamp TEXT NOT NULL,
                body TEXT NOT NULL,
                snippet TEXT NOT NULL
            )",
            table
        );
        sqlx::query(&query).execute(&pool).await?;

        Ok(Self { pool, table })
    }
}

#[async_trait]
impl RecordSink for SqliteSink {
    async fn write(&mut self, record: &FetchRecord) -> Result<()> {
        let query = format!(
            "INSERT INTO {} (url, status, latency_secs, timestamp, body, snippet)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            self.table
        );

        sqlx::query(&query)
            .bind(&record.url)
            .bind(record.status.map(i64::from))
            .bind(record.latency_secs)
            .bind(record.timestamp.to_rfc3339())
            .bind(&record.body)
            .bind(&record.snippet)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::FetchOutcome;
    use sqlx::Row;
    use std::time::Duration;

    #[tokio::test]
    async fn writes_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scout.db");

        let mut sink = SqliteSink::new(path.clone(), "fetch_results".to_string())
            .await
            .unwrap();

        let outcome = FetchOutcome {
            url: "https://example.com/".to_string(),
            status: Some(200),
            latency: Duration::from_millis(340),
            body: "<html><body>hi</body></html>".to_string(),
            snippet: "hi".to_string(),
            succeeded: true,
        };
        sink.write(&FetchRecord::from_outcome(&outcome)).await.unwrap();

        let failed = FetchOutcome {
            url: "https://example.org/".to_string(),
            status: None,
            latency: Duration::from_secs(5),
            body: String::new(),
            snippet: String::new(),
            succeeded: false,
        };
        sink.write(&FetchRecord::from_outcome(&failed)).await.unwrap();

        let pool = SqlitePool::connect(&format!("sqlite:{}", path.display()))
            .await
            .unwrap();
        let rows = sqlx::query("SELECT url, status FROM fetch_results ORDER BY id")
            .fetch_all(&pool)
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get::<String, _>("url"), "https://example.com/");
        assert_eq!(rows[0].get::<Option<i64>, _>("status"), Some(200));
        assert_eq!(rows[1].get::<Option<i64>, _>("status"), None);

        sink.close().await.unwrap();
    }

    #[tokio::test]
    async fn unreachable_database_fails_at_setup() {
        let result =
            SqliteSink::new(PathBuf::from("/nonexistent/dir/scout.db"), "t".to_string()).await;
        assert!(result.is_err());
    }
}
