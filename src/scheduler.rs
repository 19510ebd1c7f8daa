use crate::config::RunConfig;
use crate::error::Result;
use crate::fetcher::{self, FetchOutcome};
use crate::metrics::{RunMetrics, RunSummary};
use crate::output::{FetchRecord, RecordSink};
use crate::progress::{ProgressObserver, ProgressUpdate};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, mpsc};
use tokio::time::sleep;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Bounded worker pool plus the sequential consumer that drives the
/// adaptive rate controller.
///
/// All tasks are spawned up front, gated by a semaphore of `workers`
/// permits; the pool size never changes during a run. Outcomes cross the
/// concurrency boundary on an unbounded channel and are consumed strictly
/// in completion order. The consumer owns all metric state and is the only
/// place the inter-completion delay is applied, so in-flight requests keep
/// running while it sleeps.
pub struct FetchEngine {
    config: RunConfig,
}

impl FetchEngine {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub async fn run(
        &self,
        sink: &mut dyn RecordSink,
        observer: &dyn ProgressObserver,
    ) -> Result<RunSummary> {
        let client = fetcher::build_client(self.config.timeout())?;
        let permits = Arc::new(Semaphore::new(self.config.workers));
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel::<FetchOutcome>();

        for url in self.config.urls.iter().cloned() {
            let client = client.clone();
            let permits = permits.clone();
            let outcome_tx = outcome_tx.clone();
            let snippet_chars = self.config.snippet_chars;

            tokio::spawn(async move {
                // The semaphore is never closed; acquisition only waits.
                let _permit = permits
                    .acquire_owned()
                    .await
                    .expect("worker semaphore closed");
                let outcome = fetcher::fetch(&client, url, snippet_chars).await;
                // A send error means the consumer is gone and the run is over.
                let _ = outcome_tx.send(outcome);
            });
        }
        drop(outcome_tx);

        let mut metrics = RunMetrics::new(
            self.config.max_latency(),
            self.config.max_failures,
            self.config.adaptive,
        );
        let mut completions = UnboundedReceiverStream::new(outcome_rx);

        while let Some(outcome) = completions.next().await {
            metrics.observe(&outcome);

            let record = FetchRecord::from_outcome(&outcome);
            if let Err(e) = sink.write(&record).await {
                // Best-effort sink: one lost record must not stop the run.
                log::error!("Failed to persist record for {}: {}", record.url, e);
            }

            observer.on_progress(ProgressUpdate {
                completed: metrics.completed(),
                failures: metrics.failures(),
                avg_latency: metrics.avg_latency(),
                sleep_time: metrics.sleep_time(),
            });

            if metrics.sleep_time() > Duration::ZERO {
                sleep(metrics.sleep_time()).await;
            }
        }

        sink.close().await?;

        Ok(metrics.summary(self.config.urls.len(), self.config.workers))
    }
}
