//! Background worker that drains the job queue.
//!
//! Claims ready jobs in batches, dispatches each through the registry,
//! and records the outcome. Retry scheduling lives in the queue's
//! `mark_failed`; the runner only classifies the failure. A job that
//! errors affects nothing but its own row.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::job::{ErrorKind, Job};
use super::queue::JobQueue;
use super::registry::SharedJobRegistry;
use crate::kernel::ServerDeps;

#[derive(Debug, Clone)]
pub struct JobRunnerConfig {
    pub batch_size: i64,
    /// Sleep between polls when the queue is idle.
    pub poll_interval: Duration,
    pub worker_id: String,
}

impl Default for JobRunnerConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            poll_interval: Duration::from_secs(1),
            worker_id: format!("runner-{}", Uuid::new_v4()),
        }
    }
}

/// Polls the queue and executes jobs until shutdown is signalled.
pub struct JobRunner {
    job_queue: Arc<dyn JobQueue>,
    registry: SharedJobRegistry,
    deps: Arc<ServerDeps>,
    config: JobRunnerConfig,
    shutdown: Arc<AtomicBool>,
}

impl JobRunner {
    pub fn new(
        job_queue: Arc<dyn JobQueue>,
        registry: SharedJobRegistry,
        deps: Arc<ServerDeps>,
    ) -> Self {
        Self {
            job_queue,
            registry,
            deps,
            config: JobRunnerConfig::default(),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Handle for signalling shutdown; store `true` to stop the loop.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        self.shutdown.clone()
    }

    fn stopping(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    pub async fn run(self) -> Result<()> {
        info!(
            worker_id = %self.config.worker_id,
            batch_size = self.config.batch_size,
            "job runner started"
        );

        while !self.stopping() {
            let batch = match self
                .job_queue
                .claim(&self.config.worker_id, self.config.batch_size)
                .await
            {
                Ok(batch) => batch,
                Err(e) => {
                    error!(error = %e, "claiming jobs failed");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    continue;
                }
            };

            if batch.is_empty() {
                tokio::time::sleep(self.config.poll_interval).await;
                continue;
            }

            debug!(count = batch.len(), "claimed job batch");

            for job in batch {
                if self.stopping() {
                    break;
                }
                self.process(job).await;
            }
        }

        info!(worker_id = %self.config.worker_id, "job runner stopped");
        Ok(())
    }

    /// Execute one claimed job and record its outcome on the queue.
    async fn process(&self, job: Job) {
        let job_id = job.id;
        let job_type = job.job_type.clone();

        match self.registry.execute(&job, self.deps.clone()).await {
            Ok(()) => {
                info!(job_id = %job_id, job_type = %job_type, "job succeeded");
                if let Err(e) = self.job_queue.mark_succeeded(job_id).await {
                    error!(job_id = %job_id, error = %e, "recording job success failed");
                }
            }
            Err(e) => {
                warn!(job_id = %job_id, job_type = %job_type, error = %e, "job failed");
                let kind = classify_error(&e);
                if let Err(mark_err) = self.job_queue.mark_failed(job_id, &e.to_string(), kind).await
                {
                    error!(job_id = %job_id, error = %mark_err, "recording job failure failed");
                }
            }
        }
    }
}

/// Classify an error to determine retry behavior.
///
/// Transient errors (network failures, timeouts) are retryable; bad
/// payloads and missing records are not.
pub fn classify_error(error: &anyhow::Error) -> ErrorKind {
    let error_str = error.to_string().to_lowercase();

    if error_str.contains("not found") || error_str.contains("invalid") {
        return ErrorKind::NonRetryable;
    }

    if error_str.contains("deserialize") || error_str.contains("unknown job type") {
        return ErrorKind::NonRetryable;
    }

    ErrorKind::Retryable
}
