//! PostgreSQL-backed job queue.
//!
//! Stores serialized commands in the `jobs` table. Claiming uses
//! `FOR UPDATE SKIP LOCKED` so concurrent workers never grab the same row.
//! Failed jobs are retried in place with exponential backoff until
//! `max_retries` is exhausted, then dead-lettered.

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::job::{ErrorKind, Job, JobCommand, JobStatus};

/// Trait for job queue operations.
///
/// Handlers hold this as `Arc<dyn JobQueue>` so tests can substitute an
/// alternative backend without touching the HTTP layer.
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Enqueue a pre-serialized payload for immediate execution.
    async fn enqueue_raw(
        &self,
        job_type: &str,
        args: serde_json::Value,
        max_retries: i32,
    ) -> Result<Uuid>;

    /// Claim up to `limit` ready jobs for processing.
    async fn claim(&self, worker_id: &str, limit: i64) -> Result<Vec<Job>>;

    /// Mark a job as successfully completed.
    async fn mark_succeeded(&self, job_id: Uuid) -> Result<()>;

    /// Mark a job as failed.
    ///
    /// Retryable failures with retries remaining are re-queued with
    /// exponential backoff; everything else goes to dead letter.
    async fn mark_failed(&self, job_id: Uuid, error: &str, kind: ErrorKind) -> Result<()>;
}

impl dyn JobQueue {
    /// Serialize and enqueue a typed command.
    pub async fn enqueue<C>(&self, command: &C) -> Result<Uuid>
    where
        C: JobCommand + Serialize + Sync,
    {
        let args = serde_json::to_value(command)?;
        self.enqueue_raw(C::JOB_TYPE, args, C::MAX_RETRIES).await
    }
}

/// PostgreSQL-backed job queue implementation.
pub struct PgJobQueue {
    pool: PgPool,
}

impl PgJobQueue {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobQueue for PgJobQueue {
    async fn enqueue_raw(
        &self,
        job_type: &str,
        args: serde_json::Value,
        max_retries: i32,
    ) -> Result<Uuid> {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO jobs (job_type, args, max_retries)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(job_type)
        .bind(&args)
        .bind(max_retries)
        .fetch_one(&self.pool)
        .await?;

        info!(job_id = %id, job_type = %job_type, "job enqueued");
        Ok(id)
    }

    async fn claim(&self, worker_id: &str, limit: i64) -> Result<Vec<Job>> {
        sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = $1,
                worker_id = $2,
                updated_at = NOW()
            WHERE id IN (
                SELECT id FROM jobs
                WHERE status = $3 AND run_at <= NOW()
                ORDER BY run_at
                LIMIT $4
                FOR UPDATE SKIP LOCKED
            )
            RETURNING *
            "#,
        )
        .bind(JobStatus::Running.as_str())
        .bind(worker_id)
        .bind(JobStatus::Pending.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(Into::into)
    }

    async fn mark_succeeded(&self, job_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE jobs
            SET status = $1,
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(JobStatus::Succeeded.as_str())
        .bind(job_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn mark_failed(&self, job_id: Uuid, error: &str, kind: ErrorKind) -> Result<()> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(job_id)
            .fetch_one(&self.pool)
            .await?;

        if kind.should_retry() && job.retry_count < job.max_retries {
            // Exponential backoff, capped at 5 minutes
            let delay_secs = 2i64.pow(job.retry_count as u32).min(300);

            sqlx::query(
                r#"
                UPDATE jobs
                SET status = $1,
                    retry_count = retry_count + 1,
                    run_at = NOW() + ($2 || ' seconds')::INTERVAL,
                    error_message = $3,
                    error_kind = $4,
                    worker_id = NULL,
                    updated_at = NOW()
                WHERE id = $5
                "#,
            )
            .bind(JobStatus::Pending.as_str())
            .bind(delay_secs.to_string())
            .bind(error)
            .bind(kind.as_str())
            .bind(job_id)
            .execute(&self.pool)
            .await?;

            info!(
                job_id = %job_id,
                retry_count = job.retry_count + 1,
                delay_secs = delay_secs,
                "job scheduled for retry"
            );
        } else {
            sqlx::query(
                r#"
                UPDATE jobs
                SET status = $1,
                    error_message = $2,
                    error_kind = $3,
                    updated_at = NOW()
                WHERE id = $4
                "#,
            )
            .bind(JobStatus::DeadLetter.as_str())
            .bind(error)
            .bind(kind.as_str())
            .bind(job_id)
            .execute(&self.pool)
            .await?;

            info!(job_id = %job_id, "job dead-lettered");
        }

        Ok(())
    }
}
