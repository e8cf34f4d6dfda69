//! Job runner loop.
//!
//! Polls the queue every `poll_interval`, claims one job at a time with
//! [`JobRepo::claim_next`] and runs it to completion. Any number of runners
//! may share a database; `SELECT FOR UPDATE SKIP LOCKED` keeps them from
//! claiming the same job.
//!
//! The worker heartbeat is written on every idle tick and, while a job runs,
//! on a separate interval alongside it. A job only ever outlives
//! [`HEARTBEAT_TIMEOUT`] without a beat if its worker is gone.

use std::sync::Arc;
use std::time::Duration;

use quizext_canvas::Lms;
use quizext_core::job_messages::JobMeta;
use quizext_db::models::job::{Job, JobType, RefreshParams, UpdateParams};
use quizext_db::repositories::{JobRepo, WorkerHeartbeatRepo};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::config::WorkerConfig;
use crate::context::JobContext;
use crate::error::WorkerError;
use crate::jobs::{refresh_background, update_background};

/// Heartbeat age after which a worker is considered gone.
pub const HEARTBEAT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct JobRunner {
    pool: PgPool,
    lms: Arc<dyn Lms>,
    worker_name: String,
    poll_interval: Duration,
}

impl JobRunner {
    pub fn new(pool: PgPool, lms: Arc<dyn Lms>, config: &WorkerConfig) -> Self {
        Self {
            pool,
            lms,
            worker_name: config.worker_name.clone(),
            poll_interval: config.poll_interval,
        }
    }

    pub fn worker_name(&self) -> &str {
        &self.worker_name
    }

    /// Run until the cancellation token is triggered. A job in progress is
    /// always finished before the loop exits.
    pub async fn run(&self, cancel: CancellationToken) {
        match JobRepo::fail_stale(&self.pool, &self.worker_name, HEARTBEAT_TIMEOUT).await {
            Ok(stale) if !stale.is_empty() => {
                tracing::warn!(count = stale.len(), "Failed jobs abandoned by a stopped worker");
            }
            Ok(_) => {}
            Err(e) => tracing::error!(error = %e, "Failed to release stale jobs"),
        }

        let mut ticker = tokio::time::interval(self.poll_interval);
        tracing::info!(
            worker_name = %self.worker_name,
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Job runner started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Job runner shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.beat().await;
                    // Drain the queue before waiting for the next tick.
                    loop {
                        match self.run_next().await {
                            Ok(true) if !cancel.is_cancelled() => continue,
                            Ok(_) => break,
                            Err(e) => {
                                tracing::error!(error = %e, "Job cycle failed");
                                break;
                            }
                        }
                    }
                }
            }
        }
    }

    /// Claim and run one job. Returns `false` when the queue had nothing
    /// runnable.
    pub async fn run_next(&self) -> Result<bool, sqlx::Error> {
        let Some(job) = JobRepo::claim_next(&self.pool, &self.worker_name).await? else {
            return Ok(false);
        };

        tracing::info!(
            job_id = job.id,
            job_key = %job.job_key,
            job_type = %job.job_type,
            "Job claimed",
        );

        let work = self.execute(&job);
        tokio::pin!(work);
        let mut heartbeat = tokio::time::interval(self.heartbeat_interval());
        let outcome = loop {
            tokio::select! {
                outcome = &mut work => break outcome,
                _ = heartbeat.tick() => self.beat().await,
            }
        };

        match outcome {
            Ok(meta) => {
                if JobRepo::finish(&self.pool, job.id, &self.worker_name, &meta.to_json()).await? {
                    tracing::info!(job_id = job.id, status = ?meta.status, "Job finished");
                } else {
                    tracing::warn!(job_id = job.id, "Job was taken from this worker; result dropped");
                }
            }
            Err(e) => {
                tracing::error!(job_id = job.id, error = %e, "Job failed");
                match JobRepo::fail(&self.pool, job.id, &self.worker_name, &e.to_string()).await? {
                    Some(0) => {}
                    Some(dependents) => {
                        tracing::warn!(job_id = job.id, dependents, "Failed dependent jobs");
                    }
                    None => tracing::warn!(job_id = job.id, "Job was taken from this worker"),
                }
            }
        }

        Ok(true)
    }

    /// Beat at least three times per [`HEARTBEAT_TIMEOUT`].
    fn heartbeat_interval(&self) -> Duration {
        self.poll_interval.min(HEARTBEAT_TIMEOUT / 3)
    }

    async fn beat(&self) {
        if let Err(e) = WorkerHeartbeatRepo::beat(&self.pool, &self.worker_name).await {
            tracing::error!(error = %e, "Heartbeat failed");
        }
    }

    async fn execute(&self, job: &Job) -> Result<JobMeta, WorkerError> {
        let ctx = JobContext::new(&self.pool, self.lms.as_ref(), job.id);

        match job.kind().map_err(WorkerError::InvalidJob)? {
            JobType::Refresh => {
                let params: RefreshParams = serde_json::from_value(job.parameters.clone())
                    .map_err(|e| WorkerError::InvalidJob(e.to_string()))?;
                refresh_background(&ctx, params.course_id).await
            }
            JobType::Update => {
                let params: UpdateParams = serde_json::from_value(job.parameters.clone())
                    .map_err(|e| WorkerError::InvalidJob(e.to_string()))?;
                update_background(&ctx, params.course_id, &params.extension).await
            }
        }
    }
}
