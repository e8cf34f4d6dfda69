//! Repository for the `jobs` table: the background job queue.
//!
//! Jobs move `queued -> started -> finished|failed`. A job enqueued with a
//! dependency starts as `deferred` and becomes runnable once the job it
//! depends on is `finished`; if that job fails, every deferred job below it
//! fails too.

use std::time::Duration;

use quizext_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::job::{Job, JobType};
use crate::models::status::JobStatus;

/// Column list for `jobs` queries.
const COLUMNS: &str = "\
    id, job_key, job_type, status_id, parameters, depends_on_job_id, \
    meta, result, error_message, worker_name, enqueued_at, started_at, ended_at";

pub struct JobRepo;

impl JobRepo {
    /// Put a new job on the queue under a fresh job key.
    pub async fn enqueue(
        pool: &PgPool,
        job_type: JobType,
        parameters: &serde_json::Value,
        depends_on: Option<DbId>,
    ) -> Result<Job, sqlx::Error> {
        let status = if depends_on.is_some() {
            JobStatus::Deferred
        } else {
            JobStatus::Queued
        };
        let query = format!(
            "INSERT INTO jobs (job_key, job_type, status_id, parameters, depends_on_job_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(Uuid::new_v4())
            .bind(job_type.as_str())
            .bind(status.id())
            .bind(parameters)
            .bind(depends_on)
            .fetch_one(pool)
            .await
    }

    /// Atomically claim the oldest runnable job for a worker.
    ///
    /// Uses `SELECT FOR UPDATE SKIP LOCKED` so concurrent workers never
    /// claim the same row.
    pub async fn claim_next(pool: &PgPool, worker_name: &str) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs \
             SET status_id = $2, worker_name = $1, started_at = NOW() \
             WHERE id = ( \
                 SELECT j.id FROM jobs j \
                 LEFT JOIN jobs d ON d.id = j.depends_on_job_id \
                 WHERE j.status_id = $3 \
                    OR (j.status_id = $4 AND (j.depends_on_job_id IS NULL OR d.status_id = $5)) \
                 ORDER BY j.enqueued_at ASC, j.id ASC \
                 LIMIT 1 \
                 FOR UPDATE OF j SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(worker_name)
            .bind(JobStatus::Started.id())
            .bind(JobStatus::Queued.id())
            .bind(JobStatus::Deferred.id())
            .bind(JobStatus::Finished.id())
            .fetch_optional(pool)
            .await
    }

    /// Replace the progress metadata of a job.
    pub async fn update_meta(
        pool: &PgPool,
        job_id: DbId,
        meta: &serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE jobs SET meta = $2 WHERE id = $1")
            .bind(job_id)
            .bind(meta)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Mark a job finished. The result also becomes the final meta.
    ///
    /// Only a job still started under `worker_name` is touched. Returns
    /// `false` when the worker no longer owns the job, e.g. because another
    /// worker failed it as stale.
    pub async fn finish(
        pool: &PgPool,
        job_id: DbId,
        worker_name: &str,
        result: &serde_json::Value,
    ) -> Result<bool, sqlx::Error> {
        let updated = sqlx::query(
            "UPDATE jobs SET status_id = $2, result = $4, meta = $4, ended_at = NOW() \
             WHERE id = $1 AND status_id = $3 AND worker_name = $5",
        )
        .bind(job_id)
        .bind(JobStatus::Finished.id())
        .bind(JobStatus::Started.id())
        .bind(result)
        .bind(worker_name)
        .execute(pool)
        .await?;
        Ok(updated.rows_affected() == 1)
    }

    /// Mark a job failed, along with every deferred job depending on it,
    /// directly or transitively.
    ///
    /// Same ownership rule as [`JobRepo::finish`]. Returns the number of
    /// dependent jobs that were failed, or `None` when `worker_name` no
    /// longer owns the job.
    pub async fn fail(
        pool: &PgPool,
        job_id: DbId,
        worker_name: &str,
        error: &str,
    ) -> Result<Option<u64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let job_key: Option<Uuid> = sqlx::query_scalar(
            "UPDATE jobs SET status_id = $2, error_message = $4, ended_at = NOW() \
             WHERE id = $1 AND status_id = $3 AND worker_name = $5 \
             RETURNING job_key",
        )
        .bind(job_id)
        .bind(JobStatus::Failed.id())
        .bind(JobStatus::Started.id())
        .bind(error)
        .bind(worker_name)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(job_key) = job_key else {
            tx.commit().await?;
            return Ok(None);
        };

        let dependents = sqlx::query(
            "WITH RECURSIVE dependents AS ( \
                 SELECT id FROM jobs WHERE depends_on_job_id = $1 AND status_id = $2 \
                 UNION ALL \
                 SELECT j.id FROM jobs j \
                 INNER JOIN dependents d ON j.depends_on_job_id = d.id \
                 WHERE j.status_id = $2 \
             ) \
             UPDATE jobs SET status_id = $3, error_message = $4, ended_at = NOW() \
             WHERE id IN (SELECT id FROM dependents)",
        )
        .bind(job_id)
        .bind(JobStatus::Deferred.id())
        .bind(JobStatus::Failed.id())
        .bind(format!("Dependency job {job_key} failed."))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(dependents.rows_affected()))
    }

    /// Fail started jobs that no live worker owns: jobs claimed under
    /// `own_name` (a restarted worker is running none of them) and jobs whose
    /// worker has not sent a heartbeat within `max_silence`.
    ///
    /// Returns the failed jobs. Run by a worker at startup.
    pub async fn fail_stale(
        pool: &PgPool,
        own_name: &str,
        max_silence: Duration,
    ) -> Result<Vec<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs \
             WHERE status_id = $1 AND worker_name IS NOT NULL \
               AND (worker_name = $2 OR NOT EXISTS ( \
                   SELECT 1 FROM worker_heartbeats h \
                   WHERE h.worker_name = jobs.worker_name \
                     AND h.last_seen_at > NOW() - make_interval(secs => $3) \
               )) \
             ORDER BY id"
        );
        let stale = sqlx::query_as::<_, Job>(&query)
            .bind(JobStatus::Started.id())
            .bind(own_name)
            .bind(max_silence.as_secs_f64())
            .fetch_all(pool)
            .await?;

        let mut failed = Vec::with_capacity(stale.len());
        for job in stale {
            let owner = job.worker_name.as_deref().unwrap_or_default();
            if Self::fail(pool, job.id, owner, "Worker stopped before the job completed.")
                .await?
                .is_some()
            {
                failed.push(job);
            }
        }
        Ok(failed)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_key(pool: &PgPool, job_key: Uuid) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE job_key = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(job_key)
            .fetch_optional(pool)
            .await
    }

    /// Number of jobs waiting for a worker.
    pub async fn queued_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM jobs WHERE status_id = $1")
            .bind(JobStatus::Queued.id())
            .fetch_one(pool)
            .await
    }
}
