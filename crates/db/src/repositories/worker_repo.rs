//! Repository for the `worker_heartbeats` table.

use sqlx::PgPool;

use crate::models::worker::WorkerHeartbeat;

pub struct WorkerHeartbeatRepo;

impl WorkerHeartbeatRepo {
    /// Record that `worker_name` is alive now.
    pub async fn beat(pool: &PgPool, worker_name: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO worker_heartbeats (worker_name, last_seen_at) VALUES ($1, NOW()) \
             ON CONFLICT (worker_name) DO UPDATE SET last_seen_at = NOW()",
        )
        .bind(worker_name)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// The most recently seen worker, if any worker ever ran.
    pub async fn latest(pool: &PgPool) -> Result<Option<WorkerHeartbeat>, sqlx::Error> {
        sqlx::query_as::<_, WorkerHeartbeat>(
            "SELECT worker_name, last_seen_at FROM worker_heartbeats \
             ORDER BY last_seen_at DESC LIMIT 1",
        )
        .fetch_optional(pool)
        .await
    }
}
