use quizext_core::types::Timestamp;
use sqlx::FromRow;

/// A row from the `worker_heartbeats` table.
#[derive(Debug, Clone, FromRow)]
pub struct WorkerHeartbeat {
    pub worker_name: String,
    pub last_seen_at: Timestamp,
}
