//! Job queue entity models and parameter payloads.

use std::fmt;
use std::str::FromStr;

use quizext_core::types::{CanvasId, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::{JobStatus, StatusId};

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub job_key: Uuid,
    pub job_type: String,
    pub status_id: StatusId,
    pub parameters: serde_json::Value,
    pub depends_on_job_id: Option<DbId>,
    pub meta: serde_json::Value,
    pub result: Option<serde_json::Value>,
    pub error_message: Option<String>,
    pub worker_name: Option<String>,
    pub enqueued_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
}

impl Job {
    pub fn status(&self) -> Option<JobStatus> {
        JobStatus::from_id(self.status_id)
    }

    pub fn kind(&self) -> Result<JobType, String> {
        self.job_type.parse()
    }
}

/// The kinds of work the worker knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobType {
    /// Re-apply stored extensions to quizzes that are new or changed.
    Refresh,
    /// Extend every quiz in a course for a set of students.
    Update,
}

impl JobType {
    pub fn as_str(self) -> &'static str {
        match self {
            JobType::Refresh => "refresh",
            JobType::Update => "update",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "refresh" => Ok(JobType::Refresh),
            "update" => Ok(JobType::Update),
            other => Err(format!("Unknown job type '{other}'")),
        }
    }
}

/// Parameters of a `refresh` job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshParams {
    pub course_id: CanvasId,
}

/// Parameters of an `update` job.
///
/// `extension` is kept as the raw request body so the worker can report
/// malformed requests through job meta, the way instructors see every other
/// failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateParams {
    pub course_id: CanvasId,
    #[serde(default)]
    pub extension: serde_json::Value,
}
