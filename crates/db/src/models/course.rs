use quizext_core::types::{CanvasId, DbId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub canvas_id: CanvasId,
    pub course_name: Option<String>,
}
