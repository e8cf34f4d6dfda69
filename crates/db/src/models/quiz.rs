use quizext_core::types::{CanvasId, DbId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `quizzes` table: the last time limit the tool extended.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quiz {
    pub id: DbId,
    pub canvas_id: CanvasId,
    pub course_id: DbId,
    pub is_new: bool,
    pub title: Option<String>,
    pub time_limit: Option<f64>,
}
