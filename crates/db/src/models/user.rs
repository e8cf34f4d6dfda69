use quizext_core::types::{CanvasId, DbId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub canvas_id: CanvasId,
    pub sortable_name: Option<String>,
    pub sis_id: Option<String>,
}
