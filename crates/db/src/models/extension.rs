use quizext_core::types::{CanvasId, DbId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `extensions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Extension {
    pub id: DbId,
    pub course_id: DbId,
    pub user_id: DbId,
    pub percent: i32,
    pub active: bool,
}

/// An extension joined with the student it belongs to.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ExtensionWithUser {
    pub id: DbId,
    pub percent: i32,
    pub active: bool,
    pub user_id: DbId,
    pub user_canvas_id: CanvasId,
    pub sortable_name: Option<String>,
}
