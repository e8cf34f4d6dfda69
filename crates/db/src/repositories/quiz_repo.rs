//! Repository for the `quizzes` table.
//!
//! A quiz row remembers the time limit the tool last extended, which is how
//! stale quizzes are detected when an instructor changes a limit in Canvas.

use quizext_core::types::{CanvasId, DbId};
use sqlx::PgPool;

use crate::models::quiz::Quiz;

const COLUMNS: &str = "id, canvas_id, course_id, is_new, title, time_limit";

pub struct QuizRepo;

impl QuizRepo {
    pub async fn upsert(
        pool: &PgPool,
        course_id: DbId,
        canvas_id: CanvasId,
        is_new: bool,
        title: &str,
        time_limit: Option<f64>,
    ) -> Result<Quiz, sqlx::Error> {
        let query = format!(
            "INSERT INTO quizzes (course_id, canvas_id, is_new, title, time_limit) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT ON CONSTRAINT uq_quizzes_course_canvas_kind \
             DO UPDATE SET title = EXCLUDED.title, time_limit = EXCLUDED.time_limit \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quiz>(&query)
            .bind(course_id)
            .bind(canvas_id)
            .bind(is_new)
            .bind(title)
            .bind(time_limit)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_canvas_id(
        pool: &PgPool,
        course_id: DbId,
        canvas_id: CanvasId,
        is_new: bool,
    ) -> Result<Option<Quiz>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quizzes \
             WHERE course_id = $1 AND canvas_id = $2 AND is_new = $3"
        );
        sqlx::query_as::<_, Quiz>(&query)
            .bind(course_id)
            .bind(canvas_id)
            .bind(is_new)
            .fetch_optional(pool)
            .await
    }
}
