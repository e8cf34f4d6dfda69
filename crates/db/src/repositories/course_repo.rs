//! Repository for the `courses` table.

use quizext_core::types::CanvasId;
use sqlx::PgPool;

use crate::models::course::Course;

const COLUMNS: &str = "id, canvas_id, course_name";

pub struct CourseRepo;

impl CourseRepo {
    /// Return the course row for a Canvas course, creating it if needed.
    pub async fn get_or_create(pool: &PgPool, canvas_id: CanvasId) -> Result<Course, sqlx::Error> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let query = format!(
            "INSERT INTO courses (canvas_id) VALUES ($1) \
             ON CONFLICT ON CONSTRAINT uq_courses_canvas_id \
             DO UPDATE SET canvas_id = EXCLUDED.canvas_id \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(canvas_id)
            .fetch_one(pool)
            .await
    }

    pub async fn set_name(
        pool: &PgPool,
        canvas_id: CanvasId,
        course_name: &str,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET course_name = $2 WHERE canvas_id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(canvas_id)
            .bind(course_name)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_canvas_id(
        pool: &PgPool,
        canvas_id: CanvasId,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE canvas_id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(canvas_id)
            .fetch_optional(pool)
            .await
    }
}
