//! Repository for the `extensions` table.

use quizext_core::types::DbId;
use sqlx::PgPool;

use crate::models::extension::{Extension, ExtensionWithUser};

const COLUMNS: &str = "id, course_id, user_id, percent, active";

pub struct ExtensionRepo;

impl ExtensionRepo {
    /// Record the percent granted to a student in a course.
    ///
    /// An existing extension takes the new percent and is reactivated.
    pub async fn upsert_percent(
        pool: &PgPool,
        course_id: DbId,
        user_id: DbId,
        percent: i32,
    ) -> Result<Extension, sqlx::Error> {
        let query = format!(
            "INSERT INTO extensions (course_id, user_id, percent) VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_extensions_course_user \
             DO UPDATE SET percent = EXCLUDED.percent, active = TRUE \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Extension>(&query)
            .bind(course_id)
            .bind(user_id)
            .bind(percent)
            .fetch_one(pool)
            .await
    }

    /// Every extension of a course, active or not, with its student.
    pub async fn list_for_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<ExtensionWithUser>, sqlx::Error> {
        sqlx::query_as::<_, ExtensionWithUser>(
            "SELECT e.id, e.percent, e.active, e.user_id, \
                    u.canvas_id AS user_canvas_id, u.sortable_name \
             FROM extensions e \
             JOIN users u ON u.id = e.user_id \
             WHERE e.course_id = $1 \
             ORDER BY e.id",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    pub async fn count_for_course(pool: &PgPool, course_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM extensions WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(pool)
            .await
    }

    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE extensions SET active = FALSE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
