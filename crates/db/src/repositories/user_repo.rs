//! Repository for the `users` table.

use quizext_core::types::{CanvasId, DbId};
use sqlx::PgPool;

use crate::models::user::User;

const COLUMNS: &str = "id, canvas_id, sortable_name, sis_id";

pub struct UserRepo;

impl UserRepo {
    /// Create a user by Canvas id, or refresh the name and SIS id of an
    /// existing one.
    pub async fn upsert(
        pool: &PgPool,
        canvas_id: CanvasId,
        sortable_name: Option<&str>,
        sis_id: Option<&str>,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (canvas_id, sortable_name, sis_id) VALUES ($1, $2, $3) \
             ON CONFLICT ON CONSTRAINT uq_users_canvas_id \
             DO UPDATE SET sortable_name = EXCLUDED.sortable_name, sis_id = EXCLUDED.sis_id \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(canvas_id)
            .bind(sortable_name)
            .bind(sis_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
