//! Repository for the `deployments` table.

use quizext_core::types::DbId;
use sqlx::PgPool;

use crate::models::registration::Deployment;

const COLUMNS: &str = "id, deployment_id, registration_id, created_at";

pub struct DeploymentRepo;

impl DeploymentRepo {
    pub async fn create(
        pool: &PgPool,
        registration_id: DbId,
        deployment_id: &str,
    ) -> Result<Deployment, sqlx::Error> {
        let query = format!(
            "INSERT INTO deployments (deployment_id, registration_id) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Deployment>(&query)
            .bind(deployment_id)
            .bind(registration_id)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_registration(
        pool: &PgPool,
        registration_id: DbId,
    ) -> Result<Vec<Deployment>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM deployments WHERE registration_id = $1 ORDER BY id");
        sqlx::query_as::<_, Deployment>(&query)
            .bind(registration_id)
            .fetch_all(pool)
            .await
    }

    /// Whether `deployment_id` is registered under the given registration.
    pub async fn exists(
        pool: &PgPool,
        registration_id: DbId,
        deployment_id: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS ( \
                 SELECT 1 FROM deployments \
                 WHERE registration_id = $1 AND deployment_id = $2 \
             )",
        )
        .bind(registration_id)
        .bind(deployment_id)
        .fetch_one(pool)
        .await
    }
}
