//! Repository for the `registrations` table.

use quizext_core::types::DbId;
use sqlx::PgPool;

use crate::models::registration::{CreateRegistration, Registration};

/// Column list for `registrations` queries.
const COLUMNS: &str = "\
    id, issuer, client_id, platform_login_auth_endpoint, \
    platform_service_auth_endpoint, platform_jwks_endpoint, key_set_id, created_at";

pub struct RegistrationRepo;

impl RegistrationRepo {
    /// Insert a registration. Fails with a `uq_registrations_issuer_client_id`
    /// violation when the issuer/client pair already exists.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRegistration,
    ) -> Result<Registration, sqlx::Error> {
        let query = format!(
            "INSERT INTO registrations \
                 (issuer, client_id, platform_login_auth_endpoint, \
                  platform_service_auth_endpoint, platform_jwks_endpoint, key_set_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(&input.issuer)
            .bind(&input.client_id)
            .bind(&input.platform_login_auth_endpoint)
            .bind(&input.platform_service_auth_endpoint)
            .bind(&input.platform_jwks_endpoint)
            .bind(input.key_set_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Registration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM registrations WHERE id = $1");
        sqlx::query_as::<_, Registration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_issuer_and_client(
        pool: &PgPool,
        issuer: &str,
        client_id: &str,
    ) -> Result<Option<Registration>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM registrations WHERE issuer = $1 AND client_id = $2");
        sqlx::query_as::<_, Registration>(&query)
            .bind(issuer)
            .bind(client_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_issuer(
        pool: &PgPool,
        issuer: &str,
    ) -> Result<Vec<Registration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM registrations WHERE issuer = $1 ORDER BY id");
        sqlx::query_as::<_, Registration>(&query)
            .bind(issuer)
            .fetch_all(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Registration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM registrations ORDER BY id");
        sqlx::query_as::<_, Registration>(&query)
            .fetch_all(pool)
            .await
    }
}
