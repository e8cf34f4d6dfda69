//! Repositories for the `key_sets` and `keys` tables.

use quizext_core::types::DbId;
use sqlx::PgPool;

use crate::models::key::{CreateKey, Key, KeySet};

/// Column list for `keys` queries.
const KEY_COLUMNS: &str = "id, key_set_id, public_key, private_key, alg, created_at";

pub struct KeySetRepo;

impl KeySetRepo {
    pub async fn create(pool: &PgPool) -> Result<KeySet, sqlx::Error> {
        sqlx::query_as::<_, KeySet>(
            "INSERT INTO key_sets DEFAULT VALUES RETURNING id, created_at",
        )
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<KeySet>, sqlx::Error> {
        sqlx::query_as::<_, KeySet>("SELECT id, created_at FROM key_sets WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<KeySet>, sqlx::Error> {
        sqlx::query_as::<_, KeySet>("SELECT id, created_at FROM key_sets ORDER BY id")
            .fetch_all(pool)
            .await
    }
}

pub struct KeyRepo;

impl KeyRepo {
    pub async fn create(pool: &PgPool, input: &CreateKey) -> Result<Key, sqlx::Error> {
        let query = format!(
            "INSERT INTO keys (key_set_id, public_key, private_key, alg) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {KEY_COLUMNS}"
        );
        sqlx::query_as::<_, Key>(&query)
            .bind(input.key_set_id)
            .bind(&input.public_key)
            .bind(&input.private_key)
            .bind(&input.alg)
            .fetch_one(pool)
            .await
    }

    pub async fn list_by_key_set(pool: &PgPool, key_set_id: DbId) -> Result<Vec<Key>, sqlx::Error> {
        let query = format!("SELECT {KEY_COLUMNS} FROM keys WHERE key_set_id = $1 ORDER BY id");
        sqlx::query_as::<_, Key>(&query)
            .bind(key_set_id)
            .fetch_all(pool)
            .await
    }

    /// The signing key of a key set: its oldest key.
    pub async fn first_for_key_set(
        pool: &PgPool,
        key_set_id: DbId,
    ) -> Result<Option<Key>, sqlx::Error> {
        let query = format!(
            "SELECT {KEY_COLUMNS} FROM keys WHERE key_set_id = $1 ORDER BY id LIMIT 1"
        );
        sqlx::query_as::<_, Key>(&query)
            .bind(key_set_id)
            .fetch_optional(pool)
            .await
    }

    /// All keys of key sets that at least one registration uses.
    ///
    /// These are the keys published on the tool's JWKS endpoint.
    pub async fn list_registered(pool: &PgPool) -> Result<Vec<Key>, sqlx::Error> {
        let query = format!(
            "SELECT {KEY_COLUMNS} FROM keys \
             WHERE key_set_id IN (SELECT DISTINCT key_set_id FROM registrations) \
             ORDER BY id"
        );
        sqlx::query_as::<_, Key>(&query).fetch_all(pool).await
    }
}
