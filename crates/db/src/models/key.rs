//! Tool signing keys and key sets.

use quizext_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `key_sets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct KeySet {
    pub id: DbId,
    pub created_at: Timestamp,
}

/// A row from the `keys` table. Both keys are PEM encoded.
#[derive(Debug, Clone, FromRow)]
pub struct Key {
    pub id: DbId,
    pub key_set_id: DbId,
    pub public_key: String,
    pub private_key: String,
    pub alg: String,
    pub created_at: Timestamp,
}

/// DTO for storing a freshly generated key pair.
#[derive(Debug)]
pub struct CreateKey {
    pub key_set_id: DbId,
    pub public_key: String,
    pub private_key: String,
    pub alg: String,
}
