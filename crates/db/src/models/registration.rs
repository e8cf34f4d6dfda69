//! LTI platform registrations and deployments.

use quizext_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `registrations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Registration {
    pub id: DbId,
    pub issuer: String,
    pub client_id: String,
    pub platform_login_auth_endpoint: String,
    pub platform_service_auth_endpoint: String,
    pub platform_jwks_endpoint: String,
    pub key_set_id: DbId,
    pub created_at: Timestamp,
}

/// DTO for registering the tool with a platform.
#[derive(Debug)]
pub struct CreateRegistration {
    pub issuer: String,
    pub client_id: String,
    pub platform_login_auth_endpoint: String,
    pub platform_service_auth_endpoint: String,
    pub platform_jwks_endpoint: String,
    pub key_set_id: DbId,
}

/// A row from the `deployments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Deployment {
    pub id: DbId,
    pub deployment_id: String,
    pub registration_id: DbId,
    pub created_at: Timestamp,
}
