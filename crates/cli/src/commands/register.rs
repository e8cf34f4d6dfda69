use anyhow::{anyhow, bail};
use quizext_core::platform::PlatformPreset;
use quizext_core::types::DbId;
use quizext_db::models::registration::{CreateRegistration, Registration};
use quizext_db::repositories::{KeySetRepo, RegistrationRepo};
use sqlx::PgPool;

use super::violates;

/// Register the tool with a platform using the preset's endpoints.
pub async fn register(
    pool: &PgPool,
    platform: PlatformPreset,
    url_base: Option<&str>,
    client_id: &str,
    key_set_id: DbId,
) -> anyhow::Result<Registration> {
    let endpoints = platform.endpoints(url_base).map_err(|e| anyhow!(e))?;

    if client_id.trim().is_empty() {
        bail!("Client id must not be empty");
    }
    if KeySetRepo::find_by_id(pool, key_set_id).await?.is_none() {
        bail!("Key set {key_set_id} does not exist");
    }

    let input = CreateRegistration {
        issuer: endpoints.issuer,
        client_id: client_id.trim().to_string(),
        platform_login_auth_endpoint: endpoints.login_auth_endpoint,
        platform_service_auth_endpoint: endpoints.service_auth_endpoint,
        platform_jwks_endpoint: endpoints.jwks_endpoint,
        key_set_id,
    };

    match RegistrationRepo::create(pool, &input).await {
        Ok(registration) => {
            tracing::info!(
                registration_id = registration.id,
                issuer = %registration.issuer,
                client_id = %registration.client_id,
                "Registration created",
            );
            Ok(registration)
        }
        Err(e) if violates(&e, "uq_registrations_issuer_client_id") => bail!(
            "{platform} is already registered with client id {}",
            input.client_id
        ),
        Err(e) => Err(e.into()),
    }
}
