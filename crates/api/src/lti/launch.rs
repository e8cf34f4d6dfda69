//! Validation of a resource link launch.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use quizext_core::platform::is_canvas_issuer;
use quizext_core::types::CanvasId;
use quizext_db::repositories::{DeploymentRepo, LtiStateRepo, RegistrationRepo};
use sqlx::PgPool;
use uuid::Uuid;

use super::claims::{LaunchClaims, LTI_VERSION, MESSAGE_TYPE_RESOURCE_LINK};
use super::platform_keys::PlatformKeyCache;
use super::{LtiError, STATE_TTL};

/// A launch that passed every check.
#[derive(Debug, Clone)]
pub struct ValidatedLaunch {
    pub launch_id: String,
    pub registration_id: i64,
    pub course_id: CanvasId,
    pub canvas_user_id: CanvasId,
    pub claims: LaunchClaims,
}

fn token_error(e: jsonwebtoken::errors::Error) -> LtiError {
    match e.kind() {
        ErrorKind::InvalidIssuer => LtiError::WrongIssuer,
        ErrorKind::InvalidAudience => LtiError::WrongAudience,
        ErrorKind::ExpiredSignature => LtiError::Expired,
        _ => LtiError::InvalidToken(e.to_string()),
    }
}

/// Validate the `id_token` posted back by the platform for `state`.
///
/// The state is consumed even when validation fails afterwards, so a token
/// can never be replayed.
pub async fn validate_launch(
    pool: &PgPool,
    platform_keys: &PlatformKeyCache,
    id_token: &str,
    state: &str,
) -> Result<ValidatedLaunch, LtiError> {
    let login = LtiStateRepo::consume(pool, state, STATE_TTL)
        .await?
        .ok_or(LtiError::InvalidState)?;

    let registration = RegistrationRepo::find_by_id(pool, login.registration_id)
        .await?
        .ok_or_else(|| LtiError::UnknownRegistration(login.registration_id.to_string()))?;

    let header = decode_header(id_token).map_err(token_error)?;
    let kid = header.kid.ok_or(LtiError::MissingClaim("kid"))?;
    let key = platform_keys
        .key(&registration.platform_jwks_endpoint, &kid)
        .await?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&[registration.issuer.as_str()]);
    validation.set_audience(&[registration.client_id.as_str()]);
    let claims = decode::<LaunchClaims>(id_token, &key, &validation)
        .map_err(token_error)?
        .claims;

    // Canvas cloud does not reliably round-trip the nonce.
    if !is_canvas_issuer(&claims.iss) && claims.nonce.as_deref() != Some(login.nonce.as_str()) {
        return Err(LtiError::NonceMismatch);
    }

    let deployment_id = claims
        .deployment_id
        .as_deref()
        .ok_or(LtiError::MissingClaim("deployment_id"))?;
    if !DeploymentRepo::exists(pool, registration.id, deployment_id).await? {
        return Err(LtiError::UnknownDeployment(deployment_id.to_string()));
    }

    match claims.message_type.as_deref() {
        Some(MESSAGE_TYPE_RESOURCE_LINK) => {}
        other => {
            return Err(LtiError::UnsupportedMessage(format!(
                "message type {}",
                other.unwrap_or("none")
            )))
        }
    }
    if claims.version.as_deref() != Some(LTI_VERSION) {
        return Err(LtiError::UnsupportedMessage(format!(
            "LTI version {}",
            claims.version.as_deref().unwrap_or("none")
        )));
    }

    let custom = claims.custom.clone().ok_or(LtiError::MissingClaim("custom"))?;

    Ok(ValidatedLaunch {
        launch_id: Uuid::new_v4().to_string(),
        registration_id: registration.id,
        course_id: custom.canvas_course_id,
        canvas_user_id: custom.canvas_user_id,
        claims,
    })
}
