//! Session token encoding.

use axum_extra::extract::cookie::Cookie;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use quizext_core::types::CanvasId;
use serde::{Deserialize, Serialize};

use super::SESSION_COOKIE;
use crate::config::SessionConfig;

/// Claims carried by the session cookie.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionClaims {
    /// Unique id of the launch that created the session.
    pub launch_id: String,
    /// Full LTI role URIs from the launch.
    pub roles: Vec<String>,
    /// Canvas course the tool was launched from.
    pub course_id: CanvasId,
    pub canvas_user_id: CanvasId,
    pub email: Option<String>,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(
        launch_id: String,
        roles: Vec<String>,
        course_id: CanvasId,
        canvas_user_id: CanvasId,
        email: Option<String>,
        config: &SessionConfig,
    ) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            launch_id,
            roles,
            course_id,
            canvas_user_id,
            email,
            exp: now + config.expiry_hours * 3600,
            iat: now,
        }
    }
}

/// Sign the claims with HS256.
pub fn encode_session(
    claims: &SessionClaims,
    config: &SessionConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode(
        &Header::default(), // HS256
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate signature and expiry, returning the embedded claims.
pub fn decode_session(
    token: &str,
    config: &SessionConfig,
) -> Result<SessionClaims, jsonwebtoken::errors::Error> {
    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// The cookie carrying a session token.
///
/// The tool runs inside the Canvas iframe, so in production the cookie has
/// to be `Secure` with `SameSite=None` to be sent at all.
pub fn session_cookie(token: String, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(config.cookie_same_site)
        .build()
}
