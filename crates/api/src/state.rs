use std::sync::Arc;

use quizext_canvas::Lms;

use crate::config::ServerConfig;
use crate::lti::platform_keys::PlatformKeyCache;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: quizext_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Canvas REST API.
    pub lms: Arc<dyn Lms>,
    /// Canvas base url, reported by `/status`.
    pub canvas_api_url: String,
    /// Outbound HTTP client for everything that is not the Canvas REST API.
    pub http: reqwest::Client,
    /// Platform JWKS keyed by url, used to verify launch id tokens.
    pub platform_keys: Arc<PlatformKeyCache>,
}
