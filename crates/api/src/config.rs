use axum_extra::extract::cookie::SameSite;

/// Server configuration loaded from environment variables.
///
/// Canvas settings live in [`quizext_canvas::CanvasConfig`]; everything the
/// HTTP layer itself needs is here.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Scheme used for the urls advertised in the LTI tool configuration.
    pub preferred_url_scheme: String,
    /// Unique id of the tool, used as the developer key title.
    pub lti_tool_id: String,
    /// Google Analytics measurement id rendered into pages when set.
    pub google_analytics: Option<String>,
    pub session: SessionConfig,
}

/// Session cookie configuration.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC-SHA256 secret used to sign session tokens.
    pub secret: String,
    /// Session lifetime in hours (default: 8).
    pub expiry_hours: i64,
    pub cookie_secure: bool,
    pub cookie_same_site: SameSite,
}

const DEFAULT_SESSION_EXPIRY_HOURS: i64 = 8;

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default            |
    /// |---------------------------|--------------------|
    /// | `HOST`                    | `0.0.0.0`          |
    /// | `PORT`                    | `8000`             |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`               |
    /// | `PREFERRED_URL_SCHEME`    | `https`            |
    /// | `LTI_TOOL_ID`             | `quiz_extensions`  |
    /// | `GOOGLE_ANALYTICS`        | unset              |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let preferred_url_scheme =
            std::env::var("PREFERRED_URL_SCHEME").unwrap_or_else(|_| "https".into());

        let lti_tool_id = std::env::var("LTI_TOOL_ID").unwrap_or_else(|_| "quiz_extensions".into());

        let google_analytics = std::env::var("GOOGLE_ANALYTICS")
            .ok()
            .filter(|id| !id.trim().is_empty());

        Self {
            host,
            port,
            request_timeout_secs,
            preferred_url_scheme,
            lti_tool_id,
            google_analytics,
            session: SessionConfig::from_env(),
        }
    }
}

impl SessionConfig {
    /// | Env Var                   | Required | Default |
    /// |---------------------------|----------|---------|
    /// | `SECRET_KEY`              | **yes**  | --      |
    /// | `SESSION_EXPIRY_HOURS`    | no       | `8`     |
    /// | `SESSION_COOKIE_SECURE`   | no       | `1`     |
    /// | `SESSION_COOKIE_SAMESITE` | no       | `None`  |
    ///
    /// # Panics
    ///
    /// Panics if `SECRET_KEY` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("SECRET_KEY").expect("SECRET_KEY must be set in the environment");
        assert!(!secret.is_empty(), "SECRET_KEY must not be empty");

        let expiry_hours: i64 = std::env::var("SESSION_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_SESSION_EXPIRY_HOURS.to_string())
            .parse()
            .expect("SESSION_EXPIRY_HOURS must be a valid i64");

        let cookie_secure = std::env::var("SESSION_COOKIE_SECURE")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        let cookie_same_site = std::env::var("SESSION_COOKIE_SAMESITE")
            .unwrap_or_else(|_| "None".into());
        let cookie_same_site = parse_same_site(&cookie_same_site)
            .unwrap_or_else(|| panic!("Invalid SESSION_COOKIE_SAMESITE '{cookie_same_site}'"));

        Self {
            secret,
            expiry_hours,
            cookie_secure,
            cookie_same_site,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.trim().to_ascii_lowercase().as_str() {
        "none" => Some(SameSite::None),
        "lax" => Some(SameSite::Lax),
        "strict" => Some(SameSite::Strict),
        _ => None,
    }
}
