//! Canvas platform presets used when registering the tool.
//!
//! Every Canvas cloud environment exposes the same three LTI endpoints under
//! its SSO host; only the host and the issuer differ.

use std::fmt;
use std::str::FromStr;

/// Issuer of production Canvas cloud launches.
pub const CANVAS_ISSUER: &str = "https://canvas.instructure.com";
pub const CANVAS_TEST_ISSUER: &str = "https://canvas.test.instructure.com";
pub const CANVAS_BETA_ISSUER: &str = "https://canvas.beta.instructure.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformPreset {
    Production,
    Test,
    Beta,
    /// Self-hosted Canvas; the url base must be supplied.
    Other,
}

/// Endpoints stored on a registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformEndpoints {
    pub issuer: String,
    pub login_auth_endpoint: String,
    pub service_auth_endpoint: String,
    pub jwks_endpoint: String,
}

impl PlatformPreset {
    pub const ALL: [PlatformPreset; 4] = [
        PlatformPreset::Production,
        PlatformPreset::Test,
        PlatformPreset::Beta,
        PlatformPreset::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PlatformPreset::Production => "Production Canvas",
            PlatformPreset::Test => "Test Canvas",
            PlatformPreset::Beta => "Beta Canvas",
            PlatformPreset::Other => "Other Canvas Platform",
        }
    }

    pub fn default_url_base(self) -> Option<&'static str> {
        match self {
            PlatformPreset::Production => Some("https://sso.canvaslms.com"),
            PlatformPreset::Test => Some("https://sso.test.canvaslms.com"),
            PlatformPreset::Beta => Some("https://sso.beta.canvaslms.com"),
            PlatformPreset::Other => None,
        }
    }

    pub fn issuer(self) -> &'static str {
        match self {
            PlatformPreset::Test => CANVAS_TEST_ISSUER,
            PlatformPreset::Beta => CANVAS_BETA_ISSUER,
            PlatformPreset::Production | PlatformPreset::Other => CANVAS_ISSUER,
        }
    }

    /// Build the registration endpoints.
    ///
    /// `url_base` overrides the preset host and is mandatory for
    /// [`PlatformPreset::Other`]. Trailing slashes are stripped.
    pub fn endpoints(self, url_base: Option<&str>) -> Result<PlatformEndpoints, String> {
        let base = url_base
            .or(self.default_url_base())
            .map(|b| b.trim().trim_end_matches('/'))
            .filter(|b| !b.is_empty())
            .ok_or_else(|| format!("{} requires a server url", self.name()))?;

        if !(base.starts_with("https://") || base.starts_with("http://")) {
            return Err(format!("Invalid server url '{base}'"));
        }

        Ok(PlatformEndpoints {
            issuer: self.issuer().to_string(),
            login_auth_endpoint: format!("{base}/api/lti/authorize_redirect"),
            service_auth_endpoint: format!("{base}/login/oauth2/token"),
            jwks_endpoint: format!("{base}/api/lti/security/jwks"),
        })
    }
}

impl fmt::Display for PlatformPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlatformPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(PlatformPreset::Production),
            "test" => Ok(PlatformPreset::Test),
            "beta" => Ok(PlatformPreset::Beta),
            "other" => Ok(PlatformPreset::Other),
            other => Err(format!("Invalid platform '{other}'")),
        }
    }
}

/// True for the issuers of Canvas cloud environments.
pub fn is_canvas_issuer(iss: &str) -> bool {
    matches!(iss, CANVAS_ISSUER | CANVAS_TEST_ISSUER | CANVAS_BETA_ISSUER)
}
