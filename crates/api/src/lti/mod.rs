//! LTI 1.3 tool side: OIDC login initiation, launch validation, the tool's
//! own key set and its Canvas developer key configuration.

use std::time::Duration;

pub mod claims;
pub mod error;
pub mod launch;
pub mod login;
pub mod platform_keys;
pub mod tool_config;
pub mod tool_keys;

pub use error::LtiError;

/// How long a login `state` stays valid between login and launch.
pub const STATE_TTL: Duration = Duration::from_secs(600);

/// Cookie that ties a launch to the browser that started the login.
pub fn state_cookie_name(state: &str) -> String {
    format!("lti1p3-state-{state}")
}
