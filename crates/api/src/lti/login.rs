//! OIDC third-party login initiation.

use quizext_db::models::registration::Registration;
use quizext_db::repositories::{LtiStateRepo, RegistrationRepo};
use rand::Rng;
use serde::Deserialize;
use sqlx::PgPool;
use url::Url;

use super::{LtiError, STATE_TTL};

/// Parameters Canvas sends to the login initiation url, as a query string
/// or a form body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginParams {
    pub iss: Option<String>,
    pub login_hint: Option<String>,
    pub target_link_uri: Option<String>,
    pub client_id: Option<String>,
    pub lti_message_hint: Option<String>,
    pub lti_deployment_id: Option<String>,
    /// Set when the login was reopened in a new tab after the cookie check
    /// failed inside the Canvas iframe.
    pub lti1p3_new_window: Option<String>,
}

impl LoginParams {
    /// Whether the browser should go straight to the platform instead of
    /// through the cookie check page.
    pub fn skip_cookie_check(&self) -> bool {
        self.lti1p3_new_window.is_some()
    }

    /// This login's own url, reopened outside the iframe.
    pub fn new_window_url(&self, login_path: &str) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        let pairs = [
            ("iss", &self.iss),
            ("login_hint", &self.login_hint),
            ("target_link_uri", &self.target_link_uri),
            ("client_id", &self.client_id),
            ("lti_message_hint", &self.lti_message_hint),
            ("lti_deployment_id", &self.lti_deployment_id),
        ];
        for (name, value) in pairs {
            if let Some(value) = value {
                query.append_pair(name, value);
            }
        }
        query.append_pair("lti1p3_new_window", "1");
        format!("{login_path}?{}", query.finish())
    }
}

/// Where to send the browser, and the state to bind to it with a cookie.
#[derive(Debug)]
pub struct LoginRedirect {
    pub state: String,
    pub url: Url,
}

fn random_token() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, LtiError> {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or(LtiError::MissingParam(name))
}

async fn find_registration(
    pool: &PgPool,
    issuer: &str,
    client_id: Option<&str>,
) -> Result<Registration, LtiError> {
    let registration = match client_id {
        Some(client_id) => RegistrationRepo::find_by_issuer_and_client(pool, issuer, client_id).await?,
        None => RegistrationRepo::list_by_issuer(pool, issuer)
            .await?
            .into_iter()
            .next(),
    };
    registration.ok_or_else(|| LtiError::UnknownRegistration(issuer.to_string()))
}

/// Persist a fresh state/nonce pair and build the platform authorization
/// redirect.
pub async fn initiate_login(pool: &PgPool, params: &LoginParams) -> Result<LoginRedirect, LtiError> {
    let target_link_uri = required(&params.target_link_uri, "target_link_uri")?;
    let issuer = required(&params.iss, "iss")?;
    let login_hint = required(&params.login_hint, "login_hint")?;

    let registration = find_registration(
        pool,
        issuer,
        params.client_id.as_deref().filter(|c| !c.is_empty()),
    )
    .await?;

    let state = random_token();
    let nonce = random_token();
    LtiStateRepo::insert(pool, &state, &nonce, registration.id).await?;

    let purged = LtiStateRepo::purge_expired(pool, STATE_TTL).await?;
    if purged > 0 {
        tracing::debug!(purged, "Purged expired login states");
    }

    let mut query = vec![
        ("scope", "openid"),
        ("response_type", "id_token"),
        ("response_mode", "form_post"),
        ("prompt", "none"),
        ("client_id", registration.client_id.as_str()),
        ("redirect_uri", target_link_uri),
        ("login_hint", login_hint),
        ("state", state.as_str()),
        ("nonce", nonce.as_str()),
    ];
    if let Some(hint) = params.lti_message_hint.as_deref() {
        query.push(("lti_message_hint", hint));
    }

    let url = Url::parse_with_params(&registration.platform_login_auth_endpoint, &query)?;

    tracing::info!(
        issuer,
        client_id = %registration.client_id,
        deployment_id = ?params.lti_deployment_id,
        "LTI login initiated",
    );
    Ok(LoginRedirect { state, url })
}
