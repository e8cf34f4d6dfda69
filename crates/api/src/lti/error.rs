use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

/// Failures of the LTI login and launch flow.
#[derive(Debug, thiserror::Error)]
pub enum LtiError {
    #[error("Missing \"{0}\" param")]
    MissingParam(&'static str),

    #[error("Could not find registration details for issuer {0}")]
    UnknownRegistration(String),

    #[error("State not found")]
    InvalidState,

    #[error("Invalid id_token: {0}")]
    InvalidToken(String),

    #[error("Invalid id_token issuer")]
    WrongIssuer,

    #[error("Invalid id_token audience")]
    WrongAudience,

    #[error("The launch has expired, please reload the page")]
    Expired,

    #[error("Invalid nonce")]
    NonceMismatch,

    #[error("Missing \"{0}\" claim")]
    MissingClaim(&'static str),

    #[error("Unable to find deployment {0}")]
    UnknownDeployment(String),

    #[error("Unsupported message: {0}")]
    UnsupportedMessage(String),

    #[error("Unable to find a platform key with id {0}")]
    UnknownKey(String),

    #[error("Unable to fetch platform keys: {0}")]
    PlatformKeys(String),

    #[error("Invalid tool key {0}: {1}")]
    InvalidToolKey(i64, String),

    #[error("Invalid platform endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Unable to create session: {0}")]
    Session(#[from] jsonwebtoken::errors::Error),

    #[error("Unable to render page: {0}")]
    Render(#[from] askama::Error),
}

impl LtiError {
    pub fn status(&self) -> StatusCode {
        match self {
            LtiError::MissingParam(_)
            | LtiError::UnknownRegistration(_)
            | LtiError::InvalidState
            | LtiError::MissingClaim(_)
            | LtiError::UnsupportedMessage(_) => StatusCode::BAD_REQUEST,
            LtiError::InvalidToken(_)
            | LtiError::WrongIssuer
            | LtiError::WrongAudience
            | LtiError::Expired
            | LtiError::NonceMismatch
            | LtiError::UnknownDeployment(_)
            | LtiError::UnknownKey(_) => StatusCode::UNAUTHORIZED,
            LtiError::PlatformKeys(_) => StatusCode::BAD_GATEWAY,
            LtiError::InvalidToolKey(..)
            | LtiError::InvalidEndpoint(_)
            | LtiError::Database(_)
            | LtiError::Session(_)
            | LtiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage<'a> {
    pub message: &'a str,
}

impl IntoResponse for LtiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "LTI request failed");
            "Please contact your System Administrator.".to_string()
        } else {
            tracing::warn!(error = %self, "LTI request rejected");
            self.to_string()
        };

        match (ErrorPage { message: &message }).render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to render error page");
                (status, message).into_response()
            }
        }
    }
}
