/// Errors from the Canvas REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Canvas answered 404.
    #[error("Not Found")]
    NotFound,

    /// Canvas returned any other non-2xx status code.
    #[error("{}", canonical_reason(.status))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("Unexpected response from Canvas: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured API key cannot be sent as a header.
    #[error("Invalid API key: {0}")]
    InvalidApiKey(#[from] reqwest::header::InvalidHeaderValue),
}

impl CanvasError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CanvasError::NotFound)
    }
}

fn canonical_reason(status: &u16) -> String {
    reqwest::StatusCode::from_u16(*status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}
