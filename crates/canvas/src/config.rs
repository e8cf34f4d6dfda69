/// Canvas API configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct CanvasConfig {
    /// Base URL of the Canvas instance, without `/api/v1`.
    pub api_url: String,
    /// Access token sent as a bearer token.
    pub api_key: String,
    /// Page size requested from paginated endpoints.
    pub max_per_page: u32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl CanvasConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var        | Default  |
    /// |----------------|----------|
    /// | `API_URL`      | required |
    /// | `API_KEY`      | required |
    /// | `MAX_PER_PAGE` | `100`    |
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or `MAX_PER_PAGE` is not a
    /// number.
    pub fn from_env() -> Self {
        let api_url = std::env::var("API_URL").expect("API_URL must be set");
        let api_key = std::env::var("API_KEY").expect("API_KEY must be set");

        let max_per_page: u32 = std::env::var("MAX_PER_PAGE")
            .unwrap_or_else(|_| "100".into())
            .parse()
            .expect("MAX_PER_PAGE must be a valid u32");

        Self::new(api_url, api_key, max_per_page)
    }

    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>, max_per_page: u32) -> Self {
        let api_url: String = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            max_per_page,
            timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = CanvasConfig::new("https://canvas.example.edu/", "token", 50);
        assert_eq!(config.api_url, "https://canvas.example.edu");
        assert_eq!(config.max_per_page, 50);
        assert_eq!(config.timeout_secs, 30);
    }
}
