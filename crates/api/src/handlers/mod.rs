pub mod jobs;
pub mod lti;
pub mod quiz;
pub mod status;

use askama::Template;
use axum::response::Html;

use crate::error::{AppError, AppResult};

/// Render an askama template into an HTML response.
pub(crate) fn render<T: Template>(template: &T) -> AppResult<Html<String>> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::InternalError(format!("Template rendering failed: {e}")))
}
