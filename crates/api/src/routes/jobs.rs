use axum::routing::{get, post};
use axum::Router;

use crate::handlers::jobs;
use crate::state::AppState;

/// ```text
/// POST   /refresh/{course_id}/   -> refresh     (staff)
/// POST   /update/{course_id}/    -> update      (staff)
/// GET    /jobs/{job_key}/        -> job_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/refresh/{course_id}/", post(jobs::refresh))
        .route("/update/{course_id}/", post(jobs::update))
        .route("/jobs/{job_key}/", get(jobs::job_status))
}
