pub mod health;
pub mod jobs;
pub mod lti;
pub mod quiz;

use axum::routing::get;
use axum::Router;

use crate::handlers::status;
use crate::state::AppState;

/// Build the route tree.
///
/// Routes keep the trailing slashes Canvas and the instructor page use.
///
/// ```text
/// /                                    index
/// /status                              smoke tests
///
/// /login/                              OIDC login initiation (GET, POST)
/// /launch/                             LTI launch (POST)
/// /jwks/                               tool public keys
/// /lticonfig/                          Canvas developer key JSON
///
/// /quiz/{course_id}/                   student selection page (staff)
/// /filter/{course_id}/                 student search fragment (staff)
/// /missing_and_stale_quizzes/{course_id}/   refresh needed? (staff)
///
/// /refresh/{course_id}/                enqueue refresh (staff)
/// /update/{course_id}/                 enqueue refresh + update (staff)
/// /jobs/{job_key}/                     job progress
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(status::index).post(status::index))
        .route("/status", get(status::status))
        .merge(lti::router())
        .merge(quiz::router())
        .merge(jobs::router())
}
