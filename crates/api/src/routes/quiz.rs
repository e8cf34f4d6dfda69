use axum::routing::get;
use axum::Router;

use crate::handlers::quiz;
use crate::state::AppState;

/// Instructor pages. All require a staff session for the same course.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quiz/{course_id}/", get(quiz::quiz_page))
        .route("/filter/{course_id}/", get(quiz::filter))
        .route(
            "/missing_and_stale_quizzes/{course_id}/",
            get(quiz::missing_and_stale),
        )
}
