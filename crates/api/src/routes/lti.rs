use axum::routing::{get, post};
use axum::Router;

use crate::handlers::lti;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login/", get(lti::login_get).post(lti::login_post))
        .route("/launch/", post(lti::launch))
        .route("/jwks/", get(lti::jwks))
        .route("/lticonfig/", get(lti::lticonfig))
}
