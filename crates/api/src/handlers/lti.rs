//! Handlers for the LTI 1.3 endpoints: login initiation, launch, the tool
//! key set and the tool configuration.

use askama::Template;
use axum::extract::{Query, State};
use axum::http::header::{HOST, LOCATION};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::CookieJar;
use quizext_db::repositories::KeyRepo;
use serde::Deserialize;
use serde_json::Value;

use crate::config::SessionConfig;
use crate::error::AppResult;
use crate::lti::launch::validate_launch;
use crate::lti::login::{initiate_login, LoginParams};
use crate::lti::tool_config::tool_configuration;
use crate::lti::tool_keys::{public_jwks, PublicJwks};
use crate::lti::{state_cookie_name, LtiError};
use crate::session::jwt::{encode_session, session_cookie};
use crate::session::SessionClaims;
use crate::state::AppState;

/// 302 Found to `url`.
fn found(url: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, url.to_string())]).into_response()
}

fn state_cookie(state: &str, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((state_cookie_name(state), state.to_string()))
        .path("/")
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(config.cookie_same_site)
        .build()
}

/// Shown inside the Canvas iframe before going to the platform. Browsers
/// that refuse third-party cookies there would lose the state cookie, so the
/// page offers to reopen the login in a new tab instead.
#[derive(Template)]
#[template(path = "cookie_check.html")]
struct CookieCheckPage<'a> {
    redirect_url: &'a str,
    new_window_url: &'a str,
    main_msg: &'a str,
    click_msg: &'a str,
}

const LOGIN_PATH: &str = "/login/";

async fn login(
    state: &AppState,
    jar: CookieJar,
    params: &LoginParams,
) -> Result<(CookieJar, Response), LtiError> {
    let redirect = initiate_login(&state.pool, params).await?;
    let jar = jar.add(state_cookie(&redirect.state, &state.config.session));
    if params.skip_cookie_check() {
        return Ok((jar, found(redirect.url.as_str())));
    }

    let page = CookieCheckPage {
        redirect_url: redirect.url.as_str(),
        new_window_url: &params.new_window_url(LOGIN_PATH),
        main_msg: "Your browser prohibits saving cookies in an iframe.",
        click_msg: "Click here to open the application in a new tab.",
    }
    .render()?;
    Ok((jar, Html(page).into_response()))
}

/// GET /login/
pub async fn login_get(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<LoginParams>,
) -> Result<(CookieJar, Response), LtiError> {
    login(&state, jar, &params).await
}

/// POST /login/
pub async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(params): Form<LoginParams>,
) -> Result<(CookieJar, Response), LtiError> {
    login(&state, jar, &params).await
}

#[derive(Debug, Deserialize)]
pub struct LaunchForm {
    #[serde(default)]
    pub id_token: String,
    #[serde(default)]
    pub state: String,
}

/// POST /launch/
///
/// Validates the launch, starts a session and sends the instructor to the
/// course's student selection page.
pub async fn launch(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LaunchForm>,
) -> Result<(CookieJar, Response), LtiError> {
    if form.id_token.is_empty() {
        return Err(LtiError::MissingParam("id_token"));
    }

    let cookie_name = state_cookie_name(&form.state);
    match jar.get(&cookie_name) {
        Some(cookie) if !form.state.is_empty() && cookie.value() == form.state => {}
        _ => return Err(LtiError::InvalidState),
    }

    let launch = validate_launch(&state.pool, &state.platform_keys, &form.id_token, &form.state).await?;

    let claims = SessionClaims::new(
        launch.launch_id.clone(),
        launch.claims.roles.clone(),
        launch.course_id,
        launch.canvas_user_id,
        launch.claims.email.clone(),
        &state.config.session,
    );
    let token = encode_session(&claims, &state.config.session)?;

    tracing::info!(
        launch_id = %launch.launch_id,
        course_id = launch.course_id,
        canvas_user_id = launch.canvas_user_id,
        "LTI launch accepted",
    );

    let jar = jar
        .remove(Cookie::build((cookie_name, "")).path("/").build())
        .add(session_cookie(token, &state.config.session));
    Ok((jar, found(&format!("/quiz/{}/", launch.course_id))))
}

/// GET /jwks/
pub async fn jwks(State(state): State<AppState>) -> AppResult<Json<PublicJwks>> {
    let keys = KeyRepo::list_registered(&state.pool).await?;
    Ok(Json(public_jwks(&keys)))
}

/// GET /lticonfig/
pub async fn lticonfig(State(state): State<AppState>, headers: HeaderMap) -> Json<Value> {
    let domain = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");

    Json(tool_configuration(
        &state.config.preferred_url_scheme,
        domain,
        &state.config.lti_tool_id,
    ))
}
