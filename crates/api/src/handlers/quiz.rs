//! Instructor pages: student selection, student search and the stale quiz
//! check.

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::Json;
use quizext_canvas::models::CanvasUser;
use quizext_core::types::CanvasId;
use quizext_db::repositories::{CourseRepo, ExtensionRepo};
use quizext_worker::stale::missing_and_stale_quizzes;
use serde::Deserialize;

use super::render;
use crate::error::AppResult;
use crate::session::RequireStaff;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "userselect.html")]
struct UserSelectPage<'a> {
    course_id: CanvasId,
    google_analytics: &'a str,
}

struct StudentRow {
    id: CanvasId,
    name: String,
    sis_id: String,
}

impl From<&CanvasUser> for StudentRow {
    fn from(user: &CanvasUser) -> Self {
        Self {
            id: user.id,
            name: user.display_name().to_string(),
            sis_id: user.sis_user_id.clone().unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "user_list.html")]
struct UserListFragment {
    users: Vec<StudentRow>,
}

/// GET /quiz/{course_id}/
pub async fn quiz_page(
    RequireStaff(session): RequireStaff,
    State(state): State<AppState>,
    Path(course_id): Path<CanvasId>,
) -> AppResult<Html<String>> {
    session.ensure_course(course_id)?;

    render(&UserSelectPage {
        course_id,
        google_analytics: state.config.google_analytics.as_deref().unwrap_or(""),
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub query: String,
}

/// GET /filter/{course_id}/?query=
pub async fn filter(
    RequireStaff(session): RequireStaff,
    State(state): State<AppState>,
    Path(course_id): Path<CanvasId>,
    Query(params): Query<FilterQuery>,
) -> AppResult<Html<String>> {
    session.ensure_course(course_id)?;

    let query = params.query.trim().to_lowercase();
    let users = state.lms.search_students(course_id, &query).await?;

    render(&UserListFragment {
        users: users.iter().map(StudentRow::from).collect(),
    })
}

/// GET /missing_and_stale_quizzes/{course_id}/
///
/// `true` when a refresh would change something: the course has extensions
/// and at least one quiz was never extended or changed its time limit.
pub async fn missing_and_stale(
    RequireStaff(session): RequireStaff,
    State(state): State<AppState>,
    Path(course_id): Path<CanvasId>,
) -> AppResult<Json<bool>> {
    session.ensure_course(course_id)?;

    let Some(course) = CourseRepo::find_by_canvas_id(&state.pool, course_id).await? else {
        return Ok(Json(false));
    };
    if ExtensionRepo::count_for_course(&state.pool, course.id).await? == 0 {
        return Ok(Json(false));
    }

    let missing =
        missing_and_stale_quizzes(state.lms.as_ref(), &state.pool, course_id, true).await?;
    Ok(Json(!missing.is_empty()))
}
