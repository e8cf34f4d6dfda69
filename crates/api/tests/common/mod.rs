//! Shared fixtures for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use axum_extra::extract::cookie::SameSite;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use quizext_api::config::{ServerConfig, SessionConfig};
use quizext_api::lti::platform_keys::PlatformKeyCache;
use quizext_api::router::build_app_router;
use quizext_api::session::jwt::encode_session;
use quizext_api::session::SessionClaims;
use quizext_api::state::AppState;
use quizext_canvas::models::{CanvasQuiz, CanvasUser, Course, Enrollment, QuizExtension};
use quizext_canvas::{CanvasError, Lms};
use quizext_core::extension::QuizKind;
use quizext_core::roles::{MEMBERSHIP_INSTRUCTOR, MEMBERSHIP_LEARNER};
use quizext_core::types::CanvasId;

pub const TEST_SECRET: &str = "test-session-secret";

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        request_timeout_secs: 30,
        preferred_url_scheme: "https".to_string(),
        lti_tool_id: "quiz_extensions".to_string(),
        google_analytics: None,
        session: SessionConfig {
            secret: TEST_SECRET.to_string(),
            expiry_hours: 8,
            cookie_secure: true,
            cookie_same_site: SameSite::None,
        },
    }
}

/// Canvas stand-in: one course, its students and classic quizzes.
#[derive(Default)]
pub struct StubLms {
    pub course: Option<Course>,
    pub students: Vec<CanvasUser>,
    pub quizzes: Vec<CanvasQuiz>,
    pub api_key_valid: bool,
}

impl StubLms {
    pub fn course(id: CanvasId) -> Self {
        Self {
            course: Some(Course {
                id,
                name: "Biology".to_string(),
            }),
            api_key_valid: true,
            ..Self::default()
        }
    }

    pub fn with_student(mut self, id: CanvasId, sortable_name: &str) -> Self {
        self.students.push(CanvasUser {
            id,
            name: sortable_name.to_string(),
            sortable_name: Some(sortable_name.to_string()),
            sis_user_id: Some(format!("SIS{id}")),
            enrollments: vec![Enrollment {
                enrollment_type: "StudentEnrollment".to_string(),
                enrollment_state: "active".to_string(),
            }],
        });
        self
    }

    pub fn with_quiz(mut self, id: CanvasId, time_limit: f64) -> Self {
        self.quizzes.push(CanvasQuiz {
            id,
            title: format!("Quiz {id}"),
            time_limit: Some(time_limit),
            kind: QuizKind::Classic,
        });
        self
    }
}

#[async_trait]
impl Lms for StubLms {
    async fn get_course(&self, course_id: CanvasId) -> Result<Course, CanvasError> {
        self.course
            .clone()
            .filter(|c| c.id == course_id)
            .ok_or(CanvasError::NotFound)
    }

    async fn get_user(&self, _course_id: CanvasId, user_id: CanvasId) -> Result<CanvasUser, CanvasError> {
        self.students
            .iter()
            .find(|u| u.id == user_id)
            .cloned()
            .ok_or(CanvasError::NotFound)
    }

    async fn search_students(&self, _course_id: CanvasId, query: &str) -> Result<Vec<CanvasUser>, CanvasError> {
        Ok(self
            .students
            .iter()
            .filter(|u| u.display_name().to_lowercase().contains(query))
            .cloned()
            .collect())
    }

    async fn list_quizzes(&self, _course_id: CanvasId) -> Result<Vec<CanvasQuiz>, CanvasError> {
        Ok(self.quizzes.clone())
    }

    async fn list_new_quizzes(&self, _course_id: CanvasId) -> Result<Vec<CanvasQuiz>, CanvasError> {
        Ok(Vec::new())
    }

    async fn set_extensions(
        &self,
        _course_id: CanvasId,
        _quiz_id: CanvasId,
        _extensions: &[QuizExtension],
    ) -> Result<(), CanvasError> {
        Ok(())
    }

    async fn set_accommodations(
        &self,
        _course_id: CanvasId,
        _quiz_id: CanvasId,
        _extensions: &[QuizExtension],
    ) -> Result<(), CanvasError> {
        Ok(())
    }

    async fn get_self(&self) -> Result<CanvasUser, CanvasError> {
        if !self.api_key_valid {
            return Err(CanvasError::Api {
                status: 401,
                body: String::new(),
            });
        }
        Ok(CanvasUser {
            id: 1,
            name: "Tool Account".to_string(),
            sortable_name: None,
            sis_user_id: None,
            enrollments: Vec::new(),
        })
    }
}

/// Build the full application router over `pool` and a stub Canvas with
/// course 42.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, StubLms::course(42))
}

pub fn build_test_app_with(pool: PgPool, lms: StubLms) -> Router {
    let config = test_config();
    let http = reqwest::Client::new();

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        lms: Arc::new(lms),
        canvas_api_url: "https://canvas.example.edu".to_string(),
        http: http.clone(),
        platform_keys: Arc::new(PlatformKeyCache::new(http)),
    };

    build_app_router(state, &config)
}

/// `Cookie` header value carrying a session for `course_id` with `roles`.
pub fn session_cookie(course_id: CanvasId, roles: &[&str]) -> String {
    let claims = SessionClaims::new(
        "launch-1".to_string(),
        roles.iter().map(|r| r.to_string()).collect(),
        course_id,
        7,
        Some("teacher@example.edu".to_string()),
        &test_config().session,
    );
    let token = encode_session(&claims, &test_config().session).expect("session should encode");
    format!("quizext_session={token}")
}

pub fn staff_cookie(course_id: CanvasId) -> String {
    session_cookie(course_id, &[MEMBERSHIP_INSTRUCTOR])
}

pub fn student_cookie(course_id: CanvasId) -> String {
    session_cookie(course_id, &[MEMBERSHIP_LEARNER])
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, cookie: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(COOKIE, cookie)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_form(app: Router, uri: &str, cookie: Option<&str>, form: &str) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    send(app, builder.body(Body::from(form.to_string())).unwrap()).await
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// All `Set-Cookie` header values of a response.
pub fn set_cookies(response: &Response<Body>) -> Vec<String> {
    response
        .headers()
        .get_all(axum::http::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}
