//! REST client for the Canvas HTTP API.
//!
//! Wraps the handful of Canvas endpoints the tool needs (courses, users,
//! quizzes, extensions, accommodations) using [`reqwest`]. List endpoints are
//! followed through their `Link: <...>; rel="next"` headers.

use std::time::Duration;

use async_trait::async_trait;
use quizext_core::types::CanvasId;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::config::CanvasConfig;
use crate::error::CanvasError;
use crate::lms::Lms;
use crate::models::{
    CanvasQuiz, CanvasUser, ClassicQuizPayload, Course, NewQuizPayload, QuizExtension,
};

/// HTTP client for a single Canvas instance.
pub struct CanvasClient {
    client: reqwest::Client,
    api_url: String,
    max_per_page: u32,
}

impl CanvasClient {
    /// Create a client authenticating every request with the configured key.
    pub fn new(config: &CanvasConfig) -> Result<Self, CanvasError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Create a client reusing an existing [`reqwest::Client`]. The caller is
    /// responsible for its authorization header.
    pub fn with_client(client: reqwest::Client, config: &CanvasConfig) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            max_per_page: config.max_per_page,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    // ---- private helpers ----

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CanvasError> {
        let response = self
            .client
            .get(format!("{}{}", self.api_url, path))
            .query(query)
            .send()
            .await?;
        Self::parse_response(response).await
    }

    /// GET a list endpoint and every page after it.
    async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, CanvasError> {
        let mut items = Vec::new();
        let mut response = self
            .client
            .get(format!("{}{}", self.api_url, path))
            .query(query)
            .send()
            .await?;

        loop {
            let next = next_link(response.headers());
            let page: Vec<T> = Self::parse_response(response).await?;
            items.extend(page);

            match next {
                Some(url) => response = self.client.get(url).send().await?,
                None => break,
            }
        }

        Ok(items)
    }

    async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), CanvasError> {
        let response = self
            .client
            .post(format!("{}{}", self.api_url, path))
            .json(body)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }

    /// Ensure the response has a success status code. 404 maps to
    /// [`CanvasError::NotFound`]; other failures keep the status and body.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, CanvasError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(CanvasError::NotFound);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CanvasError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CanvasError> {
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn per_page(&self) -> (&'static str, String) {
        ("per_page", self.max_per_page.to_string())
    }
}

#[async_trait]
impl Lms for CanvasClient {
    async fn get_course(&self, course_id: CanvasId) -> Result<Course, CanvasError> {
        self.get_json(&format!("/api/v1/courses/{course_id}"), &[]).await
    }

    async fn get_user(
        &self,
        course_id: CanvasId,
        user_id: CanvasId,
    ) -> Result<CanvasUser, CanvasError> {
        self.get_json(
            &format!("/api/v1/courses/{course_id}/users/{user_id}"),
            &[("include[]", "enrollments".to_string())],
        )
        .await
    }

    async fn search_students(
        &self,
        course_id: CanvasId,
        query: &str,
    ) -> Result<Vec<CanvasUser>, CanvasError> {
        let mut params = vec![
            ("enrollment_type[]", "student".to_string()),
            ("enrollment_state[]", "active".to_string()),
            ("enrollment_state[]", "invited".to_string()),
            self.per_page(),
        ];
        // Canvas rejects search terms shorter than two characters.
        if query.chars().count() >= 2 {
            params.push(("search_term", query.to_string()));
        }
        self.get_paginated(&format!("/api/v1/courses/{course_id}/users"), &params)
            .await
    }

    async fn list_quizzes(&self, course_id: CanvasId) -> Result<Vec<CanvasQuiz>, CanvasError> {
        let quizzes: Vec<ClassicQuizPayload> = self
            .get_paginated(
                &format!("/api/v1/courses/{course_id}/quizzes"),
                &[self.per_page()],
            )
            .await?;
        Ok(quizzes.into_iter().map(CanvasQuiz::from).collect())
    }

    async fn list_new_quizzes(&self, course_id: CanvasId) -> Result<Vec<CanvasQuiz>, CanvasError> {
        let quizzes: Vec<NewQuizPayload> = self
            .get_paginated(
                &format!("/api/quiz/v1/courses/{course_id}/quizzes"),
                &[self.per_page()],
            )
            .await?;
        Ok(quizzes.into_iter().map(CanvasQuiz::from).collect())
    }

    async fn set_extensions(
        &self,
        course_id: CanvasId,
        quiz_id: CanvasId,
        extensions: &[QuizExtension],
    ) -> Result<(), CanvasError> {
        let body = serde_json::json!({ "quiz_extensions": extensions });
        self.post_json(
            &format!("/api/v1/courses/{course_id}/quizzes/{quiz_id}/extensions"),
            &body,
        )
        .await
    }

    async fn set_accommodations(
        &self,
        course_id: CanvasId,
        quiz_id: CanvasId,
        extensions: &[QuizExtension],
    ) -> Result<(), CanvasError> {
        self.post_json(
            &format!("/api/quiz/v1/courses/{course_id}/quizzes/{quiz_id}/accommodations"),
            extensions,
        )
        .await
    }

    async fn get_self(&self) -> Result<CanvasUser, CanvasError> {
        self.get_json("/api/v1/users/self", &[]).await
    }
}

/// Extract the `rel="next"` URL from a Canvas `Link` header.
fn next_link(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(header::LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let mut segments = part.split(';');
        let url = segments.next()?.trim();
        let is_next = segments.any(|s| {
            let s = s.trim();
            s == "rel=\"next\"" || s == "rel=next"
        });
        if !is_next {
            return None;
        }
        url.strip_prefix('<')
            .and_then(|u| u.strip_suffix('>'))
            .map(str::to_string)
    })
}
