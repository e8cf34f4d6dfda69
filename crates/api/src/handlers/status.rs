//! Index page and the deployment smoke test.

use axum::extract::State;
use axum::http::header::HOST;
use axum::http::HeaderMap;
use axum::Json;
use quizext_db::repositories::{JobRepo, WorkerHeartbeatRepo};
use quizext_worker::runner::HEARTBEAT_TIMEOUT;
use serde::Serialize;

use crate::state::AppState;

pub const INDEX_MESSAGE: &str = "Please contact your System Administrator.";

/// GET|POST /
pub async fn index() -> &'static str {
    INDEX_MESSAGE
}

#[derive(Debug, Serialize)]
pub struct StatusChecks {
    pub index: bool,
    pub api_key: bool,
    pub db: bool,
    pub worker: bool,
    pub queue: bool,
}

impl StatusChecks {
    fn all(&self) -> bool {
        self.index && self.api_key && self.db && self.worker && self.queue
    }
}

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub tool: &'static str,
    pub checks: StatusChecks,
    pub url: String,
    pub api_url: String,
    /// Queued job count, `-1` when the queue could not be read.
    pub job_queue: i64,
    pub healthy: bool,
}

async fn check_index(http: &reqwest::Client, url: &str) -> bool {
    let response = match http.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(url, error = %e, "Index check failed");
            return false;
        }
    };
    match response.text().await {
        Ok(body) => body == INDEX_MESSAGE,
        Err(e) => {
            tracing::error!(url, error = %e, "Index check failed");
            false
        }
    }
}

async fn check_worker(state: &AppState) -> bool {
    match WorkerHeartbeatRepo::latest(&state.pool).await {
        Ok(Some(beat)) => {
            let age = chrono::Utc::now() - beat.last_seen_at;
            age.to_std().map(|age| age < HEARTBEAT_TIMEOUT).unwrap_or(true)
        }
        Ok(None) => false,
        Err(e) => {
            tracing::error!(error = %e, "Worker heartbeat check failed");
            false
        }
    }
}

/// GET /status
///
/// Runs smoke tests against every dependency and reports each result.
pub async fn status(State(state): State<AppState>, headers: HeaderMap) -> Json<StatusReport> {
    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let url = format!("{}://{host}/", state.config.preferred_url_scheme);

    let index = check_index(&state.http, &url).await;

    let api_key = match state.lms.get_self().await {
        Ok(_) => true,
        Err(e) => {
            tracing::error!(error = %e, "API key check failed");
            false
        }
    };

    let db = match quizext_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "DB connection failed");
            false
        }
    };

    let worker = check_worker(&state).await;

    let job_queue = match JobRepo::queued_count(&state.pool).await {
        Ok(count) => count,
        Err(e) => {
            tracing::error!(error = %e, "Job queue check failed");
            -1
        }
    };

    let checks = StatusChecks {
        index,
        api_key,
        db,
        worker,
        queue: job_queue >= 0,
    };
    let healthy = checks.all();

    Json(StatusReport {
        tool: "Quiz Extensions",
        checks,
        url,
        api_url: state.canvas_api_url.clone(),
        job_queue,
        healthy,
    })
}
