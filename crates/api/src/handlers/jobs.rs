//! Enqueueing extension jobs and reporting their progress.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quizext_core::types::CanvasId;
use quizext_db::models::job::{JobType, RefreshParams, UpdateParams};
use quizext_db::models::status::JobStatus;
use quizext_db::repositories::JobRepo;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::session::RequireStaff;
use crate::state::AppState;

pub fn job_url(job_key: Uuid) -> String {
    format!("/jobs/{job_key}/")
}

fn params_json<T: serde::Serialize>(params: &T) -> AppResult<Value> {
    serde_json::to_value(params).map_err(|e| AppError::InternalError(e.to_string()))
}

/// POST /refresh/{course_id}/
pub async fn refresh(
    RequireStaff(session): RequireStaff,
    State(state): State<AppState>,
    Path(course_id): Path<CanvasId>,
) -> AppResult<impl IntoResponse> {
    session.ensure_course(course_id)?;

    let params = params_json(&RefreshParams { course_id })?;
    let job = JobRepo::enqueue(&state.pool, JobType::Refresh, &params, None).await?;

    tracing::info!(course_id, job_key = %job.job_key, "Refresh job enqueued");

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "refresh_job_url": job_url(job.job_key) })),
    ))
}

/// POST /update/{course_id}/
///
/// Enqueues a refresh of the course followed by the update itself, so new
/// quizzes get the stored extensions before the new ones are applied. The
/// body is handed to the update job untouched; malformed requests are
/// reported through the job's status.
pub async fn update(
    RequireStaff(session): RequireStaff,
    State(state): State<AppState>,
    Path(course_id): Path<CanvasId>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    session.ensure_course(course_id)?;

    let extension: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let refresh_params = params_json(&RefreshParams { course_id })?;
    let refresh_job = JobRepo::enqueue(&state.pool, JobType::Refresh, &refresh_params, None).await?;

    let update_params = params_json(&UpdateParams {
        course_id,
        extension,
    })?;
    let update_job = JobRepo::enqueue(
        &state.pool,
        JobType::Update,
        &update_params,
        Some(refresh_job.id),
    )
    .await?;

    tracing::info!(
        course_id,
        refresh_job_key = %refresh_job.job_key,
        update_job_key = %update_job.job_key,
        canvas_user_id = session.canvas_user_id,
        "Update jobs enqueued",
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "refresh_job_url": job_url(refresh_job.job_key),
            "update_job_url": job_url(update_job.job_key),
        })),
    ))
}

/// GET /jobs/{job_key}/
///
/// | Job state            | Status | Body                        |
/// |----------------------|--------|-----------------------------|
/// | unknown key          | 404    | error message               |
/// | finished             | 200    | final meta                  |
/// | failed               | 500    | error message               |
/// | queued/started/deferred | 202 | current meta                |
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_key): Path<String>,
) -> AppResult<Response> {
    let not_found = || {
        (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": true,
                "status_msg": format!("{job_key} is not a valid job key."),
            })),
        )
            .into_response()
    };

    let Ok(key) = Uuid::parse_str(&job_key) else {
        return Ok(not_found());
    };
    let Some(job) = JobRepo::find_by_key(&state.pool, key).await? else {
        return Ok(not_found());
    };

    let response = match job.status() {
        Some(JobStatus::Finished) => {
            let result = job.result.unwrap_or(job.meta);
            (StatusCode::OK, Json(result)).into_response()
        }
        Some(JobStatus::Failed) => {
            tracing::error!(
                job_key = %job.job_key,
                error = job.error_message.as_deref().unwrap_or("unknown"),
                "Job failed",
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": true,
                    "status_msg": format!("Job {job_key} failed to complete."),
                })),
            )
                .into_response()
        }
        _ => (StatusCode::ACCEPTED, Json(job.meta)).into_response(),
    };

    Ok(response)
}
