//! `update` job: give a set of students extra time on every quiz in a course.

use quizext_canvas::{all_quizzes, CanvasError};
use quizext_core::error::CoreError;
use quizext_core::extension::{parse_percent, parse_user_ids};
use quizext_core::job_messages::{
    progress_percent, update_summary, updating_quiz, JobMeta, UnchangedQuiz, UpdatedQuiz,
    MSG_COURSE_NOT_FOUND, MSG_INVALID_REQUEST, MSG_NO_QUIZZES,
};
use quizext_core::types::CanvasId;
use quizext_db::repositories::{CourseRepo, ExtensionRepo, QuizRepo, UserRepo};
use serde_json::Value;

use crate::context::JobContext;
use crate::error::WorkerError;
use crate::extend::extend_quiz;

/// Extend every quiz in `course_id` for the students in `extension`.
///
/// `extension` is the request body posted by the instructor page:
/// `{"percent": "200", "user_ids": ["11", "12"]}`.
pub async fn update_background(
    ctx: &JobContext<'_>,
    course_id: CanvasId,
    extension: &Value,
) -> Result<JobMeta, WorkerError> {
    ctx.report(&JobMeta::started()).await?;

    let request = match extension.as_object() {
        Some(map) if !map.is_empty() => map,
        _ => {
            tracing::warn!(course_id, request = %extension, "Invalid Request");
            return Ok(ctx.conclude(JobMeta::failed(0, MSG_INVALID_REQUEST)).await?);
        }
    };

    let canvas_course = match ctx.lms.get_course(course_id).await {
        Ok(course) => course,
        Err(CanvasError::NotFound) => {
            tracing::warn!(course_id, "Unable to find course");
            return Ok(ctx.conclude(JobMeta::failed(0, MSG_COURSE_NOT_FOUND)).await?);
        }
        Err(e) => return Err(e.into()),
    };

    let user_ids = match parse_user_ids(request.get("user_ids")) {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(course_id, error = %e, "Invalid user ids");
            return Ok(ctx.conclude(JobMeta::failed(0, MSG_INVALID_REQUEST)).await?);
        }
    };

    let percent = match parse_percent(request.get("percent")) {
        Ok(percent) => percent,
        Err(CoreError::Validation(msg)) => {
            tracing::warn!(course_id, request = %extension, "{msg}");
            return Ok(ctx.conclude(JobMeta::failed(0, msg)).await?);
        }
    };

    let course = CourseRepo::get_or_create(ctx.pool, course_id).await?;
    CourseRepo::set_name(ctx.pool, course_id, &canvas_course.name).await?;

    for &user_id in &user_ids {
        let canvas_user = match ctx.lms.get_user(course_id, user_id).await {
            Ok(user) => user,
            Err(CanvasError::NotFound) => {
                tracing::warn!(course_id, user_id, "Unable to find user in course, skipping");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let user = UserRepo::upsert(
            ctx.pool,
            user_id,
            Some(canvas_user.display_name()),
            canvas_user.sis_user_id.as_deref(),
        )
        .await?;
        ExtensionRepo::upsert_percent(ctx.pool, course.id, user.id, percent).await?;
    }

    let quizzes = all_quizzes(ctx.lms, course_id).await?;
    if quizzes.is_empty() {
        tracing::warn!(course_id, "No quizzes found, unable to update");
        return Ok(ctx.conclude(JobMeta::failed(0, MSG_NO_QUIZZES)).await?);
    }

    let total = quizzes.len();
    let mut quiz_list = Vec::new();
    let mut unchanged_list = Vec::new();

    for (index, quiz) in quizzes.iter().enumerate() {
        let percent_done = progress_percent(index, total);
        ctx.report(&JobMeta::processing(
            percent_done,
            updating_quiz(quiz.id, &quiz.title, index + 1, total),
        ))
        .await?;

        let outcome = extend_quiz(ctx.lms, course_id, quiz, percent, &user_ids).await;
        if !outcome.success {
            tracing::error!(course_id, quiz_id = quiz.id, message = %outcome.message, "Extension failed");
            return Ok(ctx
                .conclude(JobMeta::failed(percent_done, outcome.message))
                .await?);
        }

        QuizRepo::upsert(
            ctx.pool,
            course.id,
            quiz.id,
            quiz.kind.is_new(),
            &quiz.title,
            quiz.time_limit,
        )
        .await?;

        match outcome.added_time {
            Some(added_time) => quiz_list.push(UpdatedQuiz {
                title: quiz.title.clone(),
                added_time,
            }),
            None => unchanged_list.push(UnchangedQuiz {
                title: quiz.title.clone(),
            }),
        }
    }

    let mut meta = JobMeta::complete(update_summary(
        quiz_list.len(),
        user_ids.len(),
        percent,
        unchanged_list.len(),
    ));
    meta.quiz_list = Some(quiz_list);
    meta.unchanged_list = Some(unchanged_list);

    tracing::info!(course_id, students = user_ids.len(), percent, "Update complete");
    Ok(ctx.conclude(meta).await?)
}
