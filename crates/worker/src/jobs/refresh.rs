//! `refresh` job: re-apply stored extensions to quizzes that are new or whose
//! time limit changed.

use std::collections::BTreeMap;

use quizext_canvas::CanvasError;
use quizext_core::job_messages::{
    no_active_extensions, progress_percent, refresh_failure, refresh_summary, refreshing_quiz,
    JobMeta, MSG_COURSE_NOT_FOUND, MSG_GETTING_EXTENSIONS, MSG_NOTHING_TO_REFRESH,
};
use quizext_core::types::CanvasId;
use quizext_db::repositories::{CourseRepo, ExtensionRepo, QuizRepo};

use crate::context::JobContext;
use crate::error::WorkerError;
use crate::extend::extend_quiz;
use crate::stale::missing_and_stale_quizzes;

pub async fn refresh_background(
    ctx: &JobContext<'_>,
    course_id: CanvasId,
) -> Result<JobMeta, WorkerError> {
    ctx.report(&JobMeta::started()).await?;

    let course = CourseRepo::get_or_create(ctx.pool, course_id).await?;
    match ctx.lms.get_course(course_id).await {
        Ok(canvas_course) => {
            CourseRepo::set_name(ctx.pool, course_id, &canvas_course.name).await?;
        }
        Err(CanvasError::NotFound) => {
            tracing::warn!(course_id, "Unable to find course");
            return Ok(ctx.conclude(JobMeta::failed(0, MSG_COURSE_NOT_FOUND)).await?);
        }
        Err(e) => return Err(e.into()),
    }

    let quizzes = missing_and_stale_quizzes(ctx.lms, ctx.pool, course_id, false).await?;
    if quizzes.is_empty() {
        return Ok(ctx.conclude(JobMeta::complete(MSG_NOTHING_TO_REFRESH)).await?);
    }

    ctx.report(&JobMeta::processing(0, MSG_GETTING_EXTENSIONS))
        .await?;

    // percent -> students with that percent
    let mut percent_users: BTreeMap<i32, Vec<CanvasId>> = BTreeMap::new();
    let mut inactive = Vec::new();

    for extension in ExtensionRepo::list_for_course(ctx.pool, course.id).await? {
        let name = extension.sortable_name.clone().unwrap_or_default();

        if !extension.active {
            tracing::debug!(extension_id = extension.id, "Extension is inactive");
            inactive.push(name);
            continue;
        }

        let user_canvas_id = extension.user_canvas_id;
        match ctx.lms.get_user(course_id, user_canvas_id).await {
            Ok(canvas_user) if canvas_user.is_current_student() => {
                percent_users
                    .entry(extension.percent)
                    .or_default()
                    .push(user_canvas_id);
            }
            Ok(canvas_user) => {
                tracing::info!(
                    user_id = user_canvas_id,
                    course_id,
                    extension_id = extension.id,
                    roles = ?canvas_user.current_enrollment_types(),
                    "User is not an active student, deactivating extension",
                );
                ExtensionRepo::deactivate(ctx.pool, extension.id).await?;
                inactive.push(name);
            }
            Err(CanvasError::NotFound) => {
                tracing::info!(
                    user_id = user_canvas_id,
                    course_id,
                    extension_id = extension.id,
                    "User not in course, deactivating extension",
                );
                ExtensionRepo::deactivate(ctx.pool, extension.id).await?;
                inactive.push(name);
            }
            Err(e) => return Err(e.into()),
        }
    }

    if percent_users.is_empty() {
        return Ok(ctx
            .conclude(JobMeta::complete(no_active_extensions(&inactive)))
            .await?);
    }

    let total = quizzes.len();
    for (index, quiz) in quizzes.iter().enumerate() {
        let percent_done = progress_percent(index, total);
        ctx.report(&JobMeta::processing(
            percent_done,
            refreshing_quiz(quiz.id, &quiz.title, index + 1, total),
        ))
        .await?;

        for (&percent, user_ids) in &percent_users {
            let outcome = extend_quiz(ctx.lms, course_id, quiz, percent, user_ids).await;
            if !outcome.success {
                return Ok(ctx
                    .conclude(JobMeta::failed(percent_done, refresh_failure(&outcome.message)))
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
        }
    }

    tracing::info!(course_id, quizzes = total, "Refresh complete");
    Ok(ctx.conclude(JobMeta::complete(refresh_summary(total))).await?)
}
