use quizext_canvas::models::CanvasQuiz;
use quizext_canvas::{all_quizzes, Lms};
use quizext_core::types::CanvasId;
use quizext_db::repositories::{CourseRepo, QuizRepo};
use sqlx::PgPool;

use crate::error::WorkerError;

/// Quizzes in Canvas that were never extended (missing) or whose time limit
/// changed since they were last extended (stale).
///
/// With `quickcheck` the scan stops at the first hit.
pub async fn missing_and_stale_quizzes(
    lms: &dyn Lms,
    pool: &PgPool,
    course_id: CanvasId,
    quickcheck: bool,
) -> Result<Vec<CanvasQuiz>, WorkerError> {
    let quizzes = all_quizzes(lms, course_id).await?;
    let course = CourseRepo::find_by_canvas_id(pool, course_id).await?;

    let mut missing = Vec::new();
    for quiz in quizzes {
        let stored = match &course {
            Some(course) => {
                QuizRepo::find_by_canvas_id(pool, course.id, quiz.id, quiz.kind.is_new()).await?
            }
            None => None,
        };

        let needs_update = match stored {
            None => true,
            Some(stored) => stored.time_limit != quiz.time_limit,
        };

        if needs_update {
            missing.push(quiz);
            if quickcheck {
                break;
            }
        }
    }

    Ok(missing)
}
