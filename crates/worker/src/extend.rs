//! Applying a percent of extra time to one quiz.

use quizext_canvas::models::{CanvasQuiz, QuizExtension};
use quizext_canvas::Lms;
use quizext_core::extension::{added_minutes, ExtensionOutcome, QuizKind};
use quizext_core::types::CanvasId;

/// Give `user_ids` `percent` of the quiz's time limit.
///
/// Classic quizzes receive extensions, New Quizzes receive accommodations.
/// Quizzes without a time limit are left alone and reported as a success
/// with no added time. Canvas failures are folded into the outcome.
pub async fn extend_quiz(
    lms: &dyn Lms,
    course_id: CanvasId,
    quiz: &CanvasQuiz,
    percent: i32,
    user_ids: &[CanvasId],
) -> ExtensionOutcome {
    let Some(minutes) = added_minutes(quiz.time_limit, percent) else {
        return ExtensionOutcome::no_time_limit(quiz.kind, quiz.id);
    };

    let extensions: Vec<QuizExtension> = user_ids
        .iter()
        .map(|&user_id| QuizExtension {
            user_id,
            extra_time: minutes,
        })
        .collect();

    let result = match quiz.kind {
        QuizKind::Classic => lms.set_extensions(course_id, quiz.id, &extensions).await,
        QuizKind::New => lms.set_accommodations(course_id, quiz.id, &extensions).await,
    };

    match result {
        Ok(()) => ExtensionOutcome::added(quiz.kind, quiz.id, minutes),
        Err(e) => {
            tracing::warn!(course_id, quiz_id = quiz.id, kind = %quiz.kind, error = %e, "Extension rejected by Canvas");
            ExtensionOutcome::failed(quiz.kind, quiz.id, e)
        }
    }
}
