use async_trait::async_trait;
use quizext_core::types::CanvasId;

use crate::error::CanvasError;
use crate::models::{CanvasQuiz, CanvasUser, Course, QuizExtension};

/// The Canvas operations the tool relies on.
#[async_trait]
pub trait Lms: Send + Sync {
    async fn get_course(&self, course_id: CanvasId) -> Result<Course, CanvasError>;

    /// A course member, with enrollments included.
    async fn get_user(&self, course_id: CanvasId, user_id: CanvasId)
        -> Result<CanvasUser, CanvasError>;

    /// Active and invited students whose name matches `query`.
    async fn search_students(
        &self,
        course_id: CanvasId,
        query: &str,
    ) -> Result<Vec<CanvasUser>, CanvasError>;

    async fn list_quizzes(&self, course_id: CanvasId) -> Result<Vec<CanvasQuiz>, CanvasError>;

    async fn list_new_quizzes(&self, course_id: CanvasId) -> Result<Vec<CanvasQuiz>, CanvasError>;

    /// Classic quiz extensions.
    async fn set_extensions(
        &self,
        course_id: CanvasId,
        quiz_id: CanvasId,
        extensions: &[QuizExtension],
    ) -> Result<(), CanvasError>;

    /// New Quiz accommodations.
    async fn set_accommodations(
        &self,
        course_id: CanvasId,
        quiz_id: CanvasId,
        extensions: &[QuizExtension],
    ) -> Result<(), CanvasError>;

    /// The user owning the API key. Used to check the key works.
    async fn get_self(&self) -> Result<CanvasUser, CanvasError>;
}

/// Classic quizzes followed by New Quizzes.
///
/// Some Canvas installations do not support New Quizzes; a failure listing
/// them is logged and treated as an empty list.
pub async fn all_quizzes(lms: &dyn Lms, course_id: CanvasId) -> Result<Vec<CanvasQuiz>, CanvasError> {
    let mut quizzes = lms.list_quizzes(course_id).await?;

    match lms.list_new_quizzes(course_id).await {
        Ok(new_quizzes) => quizzes.extend(new_quizzes),
        Err(e) => {
            tracing::error!(
                course_id,
                error = %e,
                "Error fetching New Quizzes. Your Canvas installation may not support them.",
            );
        }
    }

    Ok(quizzes)
}
