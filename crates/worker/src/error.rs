use quizext_canvas::CanvasError;

/// Errors that abort a job.
///
/// Expected business failures (unknown course, missing percent, a quiz
/// Canvas refused to extend) are reported through job meta instead and do
/// not surface here.
#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Canvas error: {0}")]
    Canvas(#[from] CanvasError),

    #[error("Invalid job: {0}")]
    InvalidJob(String),
}
