//! Errors raised by the shared domain logic.

/// Instructor input that cannot be turned into an extension request.
///
/// The message is shown to the instructor as-is through job meta.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}
