//! Job handlers. Each returns the final [`JobMeta`](quizext_core::job_messages::JobMeta),
//! which the runner stores as the job result.

pub mod refresh;
pub mod update;

pub use refresh::refresh_background;
pub use update::update_background;
