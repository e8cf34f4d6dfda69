//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod course_repo;
pub mod deployment_repo;
pub mod extension_repo;
pub mod job_repo;
pub mod key_repo;
pub mod lti_state_repo;
pub mod quiz_repo;
pub mod registration_repo;
pub mod user_repo;
pub mod worker_repo;

pub use course_repo::CourseRepo;
pub use deployment_repo::DeploymentRepo;
pub use extension_repo::ExtensionRepo;
pub use job_repo::JobRepo;
pub use key_repo::{KeyRepo, KeySetRepo};
pub use lti_state_repo::LtiStateRepo;
pub use quiz_repo::QuizRepo;
pub use registration_repo::RegistrationRepo;
pub use user_repo::UserRepo;
pub use worker_repo::WorkerHeartbeatRepo;
