//! Background worker: consumes the job queue and performs the bulk Canvas
//! calls behind quiz extensions.

pub mod config;
pub mod context;
pub mod error;
pub mod extend;
pub mod jobs;
pub mod runner;
pub mod stale;

pub use config::WorkerConfig;
pub use error::WorkerError;
pub use runner::JobRunner;
