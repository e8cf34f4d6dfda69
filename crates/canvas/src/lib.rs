//! Canvas LMS REST client.
//!
//! [`CanvasClient`] talks to a Canvas instance over HTTP; the rest of the
//! workspace depends only on the [`Lms`] trait so jobs and handlers can be
//! exercised against an in-memory implementation.

pub mod client;
pub mod config;
pub mod error;
pub mod lms;
pub mod models;

pub use client::CanvasClient;
pub use config::CanvasConfig;
pub use error::CanvasError;
pub use lms::{all_quizzes, Lms};
