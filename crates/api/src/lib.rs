//! Quiz Extensions API server library.
//!
//! Exposes the building blocks (config, state, error handling, LTI, sessions,
//! routes) so integration tests and the binary entrypoint can both use them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod lti;
pub mod router;
pub mod routes;
pub mod session;
pub mod state;
