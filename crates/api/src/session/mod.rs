//! Instructor sessions established by an LTI launch.
//!
//! The session is a signed JWT held in the [`SESSION_COOKIE`] cookie, so any
//! API process can validate it without shared server-side storage.

pub mod guard;
pub mod jwt;

pub use guard::{LtiSession, RequireStaff, SessionRejection};
pub use jwt::SessionClaims;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "quizext_session";
