//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row and, where inserts take several fields, a create DTO.

pub mod course;
pub mod extension;
pub mod job;
pub mod key;
pub mod lti_state;
pub mod quiz;
pub mod registration;
pub mod status;
pub mod user;
pub mod worker;
