//! Domain types and pure logic shared by the API server, worker and CLI.
//!
//! Nothing in here touches the network or the database.

pub mod error;
pub mod extension;
pub mod job_messages;
pub mod platform;
pub mod roles;
pub mod types;
