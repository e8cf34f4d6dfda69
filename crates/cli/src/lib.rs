//! Administration of the tool's LTI setup: signing keys, platform
//! registrations and deployments.

pub mod cli;
pub mod commands;
