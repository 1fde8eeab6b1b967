//! # GENAISIS Application Library
//!
//! The drivers around `genaisis-core`: the HTTP API hosting live wizards, the
//! CLI replaying answer sheets, configuration and the submission sinks.
//!
//! Split from `main.rs` so integration tests can build the router directly.

pub mod answers;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod sinks;

pub use config::AppConfig;
pub use error::AppError;
