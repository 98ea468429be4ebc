//! Persisted job applicant directory.

pub mod config;
pub mod directory;
pub mod error;
pub mod headlines;
pub mod telemetry;
