//! Error types for the Warden policy library

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors raised when constructing policies from configuration.
///
/// There is no runtime failure mode: evaluation is a pure in-memory
/// computation over supplied events, so errors only occur while turning
/// configuration into a policy instance.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid time of day '{0}': expected HH:MM")]
    TimeOfDay(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
