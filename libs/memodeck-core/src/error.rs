//! Error types for memodeck-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors produced by the scheduling engine.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("quality rating {value} is outside the valid range 0..=5")]
    InvalidQuality { value: i32 },
}
