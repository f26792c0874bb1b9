//! Error types for payload parsing in tempdash-types.

use thiserror::Error;

/// Errors that can occur when interpreting backend payload values.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// The telemetry value has no leading numeric part.
    #[error("Not a numeric value: {0:?}")]
    NotNumeric(String),

    /// The telemetry value was null or absent.
    #[error("Missing value")]
    Missing,
}

/// Result type alias using tempdash-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
