//! # Error Types
//!
//! Defines the error type shared by the SDK crates.

use thiserror::Error;

/// Convenient result alias for SDK operations.
pub type SdkResult<T> = Result<T, SdkError>;

/// Errors raised by SDK values and collaborators.
///
/// None of these ever abort the host process; the orchestrator reports them
/// through the error-reporting collaborator instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    /// A URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A host option carried a value of the wrong shape.
    #[error("Invalid option `{key}`: expected {expected}")]
    InvalidOption {
        key: &'static str,
        expected: &'static str,
    },

    /// A collaborator failed to complete an operation.
    #[error("Collaborator `{role}` failed: {message}")]
    Collaborator { role: &'static str, message: String },

    /// A cached record could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SdkError {
    /// Shorthand for a collaborator failure.
    pub fn collaborator(role: &'static str, message: impl Into<String>) -> Self {
        Self::Collaborator {
            role,
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for SdkError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
