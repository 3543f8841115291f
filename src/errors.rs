//! Error types for risk synthesis.
//!
//! All failures are validation failures raised synchronously to the caller
//! with the offending field identified — there are no transient errors and
//! nothing is retried internally. A reduced factor count (1-7 of 8 domains
//! present) is a supported partial scenario, not an error; only a fully
//! empty factor set is rejected.

use thiserror::Error;

/// Unified error type for synthesis and configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// A score or confidence outside [0,1], an unrecognized category, or a
    /// malformed phase value.
    #[error("invalid input ({field}): {message}")]
    InvalidInput { field: String, message: String },

    /// Category weights not summing to ~1.0, severity thresholds not
    /// strictly increasing, or duplicate/self-referential interaction pairs.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Zero factors present; synthesis is undefined and must be rejected
    /// rather than silently returning a neutral score.
    #[error("no risk factors present; synthesis requires at least one")]
    EmptyInput,
}

impl SynthesisError {
    /// Create an input error naming the offending field.
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Whether this error points at caller-supplied input rather than
    /// deployment configuration.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SynthesisError::InvalidInput { .. } | SynthesisError::EmptyInput
        )
    }
}

/// Result alias used throughout the synthesis pipeline.
pub type Result<T> = std::result::Result<T, SynthesisError>;
