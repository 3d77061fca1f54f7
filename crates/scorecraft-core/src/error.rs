//! Error types for scorecraft-core.
//!
//! Scoring itself never fails; these cover configuration loading and the
//! contracts with the external content assistant.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while validating content-assistant requests and responses.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// The response body was not JSON at all.
    #[error("assistant response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The response parsed as JSON but is missing fields or has the wrong shape.
    #[error("malformed assistant response for {operation}: {reason}")]
    MalformedResponse {
        /// The assistant operation whose response was rejected.
        operation: &'static str,
        /// What was wrong with the response.
        reason: String,
    },

    /// A request was built with missing or out-of-range inputs.
    #[error("invalid {operation} request: {reason}")]
    InvalidRequest {
        /// The assistant operation the request was for.
        operation: &'static str,
        /// What was wrong with the request.
        reason: String,
    },
}

/// Result type alias using [`CollaboratorError`].
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;
