//! Error types for the API tester
//!
//! These errors never describe a failed API expectation: those are recorded
//! as failed calls or scenario outcomes. They cover misuse of the harness,
//! bad configuration, and problems building a request.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the API tester
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Request Construction Errors ===
    #[error("Unsupported HTTP method '{0}'. Supported methods: GET, POST, DELETE")]
    UnsupportedMethod(String),

    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // === Scenario Errors ===
    #[error("Unexpected response from {endpoint}: {message}")]
    UnexpectedResponse { endpoint: String, message: String },

    #[error("Failed to generate workbook: {0}")]
    Workbook(#[from] zip::result::ZipError),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid header error
    pub fn invalid_header(name: &str, reason: impl ToString) -> Self {
        Self::InvalidHeader {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an unexpected response error
    pub fn unexpected_response(endpoint: &str, message: &str) -> Self {
        Self::UnexpectedResponse {
            endpoint: endpoint.to_string(),
            message: message.to_string(),
        }
    }
}
