// Error types for honeyshops.
// Covers shop fetching, payload decoding, sign-in providers and configuration.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HoneyError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Bad server response: HTTP {0}")]
    BadServerResponse(StatusCode),

    #[error("Schema mismatch at {path}: expected {expected}, found {actual}")]
    SchemaMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error("{provider} sign-in failed: {message}")]
    Provider { provider: String, message: String },

    #[error("Unknown authentication provider: {0}")]
    UnknownProvider(String),

    #[error("Missing HONEYSHOPS_MASTER_KEY environment variable")]
    MissingMasterKey,

    #[error("Invalid value for {var}: {reason}")]
    InvalidConfig { var: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HoneyError {
    /// Transport failure or non-200 response.
    pub fn is_network(&self) -> bool {
        matches!(self, HoneyError::Network(_) | HoneyError::BadServerResponse(_))
    }

    /// Payload could not be turned into shop records.
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            HoneyError::SchemaMismatch { .. } | HoneyError::Malformed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, HoneyError>;
