//! Error types for Swapline

use thiserror::Error;

/// Core errors that can occur in Swapline
#[derive(Debug, Error)]
pub enum Error {
    #[error("Chain read error: {0}")]
    Read(#[from] ReadError),

    #[error("Invalid address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Failures of the external chain-state reader
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    #[error("Chain source unreachable: {source_name}")]
    Unreachable { source_name: String },

    #[error("Read of {what} timed out after {millis}ms")]
    Timeout { what: String, millis: u64 },

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("Malformed chain data: {message}")]
    Malformed { message: String },

    #[error("Read cancelled")]
    Cancelled,
}

/// Result type alias for Swapline operations
pub type Result<T> = std::result::Result<T, Error>;

impl ReadError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unreachable { .. } => "source_unreachable",
            Self::Timeout { .. } => "read_timeout",
            Self::NotFound { .. } => "not_found",
            Self::Malformed { .. } => "malformed_data",
            Self::Cancelled => "cancelled",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
