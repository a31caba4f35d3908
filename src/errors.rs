/*!
 * Error types for the bilinguo application.
 *
 * Gateway failures are described by `ProviderError`. Everything that
 * reaches the operator goes through `AppError`, whose variants always
 * carry the failing operation and the offending value.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when asking a translation provider for a word
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The request could not be sent or the connection dropped
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// The provider did not answer within the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The provider answered with a non-success status
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason phrase
        message: String,
    },

    /// The response body was not the expected JSON shape
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The provider returned nothing useful (empty, or the word echoed back)
    #[error("No translation available for '{word}'")]
    NoTranslation {
        /// The word that was sent
        word: String,
    },
}

/// Main application error type, one variant per failure kind an operator can see
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed input or arguments
    #[error("{operation}: invalid input: {message}")]
    Validation {
        /// Operation that rejected the input
        operation: String,
        /// What was wrong with it
        message: String,
    },

    /// Reading or writing a file failed
    #[error("{operation}: I/O error on {path:?}: {message}")]
    Io {
        /// Operation that touched the file
        operation: String,
        /// Offending file
        path: PathBuf,
        /// Underlying error text
        message: String,
    },

    /// A translation could not be fetched; the store is unchanged for the word
    #[error("translate: failed to translate '{word}': {source}")]
    Translation {
        /// Word that was being translated
        word: String,
        /// Provider failure
        #[source]
        source: ProviderError,
    },

    /// The vocabulary store rejected or failed an operation
    #[error("{operation}: storage error: {message}")]
    Store {
        /// Store operation name
        operation: String,
        /// Underlying error text
        message: String,
    },
}

impl AppError {
    /// Build a validation error for the given operation
    pub fn validation(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Build an I/O error for the given operation and file
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, error: impl std::fmt::Display) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            message: error.to_string(),
        }
    }

    /// Wrap a store failure, keeping the full context chain
    pub fn store(operation: impl Into<String>, error: anyhow::Error) -> Self {
        Self::Store {
            operation: operation.into(),
            message: format!("{:#}", error),
        }
    }
}
