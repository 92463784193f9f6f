//! Error types for content store operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced while submitting content to a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The storage daemon could not be reached.
    #[error("store unreachable: {message}")]
    Unreachable { message: String },

    /// The store refused the submission.
    #[error("store rejected submission ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The store answered with a malformed result.
    #[error("invalid store response: {message}")]
    InvalidResponse { message: String },

    /// Local I/O failure while assembling the submission.
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl StoreError {
    /// True when the daemon never received the submission.
    /// Remediation is connectivity, not content.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Unreachable { .. })
    }

    /// True when the store received and refused the submission.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unreachable {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}
