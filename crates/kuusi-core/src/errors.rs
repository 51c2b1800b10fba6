//! Collaborator error types.
//!
//! One enum per external collaborator. None of these are fatal to the
//! session: identity errors collapse to `SignedOut`, store errors end a
//! deferred join, storage errors read as "absent".

use serde::{Deserialize, Serialize};

/// Persisted flag storage failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum StorageError {
    /// Key rejected by the backend
    #[error("Invalid key: {reason}")]
    InvalidKey {
        /// Why the key was rejected
        reason: String,
    },
    /// Backend could not be read
    #[error("Read failed: {0}")]
    ReadFailed(String),
    /// Backend could not be written
    #[error("Write failed: {0}")]
    WriteFailed(String),
    /// Stored bytes could not be decoded
    #[error("Corrupt storage: {0}")]
    Corrupt(String),
}

/// Identity provider failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum IdentityError {
    /// Provider could not be reached or could not determine state
    #[error("Identity provider unavailable: {message}")]
    Unavailable {
        /// Provider message
        message: String,
    },
    /// Operation requires a signed-in user
    #[error("No signed-in user")]
    NoCurrentUser,
    /// Provider rejected the operation
    #[error("Identity operation rejected: {message}")]
    Rejected {
        /// Provider message
        message: String,
    },
}

impl IdentityError {
    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a rejected error
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Document store failures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum StoreError {
    /// Document store could not be reached
    #[error("Document store unavailable: {message}")]
    Unavailable {
        /// Store message
        message: String,
    },
    /// Security rules rejected the access
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Store message
        message: String,
    },
    /// Write targeted a document that does not exist
    #[error("Document not found: {path}")]
    NotFound {
        /// Document path
        path: String,
    },
}

impl StoreError {
    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a permission error
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            IdentityError::unavailable("timeout").to_string(),
            "Identity provider unavailable: timeout"
        );
        assert_eq!(
            StoreError::not_found("groups/G1").to_string(),
            "Document not found: groups/G1"
        );
        assert_eq!(
            StorageError::WriteFailed("disk full".into()).to_string(),
            "Write failed: disk full"
        );
    }
}
