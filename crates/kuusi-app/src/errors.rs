//! Categorized application errors
//!
//! Nothing in the session core is fatal: every failure path still ends in a
//! concrete route. These types exist so that frontends can show the right
//! message for the few operations that surface an error at all (invitation
//! code entry, resending a verification email, restarting sign-up).

use crate::config::ConfigError;
use kuusi_core::{IdentityError, StorageError, StoreError};
use std::fmt;

// ============================================================================
// Error Categories
// ============================================================================

/// High-level error categories for frontend error handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// User input validation errors (correctable by user)
    Input,
    /// Configuration errors (correctable by modifying settings)
    Config,
    /// Identity provider rejected or could not resolve the user
    Identity,
    /// Referenced document does not exist
    NotFound,
    /// Remote service unreachable (often transient)
    Network,
    /// Local persisted storage failed
    Storage,
    /// Unexpected conditions
    Internal,
}

impl ErrorCategory {
    /// Check if this error category is user-correctable.
    #[must_use]
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Input | Self::Config)
    }

    /// Check if this error category is likely transient.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network)
    }

    /// Get a short label for this category.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::Config => "Config",
            Self::Identity => "Identity",
            Self::NotFound => "Not Found",
            Self::Network => "Network",
            Self::Storage => "Storage",
            Self::Internal => "Internal",
        }
    }

    /// Get a hint for the user on how to resolve this category of error.
    #[must_use]
    pub fn resolution_hint(&self) -> &'static str {
        match self {
            Self::Input => "Check your input and try again",
            Self::Config => "Review your configuration settings",
            Self::Identity => "Sign in again",
            Self::NotFound => "The requested item no longer exists",
            Self::Network => "Check your network connection and retry",
            Self::Storage => "Browser storage is unavailable",
            Self::Internal => "An unexpected error occurred",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// AppError
// ============================================================================

/// Categorized application errors
#[derive(Clone, Debug, thiserror::Error)]
pub enum AppError {
    /// User input rejected
    #[error("{field}: {message}")]
    Input {
        /// Which input was rejected
        field: String,
        /// Why
        message: String,
    },
    /// Session configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Identity provider failure
    #[error(transparent)]
    Identity(#[from] IdentityError),
    /// Document store failure
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Persisted flag storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Unexpected condition
    #[error("{source_name}: {message}")]
    Internal {
        /// Component that failed
        source_name: String,
        /// What happened
        message: String,
    },
}

impl AppError {
    /// Create an input error
    pub fn input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Input {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// Categorize this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Input { .. } => ErrorCategory::Input,
            Self::Config(_) => ErrorCategory::Config,
            Self::Identity(IdentityError::Unavailable { .. }) => ErrorCategory::Network,
            Self::Identity(_) => ErrorCategory::Identity,
            Self::Store(StoreError::Unavailable { .. }) => ErrorCategory::Network,
            Self::Store(StoreError::NotFound { .. }) => ErrorCategory::NotFound,
            Self::Store(StoreError::PermissionDenied { .. }) => ErrorCategory::Identity,
            Self::Storage(_) => ErrorCategory::Storage,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Check if retrying the same operation may succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Input { .. } => true,
            Self::Config(_) => false,
            Self::Identity(_) | Self::Store(_) => self.category().is_transient(),
            Self::Storage(_) => false,
            Self::Internal { .. } => false,
        }
    }

    /// Get a short error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Input { .. } => "INPUT",
            Self::Config(_) => "CONFIG",
            Self::Identity(e) => match e {
                IdentityError::Unavailable { .. } => "IDENTITY_UNAVAILABLE",
                IdentityError::NoCurrentUser => "IDENTITY_NO_USER",
                IdentityError::Rejected { .. } => "IDENTITY_REJECTED",
            },
            Self::Store(e) => match e {
                StoreError::Unavailable { .. } => "STORE_UNAVAILABLE",
                StoreError::PermissionDenied { .. } => "STORE_PERMISSION",
                StoreError::NotFound { .. } => "STORE_NOT_FOUND",
            },
            Self::Storage(_) => "STORAGE",
            Self::Internal { .. } => "INTERNAL",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_display() {
        let err = AppError::input("invitation code", "code does not match");
        assert_eq!(err.to_string(), "invitation code: code does not match");
        assert_eq!(err.code(), "INPUT");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_identity_unavailable_is_network() {
        let err = AppError::from(IdentityError::unavailable("timeout"));
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.code(), "IDENTITY_UNAVAILABLE");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_store_errors_categorized() {
        assert_eq!(
            AppError::from(StoreError::not_found("groups/G1")).category(),
            ErrorCategory::NotFound
        );
        let denied = AppError::from(StoreError::permission_denied("rules"));
        assert_eq!(denied.category(), ErrorCategory::Identity);
        assert!(!denied.is_recoverable());
    }

    #[test]
    fn test_internal_error() {
        let err = AppError::internal("guard", "join task vanished");
        assert_eq!(err.to_string(), "guard: join task vanished");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_error_category_user_correctable() {
        assert!(ErrorCategory::Input.is_user_correctable());
        assert!(ErrorCategory::Config.is_user_correctable());
        assert!(!ErrorCategory::Identity.is_user_correctable());
        assert!(!ErrorCategory::Network.is_user_correctable());
        assert!(!ErrorCategory::Storage.is_user_correctable());
    }

    #[test]
    fn test_error_category_resolution_hints() {
        for category in [
            ErrorCategory::Input,
            ErrorCategory::Config,
            ErrorCategory::Identity,
            ErrorCategory::NotFound,
            ErrorCategory::Network,
            ErrorCategory::Storage,
            ErrorCategory::Internal,
        ] {
            assert!(!category.resolution_hint().is_empty());
        }
    }
}
