//! Service boundary errors.
//!
//! Only two kinds cross the boundary of the services:
//!
//! - **Conflict**: the current state of the data prevents the operation
//!   (duplicate link, missing person or pet, constraint violation). The
//!   caller can inspect state and retry with different input.
//! - **Internal**: an unexpected failure unrelated to the request itself.
//!
//! Store failures are re-classified into one of these before they leave a
//! service; a raw [`crate::StoreError`] never does.

use thiserror::Error;

/// Error returned by every service operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// The operation conflicts with the current data.
    #[error("{0}")]
    Conflict(String),

    /// Unexpected failure, not caused by the request.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Create a conflict error
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Create an internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }

    /// Human-readable message without the kind prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Conflict(msg) | Self::Internal(msg) => msg,
        }
    }

    /// Process exit code used by the command line front end.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Conflict(_) => 3,
            Self::Internal(_) => 4,
        }
    }
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;
