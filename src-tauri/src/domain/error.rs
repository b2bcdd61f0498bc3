//! Domain Layer - Errors
//!
//! Failure taxonomy shared by the store backends and the command layer.

use serde::{Deserialize, Serialize};

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    /// A compare-and-swap kept losing against concurrent writers
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    /// Transient transport failure (connect, timeout, reset)
    #[error("Network error: {0}")]
    Network(String),
    /// The store has not been initialised yet
    #[error("Store unavailable: {0}")]
    Unavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Stable machine-readable kind, sent to the frontend alongside the message
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::InvalidInput(_) => "invalid_input",
            DomainError::NotFound(_) => "not_found",
            DomainError::Conflict(_) => "conflict",
            DomainError::PermissionDenied(_) => "permission_denied",
            DomainError::Network(_) => "network",
            DomainError::Unavailable(_) => "unavailable",
            DomainError::Internal(_) => "internal",
        }
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(e: rusqlite::Error) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<reqwest::Error> for DomainError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() || e.is_request() {
            return DomainError::Network(e.to_string());
        }
        match e.status().map(|s| s.as_u16()) {
            Some(401) | Some(403) => DomainError::PermissionDenied(e.to_string()),
            Some(404) => DomainError::NotFound(e.to_string()),
            _ => DomainError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        assert_eq!(DomainError::InvalidInput("x".into()).kind(), "invalid_input");
        assert_eq!(DomainError::Network("x".into()).kind(), "network");
        assert_eq!(DomainError::PermissionDenied("x".into()).kind(), "permission_denied");
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::NotFound("milk".into());
        assert_eq!(err.to_string(), "Not found: milk");
    }
}
