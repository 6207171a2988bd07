//! Unified error handling for armctl-core
//!
//! # Example
//!
//! ```rust
//! use armctl_core::{CoreError, TransportFault};
//! use armctl_core::envelope::normalize_fault;
//!
//! let err = normalize_fault(TransportFault::new(
//!     404,
//!     r#"{"error": {"code": "ResourceNotFound", "message": "gone"}}"#,
//! ));
//! assert!(err.is_not_found());
//! assert!(!err.is_retryable());
//! ```

use crate::config::ConfigError;
use crate::envelope::OperationError;
use crate::secret::CredentialError;
use crate::transport::TransportFault;
use std::time::Duration;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// A stored secret could not be decrypted
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Service fault with no recognized error envelope
    #[error("Transport error: {0}")]
    Transport(#[from] TransportFault),

    /// Service fault decoded from a known error envelope
    #[error("{error}")]
    Operation { status: u16, error: OperationError },

    /// A child with the same name already exists in the parent collection
    #[error("{kind} with the specified name '{name}' already exists")]
    DuplicateName { kind: &'static str, name: String },

    /// A named child was not found in the parent collection
    #[error("{kind} with the specified name '{name}' does not exist")]
    NotFound { kind: &'static str, name: String },

    /// Connection-level failure before any HTTP status was received
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Operation did not reach a terminal state in time
    #[error("Operation timed out after {0:?}")]
    TaskTimeout(Duration),

    /// Operation reached a failed terminal state
    #[error("Operation failed: {0}")]
    TaskFailed(String),

    /// Input rejected before any call was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    fn status(&self) -> Option<u16> {
        match self {
            CoreError::Transport(fault) => Some(fault.status),
            CoreError::Operation { status, .. } => Some(*status),
            CoreError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if this is a "not found" error (404 or a missing child)
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. }) || self.status() == Some(404)
    }

    /// Returns true if this is an authentication/authorization error (401/403)
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }

    /// Returns true if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(500..=599))
    }

    /// Returns true if this is a timeout error
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            CoreError::TaskTimeout(_) => true,
            CoreError::Http(e) => e.is_timeout(),
            _ => self.status() == Some(408),
        }
    }

    /// Returns true if this is a rate limiting error (429)
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// Returns true if this is a conflict (duplicate name, 409/412)
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, CoreError::DuplicateName { .. })
            || matches!(self.status(), Some(409) | Some(412))
    }

    /// Returns true if this is a bad request error (400 or local validation)
    #[must_use]
    pub fn is_bad_request(&self) -> bool {
        matches!(self, CoreError::Validation(_)) || self.status() == Some(400)
    }

    /// Returns true if the error was raised locally, before any transport call
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            CoreError::Credential(_)
                | CoreError::DuplicateName { .. }
                | CoreError::NotFound { .. }
                | CoreError::Validation(_)
                | CoreError::Config(_)
        )
    }

    /// Returns true if this error is potentially retryable by the caller
    ///
    /// Nothing in this crate retries on its own.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::TaskTimeout(_) => true,
            CoreError::Http(e) => e.is_connect() || e.is_timeout(),
            _ => self.is_server_error() || self.is_rate_limited(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(status: u16) -> CoreError {
        CoreError::Operation {
            status,
            error: OperationError {
                code: "Code".to_string(),
                message: "Message".to_string(),
            },
        }
    }

    #[test]
    fn test_status_helpers_for_transport_faults() {
        let err: CoreError = TransportFault::new(404, "").into();
        assert!(err.is_not_found());
        assert!(!err.is_retryable());

        let err: CoreError = TransportFault::new(503, "").into();
        assert!(err.is_server_error());
        assert!(err.is_retryable());

        let err: CoreError = TransportFault::new(429, "").into();
        assert!(err.is_rate_limited());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_status_helpers_for_decoded_errors() {
        assert!(operation(401).is_unauthorized());
        assert!(operation(403).is_unauthorized());
        assert!(operation(409).is_conflict());
        assert!(operation(400).is_bad_request());
        assert!(!operation(400).is_local());
    }

    #[test]
    fn test_local_validation_errors() {
        let duplicate = CoreError::DuplicateName {
            kind: "RedirectConfiguration",
            name: "cfg1".to_string(),
        };
        assert!(duplicate.is_conflict());
        assert!(duplicate.is_local());
        assert_eq!(
            duplicate.to_string(),
            "RedirectConfiguration with the specified name 'cfg1' already exists"
        );

        let missing = CoreError::NotFound {
            kind: "NodeType",
            name: "nt2".to_string(),
        };
        assert!(missing.is_not_found());
        assert!(missing.is_local());
    }

    #[test]
    fn test_credential_error_is_transparent() {
        let err: CoreError = CredentialError {
            field: "administratorLoginPassword".to_string(),
            reason: "bad".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Failed to decrypt 'administratorLoginPassword': bad"
        );
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_task_errors() {
        let err = CoreError::TaskTimeout(Duration::from_secs(60));
        assert!(err.is_timeout());
        assert!(err.is_retryable());
        assert!(err.to_string().contains("timed out"));

        let err = CoreError::TaskFailed("boom".to_string());
        assert!(!err.is_retryable());
    }
}
