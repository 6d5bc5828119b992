//! Error types for adapter operations.
//!
//! Registry operations themselves never fail: missing configuration and
//! unknown identifiers are silent no-ops by design. Errors exist only at the
//! adapter boundary, where delivery and teardown can go wrong.

use thiserror::Error;

/// Errors an adapter can report to the registry.
#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    /// Delivering a message to the external platform failed.
    #[error("failed to deliver message: {reason}")]
    Delivery {
        /// Reason for failure.
        reason: String,
    },

    /// Shutting the adapter down failed.
    #[error("shutdown failed: {reason}")]
    Shutdown {
        /// Reason for failure.
        reason: String,
    },

    /// Internal adapter error.
    #[error("adapter error: {0}")]
    Internal(String),
}

impl AdapterError {
    /// Creates a delivery error.
    pub fn delivery(reason: impl Into<String>) -> Self {
        Self::Delivery {
            reason: reason.into(),
        }
    }

    /// Creates a shutdown error.
    pub fn shutdown(reason: impl Into<String>) -> Self {
        Self::Shutdown {
            reason: reason.into(),
        }
    }

    /// Creates an internal adapter error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
