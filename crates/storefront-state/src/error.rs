//! # Store Error Types
//!
//! Error types for everything in the storefront state layer that touches the
//! outside world.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Application         │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Transport      │  │  Rejected               │ │
//! │  │  InvalidUrl     │  │  Decode         │  │  (success: false)       │ │
//! │  │  ConfigLoad/Save│  │                 │  │                         │ │
//! │  │  FixtureLoad    │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │     Domain      │  Wraps storefront_core::CoreError                  │
//! │  │  Core(..)       │  (cart total against a missing product)            │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Transport and application errors never escape a fetch or a sync push;
//! they are downgraded to notifications. Configuration and domain errors are
//! returned to the caller.

use storefront_core::CoreError;
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Message shown when the backend rejects a request without saying why.
pub const DEFAULT_REJECTION_MESSAGE: &str = "Request was rejected by the server";

/// Store error type covering all failures of the state layer.
#[derive(Debug, Error)]
pub enum StoreError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Backend base URL could not be used.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    /// Fixture catalog could not be read or parsed.
    #[error("Failed to load product fixture: {0}")]
    FixtureLoadFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Network unreachable, timeout, non-2xx status, TLS failure.
    #[error("{0}")]
    Transport(String),

    /// Response body was not the expected JSON.
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    // =========================================================================
    // Application Errors
    // =========================================================================
    /// The backend answered `success: false`.
    #[error("{}", message.as_deref().unwrap_or(DEFAULT_REJECTION_MESSAGE))]
    Rejected { message: Option<String> },

    // =========================================================================
    // Runtime Errors
    // =========================================================================
    /// A background task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    TaskFailed(String),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else if err.is_builder() {
            StoreError::InvalidConfig(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for StoreError {
    fn from(err: url::ParseError) -> Self {
        StoreError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for StoreError {
    fn from(err: toml::ser::Error) -> Self {
        StoreError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl StoreError {
    /// Creates a rejection from an optional server message.
    pub fn rejected(message: Option<String>) -> Self {
        StoreError::Rejected { message }
    }

    /// Returns true if the request never produced a usable answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, StoreError::Transport(_) | StoreError::Decode(_))
    }

    /// Returns true if the backend explicitly said no.
    pub fn is_rejection(&self) -> bool {
        matches!(self, StoreError::Rejected { .. })
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidConfig(_)
                | StoreError::InvalidUrl(_)
                | StoreError::ConfigLoadFailed(_)
                | StoreError::ConfigSaveFailed(_)
                | StoreError::FixtureLoadFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_uses_server_message() {
        let err = StoreError::rejected(Some("Product out of stock".into()));
        assert_eq!(err.to_string(), "Product out of stock");
        assert!(err.is_rejection());
        assert!(!err.is_transport());
    }

    #[test]
    fn test_rejection_without_message() {
        let err = StoreError::rejected(None);
        assert_eq!(err.to_string(), DEFAULT_REJECTION_MESSAGE);
    }

    #[test]
    fn test_categories() {
        assert!(StoreError::Transport("connection refused".into()).is_transport());
        assert!(StoreError::Decode("expected value".into()).is_transport());
        assert!(StoreError::InvalidUrl("relative URL".into()).is_config_error());
        assert!(!StoreError::Transport("timeout".into()).is_config_error());
        assert!(!StoreError::TaskFailed("panicked".into()).is_transport());
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: StoreError = CoreError::ProductNotFound("p9".into()).into();
        assert_eq!(err.to_string(), "Product not found: p9");
    }
}
