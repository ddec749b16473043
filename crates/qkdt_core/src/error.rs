//! Error types for QKDT
//!
//! Gantree: L0_Foundation → Errors
//!
//! Terminal failures of an analysis run. Backend connectivity problems are
//! not represented here: the locator recovers from them locally.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for QKDT
/// Gantree: QkdtError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QkdtError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// Photon rate must be finite and non-negative
    #[error("Invalid photon rate {0} MHz: must be finite and >= 0")]
    InvalidPhotonRate(f64),

    /// Fiber distance must be finite and non-negative
    #[error("Invalid distance {0} km: must be finite and >= 0")]
    InvalidDistance(f64),

    /// Detection efficiency outside [0, 1]
    #[error("Invalid detection efficiency {0}: must be in range [0, 1]")]
    InvalidEfficiency(f64),

    /// Dark count rate must be finite and non-negative
    #[error("Invalid dark count rate {0} Hz: must be finite and >= 0")]
    InvalidDarkCountRate(f64),

    /// Probability value out of range [0, 1]
    #[error("Invalid probability {0}: must be in range [0, 1]")]
    InvalidProbability(f64),

    /// Arithmetic produced a non-finite quantity
    #[error("Non-finite {quantity}: {value}")]
    NonFinite { quantity: String, value: f64 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ========================================================================
    // Collaborator Errors
    // ========================================================================
    /// Backend directory error surfaced outside the locator
    #[error("Backend error: {0}")]
    BackendError(String),

    /// Report storage error
    #[error("Storage error: {0}")]
    StorageError(String),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// File I/O error
    #[error("File error: {0}")]
    FileError(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type alias for QKDT operations
/// Gantree: QkdtResult<T> // type alias
pub type QkdtResult<T> = Result<T, QkdtError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for QkdtError {
    fn from(err: serde_json::Error) -> Self {
        QkdtError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for QkdtError {
    fn from(err: std::io::Error) -> Self {
        QkdtError::FileError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl QkdtError {
    /// Check if error is recoverable without aborting the caller
    pub fn is_recoverable(&self) -> bool {
        matches!(self, QkdtError::BackendError(_) | QkdtError::StorageError(_))
    }

    /// Check if error is a validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            QkdtError::InvalidPhotonRate(_)
                | QkdtError::InvalidDistance(_)
                | QkdtError::InvalidEfficiency(_)
                | QkdtError::InvalidDarkCountRate(_)
                | QkdtError::InvalidProbability(_)
                | QkdtError::ConfigError(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
