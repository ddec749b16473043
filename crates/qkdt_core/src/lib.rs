//! # QKDT Core
//!
//! Report types, model constants, errors and the per-run log trail for the
//! QKD Device Testbed.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qkdt_core // L0: Foundation (완료)
//!     CoreTypes // BackendInfo, Metrics, Analysis, Report (완료)
//!     Constants // channel/probe/keyrate/security 상수 (완료)
//!     Errors // QkdtError (완료)
//!     LogTrail // 실행 로그 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qkdt_core::prelude::*;
//!
//! let mut trail = LogTrail::new();
//! trail.info("Starting quantum device testbed analysis");
//!
//! let info = BackendInfo::fallback("simulation", "Backend directory not available");
//! assert!(info.is_simulated());
//!
//! // 0.2 dB/km over a 10 km default link
//! assert_eq!(channel::FIBER_ATTENUATION_DB_PER_KM * channel::DEFAULT_DISTANCE_KM, 2.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Run log trail (Gantree: L0_Foundation → LogTrail)
pub mod log_trail;

// ============================================================================
// Re-exports
// ============================================================================

pub use constants::{backend, channel, keyrate, probe, security};
pub use error::{QkdtError, QkdtResult};
pub use log_trail::LogTrail;
pub use types::{
    unix_timestamp, Analysis, BackendInfo, LogEntry, LogLevel, Metrics, Rating, Report,
    ReportStatus,
};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qkdt_core::prelude::*;
    //! ```

    pub use crate::constants::{backend, channel, keyrate, probe, security};
    pub use crate::error::{QkdtError, QkdtResult};
    pub use crate::log_trail::LogTrail;
    pub use crate::types::{
        Analysis, BackendInfo, LogEntry, LogLevel, Metrics, Rating, Report, ReportStatus,
    };
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================
