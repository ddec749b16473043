//! # QKDT IBM
//!
//! IBM Quantum backend directory for the QKD device testbed.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qkdt_ibm // L2: IBM Quantum 디렉터리 (완료)
//!     Auth // 토큰/API 키, IAM 교환 (완료)
//!     Client // REST: 디바이스 목록, 구성 (완료)
//!     IbmBackendProvider // BackendProvider 구현 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use qkdt_backend::BackendLocator;
//! use qkdt_core::LogTrail;
//! use qkdt_ibm::RealBackendProvider;
//! use std::sync::Arc;
//!
//! let locator = BackendLocator::new(Arc::new(RealBackendProvider::new()));
//! let mut trail = LogTrail::new();
//! // IBM_QUANTUM_API_KEY, then ~/.qiskit/qiskit-ibm.json
//! let info = locator.locate(None, &mut trail);
//! println!("{}", info);
//! ```
//!
//! ## Environment Variables
//!
//! ```bash
//! export IBM_QUANTUM_API_KEY="your-api-token"
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Authentication (Gantree: L2_Ibm → Auth)
pub mod auth;

/// REST API client (Gantree: L2_Ibm → Client)
pub mod client;

/// Directory provider (Gantree: L2_Ibm → IbmBackendProvider)
pub mod provider;

// ============================================================================
// Re-exports
// ============================================================================

pub use auth::{AuthError, IbmChannel, IbmCredentials, TokenType};
pub use client::{parse_device_list, ClientError, DeviceConfiguration, DeviceSummary, IbmClient};
pub use provider::{into_directory_error, IbmBackendProvider, DEFAULT_TIMEOUT};

/// Provider for real hardware access
pub use provider::IbmBackendProvider as RealBackendProvider;

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::auth::{IbmChannel, IbmCredentials};
    pub use crate::client::IbmClient;
    pub use crate::provider::IbmBackendProvider;
}

// ============================================================================
// Integration Tests
// ============================================================================
