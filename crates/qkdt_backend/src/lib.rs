//! # QKDT Backend
//!
//! Backend directory capability and device locator.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qkdt_backend // L1: Backend (완료)
//!     BackendProvider // 디렉터리 인터페이스 (완료)
//!         NullBackendProvider // SDK 부재 시 (완료)
//!         StaticBackendProvider // 고정 목록 (완료)
//!     CredentialResolver // 명시 → 환경변수 (완료)
//!     BackendLocator // 탐색 + 시뮬레이터 폴백 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qkdt_backend::prelude::*;
//! use qkdt_core::LogTrail;
//! use std::sync::Arc;
//!
//! let provider = Arc::new(StaticBackendProvider::single("fake_lagos"));
//! let locator = BackendLocator::new(provider)
//!     .with_resolver(CredentialResolver::explicit_only());
//!
//! let mut trail = LogTrail::new();
//! let info = locator.locate(Some("my-token"), &mut trail);
//! assert!(info.connected);
//! assert_eq!(info.backend_name, "fake_lagos");
//! ```
//!
//! ## Degraded Mode
//!
//! ```rust
//! use qkdt_backend::prelude::*;
//! use qkdt_core::LogTrail;
//! use std::sync::Arc;
//!
//! let locator = BackendLocator::new(Arc::new(NullBackendProvider::new()));
//!
//! let mut trail = LogTrail::new();
//! let info = locator.locate(None, &mut trail);
//! assert!(!info.connected);
//! assert_eq!(info.backend_name, "simulation");
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Directory capability (Gantree: L1_Backend → BackendProvider)
pub mod provider;

/// Credential resolution (Gantree: L1_Backend → Credentials)
pub mod credentials;

/// Locator (Gantree: L1_Backend → BackendLocator)
pub mod locator;

// ============================================================================
// Re-exports
// ============================================================================

pub use credentials::{Credential, CredentialResolver, CredentialSource};
pub use locator::BackendLocator;
pub use provider::{
    format_coupling_map, BackendProvider, Capability, DeviceDescriptor, DirectoryError,
    DirectoryResult, NullBackendProvider, StaticBackendProvider,
};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qkdt_backend::prelude::*;
    //! ```

    pub use crate::credentials::{Credential, CredentialResolver};
    pub use crate::locator::BackendLocator;
    pub use crate::provider::{
        BackendProvider, Capability, DeviceDescriptor, DirectoryError, NullBackendProvider,
        StaticBackendProvider,
    };
}

// ============================================================================
// Integration Tests
// ============================================================================
