//! # QKDT Key Rate
//!
//! Fiber loss model and closed-form secure key rate calculator.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qkdt_keyrate // L4: KeyRate (완료)
//!     Entropy // 이진 엔트로피 h(q) (완료)
//!     FiberChannel // 0.2 dB/km 손실 (완료)
//!     KeyRateCalculator // QBER, EC/PA 오버헤드 (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qkdt_core::LogTrail;
//! use qkdt_keyrate::compute;
//!
//! let mut trail = LogTrail::new();
//! let est = compute(100.0, 0.85, 100.0, 10.0, &mut trail).unwrap();
//!
//! assert!(est.qber < 1e-5);
//! assert!(est.is_secure());
//! let (secure_key_rate, qber) = est.as_pair();
//! assert!(secure_key_rate > 0.0 && qber <= 0.25);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Binary entropy (Gantree: L4_KeyRate → Entropy)
pub mod entropy;

/// Channel model (Gantree: L4_KeyRate → FiberChannel)
pub mod channel;

/// Calculator (Gantree: L4_KeyRate → Calculator)
pub mod calculator;

// ============================================================================
// Re-exports
// ============================================================================

pub use calculator::{compute, KeyRateCalculator, KeyRateEstimate};
pub use channel::FiberChannel;
pub use entropy::binary_entropy;

// ============================================================================
// Integration Tests
// ============================================================================
