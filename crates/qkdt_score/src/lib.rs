//! # QKDT Score
//!
//! Weighted suitability rubric and rating bands.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qkdt_score // L5: Score (완료)
//!     Rubric // 4개 항목 버킷 (완료)
//!     ScoreBreakdown // 항목별 점수 (완료)
//!     rating_for // A/B/C/D 밴드 (완료)
//! ```
//!
//! | Dimension | Buckets |
//! |---|---|
//! | fidelity | >0.95 → 30, >0.90 → 20, >0.85 → 10, else 0 |
//! | detection efficiency | >0.90 → 25, >0.80 → 20, >0.70 → 15, else 10 |
//! | QBER | <0.05 → 25, <0.10 → 20, <0.15 → 15, else 5 |
//! | secure key rate | >1000 → 20, >500 → 15, >100 → 10, else 5 |
//!
//! ## Quick Start
//!
//! ```rust
//! use qkdt_core::Rating;
//! use qkdt_score::score;
//!
//! let analysis = score(0.999, 0.82, 1.9e-6, 2.4e7);
//! assert_eq!(analysis.suitability_score, 95);
//! assert_eq!(analysis.rating, Rating::A);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Rubric (Gantree: L5_Score → Rubric)
pub mod rubric;

// ============================================================================
// Re-exports
// ============================================================================

pub use rubric::{rating_for, score, ScoreBreakdown};

// ============================================================================
// Integration Tests
// ============================================================================
