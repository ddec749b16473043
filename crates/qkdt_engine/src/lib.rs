//! # QKDT Engine
//!
//! Device analysis orchestration for the QKD device testbed: locate a
//! backend, characterize it, estimate its secure key rate and rate its
//! suitability for QKD.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qkdt_engine // L6: Integration (완료)
//!     TestbedConfig // 통합 설정 (완료)
//!         photon_rate, distance_km, seed
//!         from_env(), load(), save()
//!     Testbed // 분석 오케스트레이터 (완료)
//!         locate → fidelity → efficiency → dark count → key rate → score
//!         analyze(), analyze_with_distance(), analyze_and_record()
//!     History // 결과 저장소 (완료)
//!         InMemoryReportStore, JsonFileReportStore
//!     Reporter // JSON / 텍스트 / Markdown (완료)
//!     Response // ErrorResponse, HistoryResponse, health() (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qkdt_engine::prelude::*;
//!
//! // No backend directory installed: the run degrades to simulation
//! let testbed = Testbed::offline(TestbedConfig::benchmark());
//! let report = testbed.analyze(100.0, None).unwrap();
//!
//! assert_eq!(report.device_info.backend_name, "simulation");
//! assert!(report.is_secure);
//! println!("{}", Reporter::to_text(&report));
//! ```
//!
//! ## Recording History
//!
//! ```rust
//! use qkdt_engine::prelude::*;
//!
//! let testbed = Testbed::offline(TestbedConfig::benchmark());
//! let store = InMemoryReportStore::default();
//!
//! testbed.analyze_and_record(100.0, None, &store).unwrap();
//! testbed.analyze_and_record(250.0, None, &store).unwrap();
//!
//! let recent = store.recent(10).unwrap();
//! assert_eq!(recent[0].metrics.photon_rate, 250.0);
//! ```
//!
//! ## Real Hardware
//!
//! ```rust,ignore
//! use qkdt_engine::prelude::*;
//! use qkdt_ibm::RealBackendProvider;
//! use std::sync::Arc;
//!
//! // Reads IBM_QUANTUM_API_KEY when no credential is passed
//! let testbed = Testbed::new(TestbedConfig::from_env()?, Arc::new(RealBackendProvider::new()));
//! let report = testbed.analyze(150.0, None)?;
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Configuration (Gantree: L6_Engine → TestbedConfig)
pub mod config;

/// Orchestrator (Gantree: L6_Engine → Testbed)
pub mod testbed;

/// Report history (Gantree: L6_Engine → History)
pub mod history;

/// Report export (Gantree: L6_Engine → Reporter)
pub mod reporter;

/// Wire responses (Gantree: L6_Engine → Response)
pub mod response;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{TestbedConfig, DEFAULT_HISTORY_CAPACITY, DEFAULT_PHOTON_RATE_MHZ};
pub use history::{InMemoryReportStore, JsonFileReportStore, ReportStore, StoreError};
pub use reporter::{format_timestamp, ReportFormat, Reporter};
pub use response::{health, ErrorResponse, HealthInfo, HistoryResponse};
pub use testbed::Testbed;

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qkdt_engine::prelude::*;
    //! ```

    pub use crate::config::TestbedConfig;
    pub use crate::history::{InMemoryReportStore, JsonFileReportStore, ReportStore};
    pub use crate::reporter::{ReportFormat, Reporter};
    pub use crate::response::{health, ErrorResponse, HistoryResponse};
    pub use crate::testbed::Testbed;
    pub use qkdt_core::{QkdtError, QkdtResult, Rating, Report};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use qkdt_backend::{BackendLocator, CredentialResolver, StaticBackendProvider};
    use qkdt_core::{security, LogLevel};
    use std::sync::Arc;

    fn lab_testbed() -> Testbed {
        let locator = BackendLocator::new(Arc::new(StaticBackendProvider::single("fake_lagos")))
            .with_resolver(CredentialResolver::explicit_only());
        Testbed::with_locator(TestbedConfig::benchmark(), locator)
    }

    #[test]
    fn test_report_invariants_across_rates() {
        let offline = Testbed::offline(TestbedConfig::lab().with_seed(3));
        let connected = lab_testbed();

        for rate in [0.0, 1.0, 50.0, 100.0, 150.0, 1000.0, 1e5] {
            for report in [
                offline.analyze(rate, None).unwrap(),
                connected.analyze(rate, Some("token")).unwrap(),
            ] {
                let m = report.metrics;
                assert!((0.0..=0.25).contains(&m.qber));
                assert!(m.secure_key_rate >= 0.0);
                assert!((0.60..=0.95).contains(&m.detection_efficiency));
                assert!((50.0..=500.0).contains(&m.dark_count_rate));
                assert!((0.80..=0.999).contains(&m.fidelity));
                assert!(report.analysis.suitability_score <= 100);
                assert_eq!(report.is_secure, security::is_secure(m.qber));
                assert!(!report.logs.is_empty());
            }
        }
    }

    #[test]
    fn test_log_trail_shape() {
        let report = lab_testbed().analyze(100.0, Some("token")).unwrap();

        for entry in &report.logs {
            let ts = entry.timestamp.as_bytes();
            assert_eq!(ts.len(), 8);
            assert_eq!((ts[2], ts[5]), (b':', b':'));
        }

        let first = report.logs.first().unwrap();
        let last = report.logs.last().unwrap();
        assert_eq!(first.level, LogLevel::Info);
        assert_eq!(first.message, "Starting quantum device testbed analysis");
        assert_eq!(last.level, LogLevel::Success);
        assert!(last.message.starts_with("Device analysis complete"));
    }

    #[test]
    fn test_terminal_failure_renders_error_response() {
        let err = lab_testbed().analyze(f64::INFINITY, None).unwrap_err();
        let resp = ErrorResponse::analysis_failed(&err);
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["status"], "error");
        assert!(json.get("metrics").is_none());
    }

    #[test]
    fn test_file_history_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileReportStore::new(dir.path().join("history.json")).with_capacity(10);
        let testbed = lab_testbed();

        for rate in [100.0, 120.0, 140.0] {
            testbed.analyze_and_record(rate, Some("token"), &store).unwrap();
        }

        let history = HistoryResponse::new(store.recent(10).unwrap());
        assert_eq!(history.results.len(), 3);
        assert_eq!(history.results[0].metrics.photon_rate, 140.0);

        let md = Reporter::render(&history.results, ReportFormat::Markdown).unwrap();
        assert_eq!(md.matches("| fake_lagos |").count(), 3);
    }

    #[test]
    fn test_health_version() {
        assert_eq!(health().version, crate::VERSION);
    }
}
