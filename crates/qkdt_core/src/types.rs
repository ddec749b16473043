//! Core types for QKDT
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Device metadata, measured metrics, suitability analysis, log entries and
//! the top-level report. Field names and nesting form the wire contract.

use crate::constants::{backend, security};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

// ============================================================================
// BackendInfo
// ============================================================================

/// Static metadata of the backend an analysis ran against
/// Gantree: BackendInfo // 백엔드 메타데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendInfo {
    /// Whether a hardware device was reached
    pub connected: bool,

    /// Device or simulator name
    #[serde(rename = "backend")]
    pub backend_name: String,

    /// Number of qubits on the device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_qubits: Option<usize>,

    /// Native gate set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basis_gates: Option<Vec<String>>,

    /// Connectivity, rendered as text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupling_map: Option<String>,

    /// Quantum volume (number, or the "Not specified" sentinel)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantum_volume: Option<serde_json::Value>,

    /// Why the run fell back to a simulated backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BackendInfo {
    /// Metadata of a reached hardware device.
    ///
    /// Missing coupling map and quantum volume degrade to sentinels.
    pub fn connected(
        backend_name: impl Into<String>,
        num_qubits: impl Into<Option<usize>>,
        basis_gates: Vec<String>,
        coupling_map: Option<String>,
        quantum_volume: Option<u64>,
    ) -> Self {
        Self {
            connected: true,
            backend_name: backend_name.into(),
            num_qubits: num_qubits.into(),
            basis_gates: Some(basis_gates),
            coupling_map: Some(coupling_map.unwrap_or_else(|| backend::ALL_TO_ALL.to_string())),
            quantum_volume: Some(match quantum_volume {
                Some(qv) => serde_json::Value::from(qv),
                None => serde_json::Value::from(backend::NOT_SPECIFIED),
            }),
            error: None,
        }
    }

    /// Fallback metadata for a simulated backend
    pub fn fallback(backend_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            connected: false,
            backend_name: backend_name.into(),
            num_qubits: None,
            basis_gates: None,
            coupling_map: None,
            quantum_volume: None,
            error: Some(error.into()),
        }
    }

    /// True when the analysis ran against a simulated backend
    pub fn is_simulated(&self) -> bool {
        !self.connected
    }
}

impl fmt::Display for BackendInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.connected, self.num_qubits) {
            (true, Some(n)) => write!(f, "{} ({} qubits)", self.backend_name, n),
            (true, None) => write!(f, "{}", self.backend_name),
            (false, _) => write!(f, "{} (simulated)", self.backend_name),
        }
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// Measured and derived device metrics
/// Gantree: Metrics // 측정 지표
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// State fidelity in [0, 1]
    pub fidelity: f64,

    /// Photon detection efficiency in [0, 1]
    pub detection_efficiency: f64,

    /// Detector dark count rate (Hz)
    pub dark_count_rate: f64,

    /// Secure key rate (bits/s)
    pub secure_key_rate: f64,

    /// Quantum bit error rate in [0, 0.25]
    pub qber: f64,

    /// Source photon rate (MHz), as requested
    pub photon_rate: f64,
}

// ============================================================================
// Rating / Analysis
// ============================================================================

/// Categorical suitability rating
/// Gantree: Rating // A~D 등급
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    /// Excellent
    A,
    /// Good
    B,
    /// Marginal
    C,
    /// Not suitable
    D,
}

impl Rating {
    /// Recommendation text for this rating
    pub fn recommendation(&self) -> &'static str {
        match self {
            Rating::A => "Excellent for QKD deployment",
            Rating::B => "Good for QKD with optimization",
            Rating::C => "Marginal - requires significant optimization",
            Rating::D => "Not suitable for secure QKD",
        }
    }

    /// Rating letter
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::A => "A",
            Rating::B => "B",
            Rating::C => "C",
            Rating::D => "D",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Suitability analysis derived from metrics
/// Gantree: Analysis // 적합성 분석
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// Weighted score in [0, 100]
    pub suitability_score: u32,

    /// Rating band
    pub rating: Rating,

    /// Recommendation text
    pub recommendation: String,
}

impl Analysis {
    /// Build an analysis whose recommendation follows the rating
    pub fn new(suitability_score: u32, rating: Rating) -> Self {
        Self {
            suitability_score,
            rating,
            recommendation: rating.recommendation().to_string(),
        }
    }
}

// ============================================================================
// Logging
// ============================================================================

/// Severity of a run log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Informational
    Info,
    /// A step succeeded
    Success,
    /// Degraded but continuing
    Warning,
    /// A step failed
    Error,
}

impl LogLevel {
    /// Matching level of the `log` facade
    pub fn as_log_level(&self) -> log::Level {
        match self {
            LogLevel::Info | LogLevel::Success => log::Level::Info,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

/// One timestamped entry of a run's log trail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Wall-clock time, HH:MM:SS
    pub timestamp: String,

    /// Message
    pub message: String,

    /// Severity
    pub level: LogLevel,
}

// ============================================================================
// Report
// ============================================================================

/// Report status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Analysis completed
    Success,
    /// Analysis failed
    Error,
}

/// Full output of one analysis run
/// Gantree: Report // 최종 보고서
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Run status
    pub status: ReportStatus,

    /// Completion time (unix seconds)
    pub timestamp: f64,

    /// Backend metadata
    pub device_info: BackendInfo,

    /// Measured metrics
    pub metrics: Metrics,

    /// Suitability analysis
    pub analysis: Analysis,

    /// Run log trail, in insertion order
    pub logs: Vec<LogEntry>,

    /// QBER below the security threshold
    pub is_secure: bool,
}

impl Report {
    /// Assemble a successful report stamped with the current time
    pub fn success(
        device_info: BackendInfo,
        metrics: Metrics,
        analysis: Analysis,
        logs: Vec<LogEntry>,
    ) -> Self {
        Self {
            status: ReportStatus::Success,
            timestamp: unix_timestamp(),
            is_secure: security::is_secure(metrics.qber),
            device_info,
            metrics,
            analysis,
            logs,
        }
    }

    /// Rating shortcut
    pub fn rating(&self) -> Rating {
        self.analysis.rating
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Report({}, rating={}, score={}, qber={:.3e}, key_rate={:.0} bps, secure={})",
            self.device_info,
            self.analysis.rating,
            self.analysis.suitability_score,
            self.metrics.qber,
            self.metrics.secure_key_rate,
            self.is_secure
        )
    }
}

/// Current wall-clock time in unix seconds
pub fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metrics(qber: f64) -> Metrics {
        Metrics {
            fidelity: 0.93,
            detection_efficiency: 0.84,
            dark_count_rate: 120.0,
            secure_key_rate: 2.0e7,
            qber,
            photon_rate: 100.0,
        }
    }

    #[test]
    fn test_connected_sentinels() {
        let info = BackendInfo::connected("ibm_kyiv", 127, vec!["ecr".into()], None, None);
        assert_eq!(info.coupling_map.as_deref(), Some("All-to-all"));
        assert_eq!(
            info.quantum_volume,
            Some(serde_json::Value::from("Not specified"))
        );
        assert!(info.error.is_none());
        assert_eq!(info.to_string(), "ibm_kyiv (127 qubits)");

        let unsized_info = BackendInfo::connected("ibm_new", None, vec![], None, None);
        assert_eq!(unsized_info.num_qubits, None);
        assert_eq!(unsized_info.to_string(), "ibm_new");
    }

    #[test]
    fn test_fallback_wire_shape() {
        let info = BackendInfo::fallback("simulation", "capability unavailable");
        let json = serde_json::to_value(&info).unwrap();

        assert_eq!(json["connected"], false);
        assert_eq!(json["backend"], "simulation");
        assert_eq!(json["error"], "capability unavailable");
        assert!(json.get("num_qubits").is_none());
        assert!(json.get("backend_name").is_none());
    }

    #[test]
    fn test_rating_recommendations() {
        assert_eq!(Rating::A.recommendation(), "Excellent for QKD deployment");
        assert_eq!(Rating::D.recommendation(), "Not suitable for secure QKD");
        assert_eq!(Rating::B.to_string(), "B");
    }

    #[test]
    fn test_log_level_wire() {
        let json = serde_json::to_string(&LogLevel::Success).unwrap();
        assert_eq!(json, "\"success\"");
        assert_eq!(LogLevel::Warning.as_log_level(), log::Level::Warn);
    }

    #[test]
    fn test_report_is_secure() {
        let info = BackendInfo::fallback("simulation", "n/a");
        let secure = Report::success(
            info.clone(),
            sample_metrics(0.05),
            Analysis::new(85, Rating::A),
            vec![],
        );
        let insecure = Report::success(
            info,
            sample_metrics(0.11),
            Analysis::new(40, Rating::C),
            vec![],
        );

        assert!(secure.is_secure);
        assert!(!insecure.is_secure);
        assert!(secure.timestamp > 0.0);
    }

    #[test]
    fn test_report_wire_keys() {
        let report = Report::success(
            BackendInfo::fallback("simulation", "n/a"),
            sample_metrics(0.01),
            Analysis::new(90, Rating::A),
            vec![],
        );
        let json = serde_json::to_value(&report).unwrap();

        for key in [
            "status",
            "timestamp",
            "device_info",
            "metrics",
            "analysis",
            "logs",
            "is_secure",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(json["status"], "success");
        assert_eq!(json["analysis"]["rating"], "A");
    }
}
