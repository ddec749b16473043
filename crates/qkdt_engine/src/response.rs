//! Wire responses around reports
//!
//! Gantree: L6_Engine → Response
//!
//! Shapes a request layer returns alongside [`Report`]: terminal failures,
//! history listings and the health probe.

use qkdt_core::{QkdtError, Report, ReportStatus};
use serde::{Deserialize, Serialize};

/// Message returned when an analysis run fails
pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Testbed analysis failed. Please check your API key and try again.";

/// Message returned when history cannot be read
pub const HISTORY_FAILED_MESSAGE: &str = "Failed to retrieve experiment history";

/// Terminal failure; no partial report is ever attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `error`
    pub status: ReportStatus,
    /// Error detail
    pub error: String,
    /// User-facing message
    pub message: String,
}

impl ErrorResponse {
    /// Response with a custom message
    pub fn new(error: impl ToString, message: impl Into<String>) -> Self {
        Self {
            status: ReportStatus::Error,
            error: error.to_string(),
            message: message.into(),
        }
    }

    /// Failed analysis run
    pub fn analysis_failed(err: &QkdtError) -> Self {
        Self::new(err, ANALYSIS_FAILED_MESSAGE)
    }

    /// Failed history read
    pub fn history_failed(err: impl ToString) -> Self {
        Self::new(err, HISTORY_FAILED_MESSAGE)
    }
}

/// History listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Always `success`
    pub status: ReportStatus,
    /// Reports, newest first
    pub results: Vec<Report>,
}

impl HistoryResponse {
    /// Wrap a listing
    pub fn new(results: Vec<Report>) -> Self {
        Self {
            status: ReportStatus::Success,
            results,
        }
    }
}

/// Health probe payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthInfo {
    /// Always `healthy`
    pub status: String,
    /// Service description
    pub message: String,
    /// Crate version
    pub version: String,
}

/// Health probe
pub fn health() -> HealthInfo {
    HealthInfo {
        status: "healthy".to_string(),
        message: "QKD Device Testbed is running".to_string(),
        version: crate::VERSION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_response_shape() {
        let resp = ErrorResponse::analysis_failed(&QkdtError::InvalidPhotonRate(-1.0));
        let value = serde_json::to_value(&resp).unwrap();

        assert_eq!(value["status"], json!("error"));
        assert_eq!(value["message"], json!(ANALYSIS_FAILED_MESSAGE));
        assert!(value["error"].as_str().unwrap().contains("photon rate"));
        assert_eq!(value.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_history_failed() {
        let resp = ErrorResponse::history_failed("disk gone");
        assert_eq!(resp.error, "disk gone");
        assert_eq!(resp.message, "Failed to retrieve experiment history");
    }

    #[test]
    fn test_history_response() {
        let value = serde_json::to_value(HistoryResponse::new(Vec::new())).unwrap();
        assert_eq!(value, json!({"status": "success", "results": []}));
    }

    #[test]
    fn test_health() {
        let info = health();
        assert_eq!(info.status, "healthy");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }
}
