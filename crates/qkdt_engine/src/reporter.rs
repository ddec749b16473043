//! Report export
//!
//! Gantree: L6_Engine → Reporter
//!
//! Renders reports as JSON, a one-line text summary or a Markdown history
//! table.

use qkdt_core::{QkdtResult, Report};
use std::fmt::{self, Write};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Pretty JSON array
    Json,
    /// One summary line per report
    Text,
    /// Markdown table
    Markdown,
}

/// Report renderer
/// Gantree: Reporter // 결과 출력
pub struct Reporter;

impl Reporter {
    // ========================================================================
    // Single Report
    // ========================================================================

    /// Pretty JSON of one report
    pub fn to_json(report: &Report) -> QkdtResult<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// One-line summary
    pub fn to_text(report: &Report) -> String {
        format!(
            "[{}] {} | rating {} ({}/100) | key rate {:.0} bps | QBER {:.3e} | {}",
            format_timestamp(report.timestamp),
            report.device_info.backend_name,
            report.analysis.rating,
            report.analysis.suitability_score,
            report.metrics.secure_key_rate,
            report.metrics.qber,
            if report.is_secure { "secure" } else { "insecure" }
        )
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Render a history in `format`
    pub fn render(reports: &[Report], format: ReportFormat) -> QkdtResult<String> {
        match format {
            ReportFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
            ReportFormat::Text => Ok(reports
                .iter()
                .map(Self::to_text)
                .collect::<Vec<_>>()
                .join("\n")),
            ReportFormat::Markdown => Ok(Self::to_markdown(reports)),
        }
    }

    /// Markdown history table
    pub fn to_markdown(reports: &[Report]) -> String {
        let mut output = String::new();
        // Writing into a String does not fail
        let _ = write_markdown(&mut output, reports);
        output
    }
}

fn write_markdown(out: &mut String, reports: &[Report]) -> fmt::Result {
    writeln!(out, "# QKD Device Testbed History\n")?;

    if reports.is_empty() {
        writeln!(out, "_No analyses recorded._")?;
        return Ok(());
    }

    let secure = reports.iter().filter(|r| r.is_secure).count();
    writeln!(out, "- **Analyses**: {}", reports.len())?;
    writeln!(out, "- **Secure links**: {}/{}\n", secure, reports.len())?;

    writeln!(
        out,
        "| Time | Backend | Photon Rate (MHz) | Fidelity | Efficiency | QBER | Key Rate (bps) | Score | Rating |"
    )?;
    writeln!(
        out,
        "|------|---------|-------------------|----------|------------|------|----------------|-------|--------|"
    )?;

    for r in reports {
        writeln!(
            out,
            "| {} | {}{} | {} | {:.3} | {:.3} | {:.2e} | {:.0} | {} | {} |",
            format_timestamp(r.timestamp),
            r.device_info.backend_name,
            if r.device_info.connected { "" } else { " (sim)" },
            r.metrics.photon_rate,
            r.metrics.fidelity,
            r.metrics.detection_efficiency,
            r.metrics.qber,
            r.metrics.secure_key_rate,
            r.analysis.suitability_score,
            r.analysis.rating
        )?;
    }

    Ok(())
}

/// Unix seconds as `YYYY-MM-DD HH:MM:SS` UTC
pub fn format_timestamp(unix_seconds: f64) -> String {
    chrono::DateTime::<chrono::Utc>::from_timestamp(unix_seconds.floor() as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| format!("{:.0}", unix_seconds))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qkdt_core::{Analysis, BackendInfo, Metrics, Rating};

    fn report(connected: bool, qber: f64) -> Report {
        let info = if connected {
            BackendInfo::connected("ibm_test", 5, vec!["cx".into()], None, None)
        } else {
            BackendInfo::fallback("qiskit_aer_simulator", "offline")
        };
        let mut report = Report::success(
            info,
            Metrics {
                fidelity: 0.93,
                detection_efficiency: 0.82,
                dark_count_rate: 300.0,
                secure_key_rate: 24133137.0,
                qber,
                photon_rate: 100.0,
            },
            Analysis::new(85, Rating::A),
            Vec::new(),
        );
        report.timestamp = 0.0;
        report
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0.0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(86_400.9), "1970-01-02 00:00:00");
    }

    #[test]
    fn test_to_json_keys() {
        let json = Reporter::to_json(&report(true, 1e-6)).unwrap();
        for key in [
            "\"status\"",
            "\"timestamp\"",
            "\"device_info\"",
            "\"metrics\"",
            "\"analysis\"",
            "\"logs\"",
            "\"is_secure\"",
            "\"backend\"",
        ] {
            assert!(json.contains(key), "missing {}", key);
        }
    }

    #[test]
    fn test_to_text() {
        let text = Reporter::to_text(&report(false, 0.2));
        assert!(text.starts_with("[1970-01-01 00:00:00] qiskit_aer_simulator"));
        assert!(text.contains("rating A (85/100)"));
        assert!(text.contains("key rate 24133137 bps"));
        assert!(text.ends_with("insecure"));
    }

    #[test]
    fn test_to_markdown() {
        let md = Reporter::to_markdown(&[report(true, 1e-6), report(false, 0.2)]);

        assert!(md.contains("# QKD Device Testbed History"));
        assert!(md.contains("- **Secure links**: 1/2"));
        assert!(md.contains("| ibm_test |"));
        assert!(md.contains("| qiskit_aer_simulator (sim) |"));
    }

    #[test]
    fn test_empty_history() {
        let md = Reporter::to_markdown(&[]);
        assert!(md.contains("No analyses recorded"));
        assert_eq!(Reporter::render(&[], ReportFormat::Json).unwrap(), "[]");
        assert_eq!(Reporter::render(&[], ReportFormat::Text).unwrap(), "");
    }

    #[test]
    fn test_render_text_lines() {
        let reports = vec![report(true, 1e-6), report(true, 1e-6)];
        let text = Reporter::render(&reports, ReportFormat::Text).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
