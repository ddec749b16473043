//! QKD Device Testbed Analysis
//!
//! Analyzes a device with the IBM Quantum directory when a credential is
//! available and falls back to simulation otherwise.
//!
//! ```bash
//! export IBM_QUANTUM_API_KEY="your-api-token"   # optional
//! export QKDT_PHOTON_RATE=150 QKDT_DISTANCE_KM=25
//! RUST_LOG=info cargo run --example testbed_analysis -- history.json
//! ```

use qkdt_engine::prelude::*;
use qkdt_ibm::RealBackendProvider;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = TestbedConfig::from_env()?;
    config.validate()?;

    println!("╔══════════════════════════════════════════════════════════════════════╗");
    println!("║                  QKD Device Testbed Analysis                         ║");
    println!("╚══════════════════════════════════════════════════════════════════════╝\n");
    println!("Configuration: {}\n", config);

    let history_path = std::env::args().nth(1);
    let testbed = Testbed::new(config.clone(), Arc::new(RealBackendProvider::new()));

    let result = match history_path {
        Some(ref path) => {
            let store = JsonFileReportStore::new(path).with_capacity(config.history_capacity);
            testbed.analyze_and_record(config.photon_rate, None, &store)
        }
        None => testbed.analyze(config.photon_rate, None),
    };

    let report = match result {
        Ok(report) => report,
        Err(err) => {
            let response = ErrorResponse::analysis_failed(&err);
            println!("{}", serde_json::to_string_pretty(&response)?);
            return Err(err.into());
        }
    };

    println!("Run log:");
    for entry in &report.logs {
        println!("  {} [{:?}] {}", entry.timestamp, entry.level, entry.message);
    }

    println!("\nSummary:\n  {}\n", Reporter::to_text(&report));
    println!("Rating {}: {}", report.analysis.rating, report.analysis.recommendation);

    if let Some(path) = history_path {
        let store = JsonFileReportStore::new(path);
        println!("\n{}", Reporter::to_markdown(&store.recent(config.history_capacity)?));
    }

    Ok(())
}
