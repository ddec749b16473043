//! Device analysis orchestrator
//!
//! Gantree: L6_Engine → Testbed
//!
//! One analysis run: locate → fidelity → detection efficiency → dark count →
//! key rate → score → report. Every run owns a fresh log trail and RNG; the
//! testbed itself keeps no state between runs.

use crate::config::TestbedConfig;
use crate::history::ReportStore;
use qkdt_backend::{BackendLocator, BackendProvider, CredentialResolver, NullBackendProvider};
use qkdt_core::{LogTrail, Metrics, QkdtResult, Report};
use qkdt_keyrate::KeyRateCalculator;
use qkdt_probe::Characterizer;
use rand::Rng;
use std::sync::Arc;

/// QKD device testbed
/// Gantree: Testbed // 분석 오케스트레이터
#[derive(Debug, Clone)]
pub struct Testbed {
    config: TestbedConfig,
    locator: BackendLocator,
}

impl Testbed {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Testbed over `provider`, with credential lookup and fallback
    /// simulator taken from `config`
    pub fn new(config: TestbedConfig, provider: Arc<dyn BackendProvider>) -> Self {
        let resolver =
            CredentialResolver::new().with_env_vars(config.credential_env_vars.iter().cloned());
        let locator = BackendLocator::new(provider)
            .with_resolver(resolver)
            .with_simulator_name(config.simulator_name.clone());
        Self { config, locator }
    }

    /// Testbed over a prepared locator
    pub fn with_locator(config: TestbedConfig, locator: BackendLocator) -> Self {
        Self { config, locator }
    }

    /// Testbed with no backend directory; every run is simulated
    pub fn offline(config: TestbedConfig) -> Self {
        Self::new(config, Arc::new(NullBackendProvider::new()))
    }

    /// Configuration
    pub fn config(&self) -> &TestbedConfig {
        &self.config
    }

    /// Locator
    pub fn locator(&self) -> &BackendLocator {
        &self.locator
    }

    // ========================================================================
    // Analysis
    // ========================================================================

    /// Analyze over the configured fiber distance
    pub fn analyze(&self, photon_rate: f64, credential: Option<&str>) -> QkdtResult<Report> {
        self.analyze_with_distance(photon_rate, credential, self.config.distance_km)
    }

    /// Analyze over an explicit fiber distance (km)
    pub fn analyze_with_distance(
        &self,
        photon_rate: f64,
        credential: Option<&str>,
        distance_km: f64,
    ) -> QkdtResult<Report> {
        let probe = Characterizer::from_seed_option(self.config.seed);
        self.analyze_with_probe(photon_rate, credential, distance_km, probe)
    }

    /// Analyze with a caller-supplied characterizer
    pub fn analyze_with_probe<R: Rng>(
        &self,
        photon_rate: f64,
        credential: Option<&str>,
        distance_km: f64,
        mut probe: Characterizer<R>,
    ) -> QkdtResult<Report> {
        let mut trail = LogTrail::new();
        trail.info("Starting quantum device testbed analysis");

        let device_info = self.locator.locate(credential, &mut trail);

        let fidelity = probe.measure_fidelity(&device_info, &mut trail);
        let detection_efficiency = probe.measure_detection_efficiency(photon_rate, &mut trail)?;
        let dark_count_rate = probe.measure_dark_count_rate(&mut trail);

        let estimate = KeyRateCalculator::with_distance(distance_km)?.compute(
            photon_rate,
            detection_efficiency,
            dark_count_rate,
            &mut trail,
        )?;

        let analysis = qkdt_score::score(
            fidelity,
            detection_efficiency,
            estimate.qber,
            estimate.secure_key_rate,
        );

        trail.success(format!("Device analysis complete. Rating: {}", analysis.rating));

        let metrics = Metrics {
            fidelity,
            detection_efficiency,
            dark_count_rate,
            secure_key_rate: estimate.secure_key_rate,
            qber: estimate.qber,
            photon_rate,
        };

        let report = Report::success(device_info, metrics, analysis, trail.take());

        if self.config.verbose {
            log::info!("TESTBED: {}", report);
        } else {
            log::debug!("TESTBED: {}", report);
        }

        Ok(report)
    }

    /// Analyze, then save the report to `store`.
    ///
    /// A failed save is logged and the report is returned unchanged.
    pub fn analyze_and_record(
        &self,
        photon_rate: f64,
        credential: Option<&str>,
        store: &dyn ReportStore,
    ) -> QkdtResult<Report> {
        let report = self.analyze(photon_rate, credential)?;

        match store.save(&report) {
            Ok(()) => log::info!("TESTBED: Testbed result saved to history"),
            Err(e) => log::warn!("TESTBED: Failed to save testbed result: {}", e),
        }

        Ok(report)
    }
}

// ============================================================================
// Tests
// ============================================================================
