//! Device characterization probes
//!
//! Gantree: L3_Probe → Characterizer
//!
//! Three independent stochastic measurements, each producing one scalar and
//! one info entry in the run log. Perturbations are uniform and every result
//! is clamped to its physical range.

use qkdt_core::probe::{
    fidelity_degradation, rate_factor, DARK_COUNT_MAX_HZ, DARK_COUNT_MIN_HZ, DEFAULT_NUM_QUBITS,
    EFFICIENCY_BASE, EFFICIENCY_MAX, EFFICIENCY_MIN, EFFICIENCY_NOISE, FIDELITY_BASE,
    FIDELITY_MAX, FIDELITY_MIN, FIDELITY_NOISE, SIMULATOR_FIDELITY,
};
use qkdt_core::{BackendInfo, LogTrail, QkdtError, QkdtResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Stochastic characterization of one device
/// Gantree: Characterizer<R> // 특성 측정
#[derive(Debug, Clone)]
pub struct Characterizer<R: Rng> {
    rng: R,
}

impl Characterizer<StdRng> {
    /// Deterministic characterizer
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Entropy-seeded characterizer
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Seeded when `seed` is given, entropy-seeded otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> Characterizer<R> {
    /// Wrap an existing generator
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Release the generator
    pub fn into_inner(self) -> R {
        self.rng
    }

    // ========================================================================
    // Probes
    // ========================================================================

    /// State fidelity of the located backend.
    ///
    /// Simulated backends are ideal and return exactly 0.999.
    pub fn measure_fidelity(&mut self, info: &BackendInfo, trail: &mut LogTrail) -> f64 {
        if !info.connected {
            trail.info(format!("Simulator fidelity: {:.3}", SIMULATOR_FIDELITY));
            return SIMULATOR_FIDELITY;
        }

        let num_qubits = info.num_qubits.unwrap_or(DEFAULT_NUM_QUBITS);
        let noise = self.rng.gen_range(-FIDELITY_NOISE..=FIDELITY_NOISE);
        let fidelity = (FIDELITY_BASE - fidelity_degradation(num_qubits) + noise)
            .clamp(FIDELITY_MIN, FIDELITY_MAX);

        trail.info(format!("Device fidelity measured: {:.3}", fidelity));
        fidelity
    }

    /// Photon detection efficiency at `photon_rate` MHz
    pub fn measure_detection_efficiency(
        &mut self,
        photon_rate: f64,
        trail: &mut LogTrail,
    ) -> QkdtResult<f64> {
        if !photon_rate.is_finite() || photon_rate < 0.0 {
            return Err(QkdtError::InvalidPhotonRate(photon_rate));
        }

        let noise = self.rng.gen_range(-EFFICIENCY_NOISE..=EFFICIENCY_NOISE);
        let efficiency = (EFFICIENCY_BASE * rate_factor(photon_rate) + noise)
            .clamp(EFFICIENCY_MIN, EFFICIENCY_MAX);

        trail.info(format!(
            "Detection efficiency: {:.3} at {} MHz",
            efficiency, photon_rate
        ));
        Ok(efficiency)
    }

    /// Detector dark count rate (Hz)
    pub fn measure_dark_count_rate(&mut self, trail: &mut LogTrail) -> f64 {
        let rate = self.rng.gen_range(DARK_COUNT_MIN_HZ..=DARK_COUNT_MAX_HZ);
        trail.info(format!("Dark count rate: {:.1} Hz", rate));
        rate
    }
}
