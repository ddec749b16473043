//! Constants for QKDT
//!
//! Gantree: L0_Foundation → Constants
//!
//! Channel, probe, key-rate and security constants of the analytic device
//! model. These values are observable through reports; keep them exact.

// ============================================================================
// Channel Constants
// Gantree: channel // 광섬유 채널 상수
// ============================================================================

pub mod channel {
    //! Optical fiber channel model

    /// Fiber attenuation in dB per km (standard telecom fiber)
    pub const FIBER_ATTENUATION_DB_PER_KM: f64 = 0.2;

    /// Default link distance in kilometres
    pub const DEFAULT_DISTANCE_KM: f64 = 10.0;

    /// MHz to Hz
    pub const MHZ_TO_HZ: f64 = 1e6;
}

// ============================================================================
// Probe Constants
// Gantree: probe // 특성 측정 상수
// ============================================================================

pub mod probe {
    //! Base values, noise amplitudes and clamp ranges of the probes

    /// Base fidelity of a connected device
    pub const FIDELITY_BASE: f64 = 0.95;

    /// Fidelity lost per qubit on the device
    pub const FIDELITY_DEGRADATION_PER_QUBIT: f64 = 0.005;

    /// Upper bound on qubit-count degradation
    pub const FIDELITY_MAX_DEGRADATION: f64 = 0.1;

    /// Fidelity noise half-width
    pub const FIDELITY_NOISE: f64 = 0.02;

    /// Fidelity clamp range for connected devices
    pub const FIDELITY_MIN: f64 = 0.80;
    /// Fidelity clamp range for connected devices
    pub const FIDELITY_MAX: f64 = 0.99;

    /// Fidelity reported for simulated backends
    pub const SIMULATOR_FIDELITY: f64 = 0.999;

    /// Qubit count assumed when a connected device does not report one
    pub const DEFAULT_NUM_QUBITS: usize = 5;

    /// Base detector efficiency
    pub const EFFICIENCY_BASE: f64 = 0.85;

    /// Photon rate (MHz) above which detector dead time kicks in
    pub const DEAD_TIME_ONSET_MHZ: f64 = 100.0;

    /// Photon rate span (MHz) over which dead-time penalty grows
    pub const DEAD_TIME_SCALE_MHZ: f64 = 1000.0;

    /// Maximum dead-time penalty
    pub const DEAD_TIME_MAX_PENALTY: f64 = 0.1;

    /// Efficiency noise half-width
    pub const EFFICIENCY_NOISE: f64 = 0.05;

    /// Efficiency clamp range
    pub const EFFICIENCY_MIN: f64 = 0.60;
    /// Efficiency clamp range
    pub const EFFICIENCY_MAX: f64 = 0.95;

    /// Dark count rate range (Hz)
    pub const DARK_COUNT_MIN_HZ: f64 = 50.0;
    /// Dark count rate range (Hz)
    pub const DARK_COUNT_MAX_HZ: f64 = 500.0;

    /// Dead-time rate factor for a given photon rate (MHz)
    #[inline]
    pub fn rate_factor(photon_rate_mhz: f64) -> f64 {
        if photon_rate_mhz < DEAD_TIME_ONSET_MHZ {
            1.0
        } else {
            1.0 - DEAD_TIME_MAX_PENALTY
                .min((photon_rate_mhz - DEAD_TIME_ONSET_MHZ) / DEAD_TIME_SCALE_MHZ)
        }
    }

    /// Fidelity degradation for a device with `num_qubits` qubits
    #[inline]
    pub fn fidelity_degradation(num_qubits: usize) -> f64 {
        FIDELITY_MAX_DEGRADATION.min(num_qubits as f64 * FIDELITY_DEGRADATION_PER_QUBIT)
    }
}

// ============================================================================
// Key Rate Constants
// Gantree: keyrate // 키 생성률 상수
// ============================================================================

pub mod keyrate {
    //! Secure key rate model parameters

    /// QBER cap
    pub const QBER_CAP: f64 = 0.25;

    /// QBER assumed when neither signal nor noise is present
    pub const QBER_NO_SIGNAL: f64 = 0.5;

    /// Probability that sender and receiver bases match
    pub const BASIS_MATCH_PROBABILITY: f64 = 0.5;

    /// Error correction leakage per unit QBER
    pub const EC_OVERHEAD_FACTOR: f64 = 1.2;

    /// Fixed privacy amplification overhead
    pub const PA_OVERHEAD: f64 = 0.1;
}

// ============================================================================
// Security Constants
// Gantree: security // 보안 임계값
// ============================================================================

pub mod security {
    //! Security thresholds

    /// A link is secure when QBER is strictly below this value
    pub const QBER_SECURITY_THRESHOLD: f64 = 0.11;

    /// Security verdict for a QBER value
    #[inline]
    pub fn is_secure(qber: f64) -> bool {
        qber < QBER_SECURITY_THRESHOLD
    }
}

// ============================================================================
// Backend Constants
// Gantree: backend // 백엔드 이름/센티넬
// ============================================================================

pub mod backend {
    //! Backend names and metadata sentinels

    /// Backend name when no directory capability exists
    pub const SIMULATION_BACKEND: &str = "simulation";

    /// Default fallback simulator name
    pub const DEFAULT_SIMULATOR: &str = "qiskit_aer_simulator";

    /// Coupling map sentinel for devices without one
    pub const ALL_TO_ALL: &str = "All-to-all";

    /// Quantum volume sentinel for devices without one
    pub const NOT_SPECIFIED: &str = "Not specified";

    /// Environment variables searched for a credential, in priority order
    pub const CREDENTIAL_ENV_VARS: &[&str] = &[
        "IBM_QUANTUM_API_KEY",
        "IBM_QUANTUM_TOKEN",
        "IBMQ_TOKEN",
        "QISKIT_IBM_TOKEN",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rate_factor() {
        assert_eq!(probe::rate_factor(99.9), 1.0);
        assert_relative_eq!(probe::rate_factor(100.0), 1.0);
        assert_relative_eq!(probe::rate_factor(150.0), 0.95, epsilon = 1e-12);
        assert_relative_eq!(probe::rate_factor(5000.0), 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_fidelity_degradation_capped() {
        assert_relative_eq!(probe::fidelity_degradation(5), 0.025, epsilon = 1e-12);
        assert_relative_eq!(probe::fidelity_degradation(127), 0.1);
    }

    #[test]
    fn test_security_threshold() {
        assert!(security::is_secure(0.109));
        assert!(!security::is_secure(0.11));
    }
}
