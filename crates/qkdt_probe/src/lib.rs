//! # QKDT Probe
//!
//! Stochastic characterization probes: state fidelity, photon detection
//! efficiency and detector dark count rate.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qkdt_probe // L3: Probe (완료)
//!     Characterizer // 주입된 RNG 기반 측정 (완료)
//!         measure_fidelity // 0.95 - 열화 ± 0.02 (완료)
//!         measure_detection_efficiency // 0.85 × rate_factor ± 0.05 (완료)
//!         measure_dark_count_rate // U(50, 500) Hz (완료)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qkdt_core::{BackendInfo, LogTrail};
//! use qkdt_probe::Characterizer;
//!
//! let mut probe = Characterizer::seeded(42);
//! let mut trail = LogTrail::new();
//!
//! let sim = BackendInfo::fallback("qiskit_aer_simulator", "offline");
//! assert_eq!(probe.measure_fidelity(&sim, &mut trail), 0.999);
//!
//! let eta = probe.measure_detection_efficiency(100.0, &mut trail).unwrap();
//! assert!((0.60..=0.95).contains(&eta));
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Probes (Gantree: L3_Probe → Characterizer)
pub mod characterizer;

// ============================================================================
// Re-exports
// ============================================================================

pub use characterizer::Characterizer;

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use qkdt_core::{BackendInfo, LogTrail};

    #[test]
    fn test_full_probe_sequence() {
        let mut probe = Characterizer::seeded(2024);
        let mut trail = LogTrail::new();
        let info = BackendInfo::connected("fake_lagos", 7, vec!["cx".into()], None, Some(32));

        let fidelity = probe.measure_fidelity(&info, &mut trail);
        let eta = probe.measure_detection_efficiency(250.0, &mut trail).unwrap();
        let dark = probe.measure_dark_count_rate(&mut trail);

        assert!((0.80..=0.99).contains(&fidelity));
        assert!((0.60..=0.95).contains(&eta));
        assert!((50.0..=500.0).contains(&dark));
        assert!(trail.entries()[0].message.starts_with("Device fidelity measured"));
    }

    #[test]
    fn test_entropy_seeded_in_range() {
        let mut probe = Characterizer::from_entropy();
        let mut trail = LogTrail::new();

        for _ in 0..50 {
            assert!((50.0..=500.0).contains(&probe.measure_dark_count_rate(&mut trail)));
        }
    }
}
