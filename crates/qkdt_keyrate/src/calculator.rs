//! Secure key rate calculator
//!
//! Gantree: L4_KeyRate → Calculator
//!
//! Closed-form BB84 estimate: sifted detections through a lossy fiber,
//! minus error-correction leakage and a fixed privacy-amplification cost.

use crate::channel::FiberChannel;
use crate::entropy::binary_entropy;
use qkdt_core::channel::MHZ_TO_HZ;
use qkdt_core::keyrate::{
    BASIS_MATCH_PROBABILITY, EC_OVERHEAD_FACTOR, PA_OVERHEAD, QBER_CAP, QBER_NO_SIGNAL,
};
use qkdt_core::{security, LogTrail, QkdtError, QkdtResult};
use serde::{Deserialize, Serialize};

/// Intermediate and final quantities of one key rate estimate
/// Gantree: KeyRateEstimate // 키 생성률 결과
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyRateEstimate {
    /// Detections at the source side (Hz)
    pub detection_rate: f64,

    /// Channel transmission
    pub transmission: f64,

    /// Detections after the channel (Hz)
    pub effective_detection_rate: f64,

    /// Capped quantum bit error rate
    pub qber: f64,

    /// Sifted rate after entropy correction (bits/s)
    pub raw_key_rate: f64,

    /// Final secure key rate (bits/s), never negative
    pub secure_key_rate: f64,
}

impl KeyRateEstimate {
    /// (secure_key_rate, qber)
    pub fn as_pair(&self) -> (f64, f64) {
        (self.secure_key_rate, self.qber)
    }

    /// QBER below the security threshold
    pub fn is_secure(&self) -> bool {
        security::is_secure(self.qber)
    }
}

/// Key rate calculator over a fixed channel
/// Gantree: KeyRateCalculator // 키 생성률 계산기
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct KeyRateCalculator {
    channel: FiberChannel,
}

impl KeyRateCalculator {
    /// Calculator over `channel`
    pub fn new(channel: FiberChannel) -> Self {
        Self { channel }
    }

    /// Calculator over a fiber of `distance_km`
    pub fn with_distance(distance_km: f64) -> QkdtResult<Self> {
        Ok(Self::new(FiberChannel::new(distance_km)?))
    }

    /// Channel
    pub fn channel(&self) -> &FiberChannel {
        &self.channel
    }

    /// Estimate the secure key rate.
    ///
    /// `photon_rate` is in MHz, `dark_count_rate` in Hz.
    pub fn compute(
        &self,
        photon_rate: f64,
        detection_efficiency: f64,
        dark_count_rate: f64,
        trail: &mut LogTrail,
    ) -> QkdtResult<KeyRateEstimate> {
        validate_inputs(photon_rate, detection_efficiency, dark_count_rate)?;

        let detection_rate = photon_rate * detection_efficiency * MHZ_TO_HZ;
        let transmission = self.channel.transmission();
        let effective_detection_rate = detection_rate * transmission;

        let denominator = effective_detection_rate + dark_count_rate;
        let qber_raw = if denominator > 0.0 {
            dark_count_rate / denominator
        } else {
            QBER_NO_SIGNAL
        };
        let qber = qber_raw.min(QBER_CAP);

        let raw_key_rate =
            effective_detection_rate * BASIS_MATCH_PROBABILITY * (1.0 - binary_entropy(qber));

        let ec_overhead = EC_OVERHEAD_FACTOR * qber;
        let secure_key_rate = (raw_key_rate * (1.0 - ec_overhead - PA_OVERHEAD)).max(0.0);

        if !secure_key_rate.is_finite() {
            return Err(QkdtError::NonFinite {
                quantity: "secure key rate".to_string(),
                value: secure_key_rate,
            });
        }

        trail.info(format!(
            "Secure key rate: {:.0} bps (QBER: {:.3})",
            secure_key_rate, qber
        ));

        Ok(KeyRateEstimate {
            detection_rate,
            transmission,
            effective_detection_rate,
            qber,
            raw_key_rate,
            secure_key_rate,
        })
    }
}

fn validate_inputs(photon_rate: f64, efficiency: f64, dark_count_rate: f64) -> QkdtResult<()> {
    if !photon_rate.is_finite() || photon_rate < 0.0 {
        return Err(QkdtError::InvalidPhotonRate(photon_rate));
    }
    if !(0.0..=1.0).contains(&efficiency) {
        return Err(QkdtError::InvalidEfficiency(efficiency));
    }
    if !dark_count_rate.is_finite() || dark_count_rate < 0.0 {
        return Err(QkdtError::InvalidDarkCountRate(dark_count_rate));
    }
    Ok(())
}

/// One-shot estimate over a fiber of `distance_km`
pub fn compute(
    photon_rate: f64,
    detection_efficiency: f64,
    dark_count_rate: f64,
    distance_km: f64,
    trail: &mut LogTrail,
) -> QkdtResult<KeyRateEstimate> {
    KeyRateCalculator::with_distance(distance_km)?.compute(
        photon_rate,
        detection_efficiency,
        dark_count_rate,
        trail,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qkdt_core::LogLevel;

    #[test]
    fn test_reference_scenario() {
        let mut trail = LogTrail::new();
        let est = compute(100.0, 0.85, 100.0, 10.0, &mut trail).unwrap();

        assert_relative_eq!(est.detection_rate, 8.5e7, max_relative = 1e-12);
        assert_relative_eq!(est.effective_detection_rate, 5.363e7, max_relative = 1e-3);
        assert_relative_eq!(est.qber, 1.8646e-6, max_relative = 1e-3);

        let h = binary_entropy(est.qber);
        let expected = est.effective_detection_rate * 0.5 * (1.0 - h) * (1.0 - 1.2 * est.qber - 0.1);
        assert_relative_eq!(est.secure_key_rate, expected, max_relative = 1e-12);
        assert!(est.secure_key_rate > 2.4e7 && est.secure_key_rate < 2.42e7);
        assert!(est.is_secure());

        assert_eq!(trail.len(), 1);
        assert_eq!(trail.entries()[0].level, LogLevel::Info);
        assert_eq!(
            trail.entries()[0].message,
            format!("Secure key rate: {:.0} bps (QBER: 0.000)", est.secure_key_rate)
        );
    }

    #[test]
    fn test_no_signal_no_noise() {
        let mut trail = LogTrail::new();
        let est = compute(0.0, 0.85, 0.0, 10.0, &mut trail).unwrap();

        // 0.5 before the cap
        assert_eq!(est.qber, 0.25);
        assert_eq!(est.secure_key_rate, 0.0);
        assert!(!est.is_secure());
    }

    #[test]
    fn test_noise_only_caps_qber() {
        let mut trail = LogTrail::new();
        let est = compute(0.0, 0.85, 300.0, 10.0, &mut trail).unwrap();

        assert_eq!(est.qber, 0.25);
        assert_eq!(est.secure_key_rate, 0.0);
    }

    #[test]
    fn test_zero_dark_counts() {
        let mut trail = LogTrail::new();
        let est = compute(10.0, 0.8, 0.0, 0.0, &mut trail).unwrap();

        assert_eq!(est.qber, 0.0);
        assert_eq!(est.transmission, 1.0);
        assert_relative_eq!(est.secure_key_rate, 8e6 * 0.5 * 0.9, max_relative = 1e-12);
    }

    #[test]
    fn test_distance_reduces_rate() {
        let mut trail = LogTrail::new();
        let near = compute(100.0, 0.85, 100.0, 10.0, &mut trail).unwrap();
        let far = compute(100.0, 0.85, 100.0, 50.0, &mut trail).unwrap();

        assert_relative_eq!(far.transmission, 0.1, epsilon = 1e-12);
        assert!(far.secure_key_rate < near.secure_key_rate);
        assert!(far.qber > near.qber);
    }

    #[test]
    fn test_qber_bounded_and_rate_non_negative() {
        let mut trail = LogTrail::new();
        for photon_rate in [0.0, 1e-6, 0.01, 1.0, 100.0, 1e4] {
            for eta in [0.0, 0.6, 0.95, 1.0] {
                for dark in [0.0, 50.0, 500.0, 1e9] {
                    for distance in [0.0, 10.0, 200.0] {
                        let est = compute(photon_rate, eta, dark, distance, &mut trail).unwrap();
                        assert!((0.0..=0.25).contains(&est.qber));
                        assert!(est.secure_key_rate >= 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_invalid_inputs() {
        let mut trail = LogTrail::new();

        assert!(matches!(
            compute(-1.0, 0.85, 100.0, 10.0, &mut trail),
            Err(QkdtError::InvalidPhotonRate(_))
        ));
        assert!(matches!(
            compute(100.0, 1.5, 100.0, 10.0, &mut trail),
            Err(QkdtError::InvalidEfficiency(_))
        ));
        assert!(matches!(
            compute(100.0, f64::NAN, 100.0, 10.0, &mut trail),
            Err(QkdtError::InvalidEfficiency(_))
        ));
        assert!(matches!(
            compute(100.0, 0.85, f64::INFINITY, 10.0, &mut trail),
            Err(QkdtError::InvalidDarkCountRate(_))
        ));
        assert!(matches!(
            compute(100.0, 0.85, 100.0, -5.0, &mut trail),
            Err(QkdtError::InvalidDistance(_))
        ));
        assert!(trail.is_empty());
    }

    #[test]
    fn test_calculator_reuse() {
        let calc = KeyRateCalculator::with_distance(25.0).unwrap();
        let mut trail = LogTrail::new();

        let a = calc.compute(100.0, 0.85, 100.0, &mut trail).unwrap();
        let b = calc.compute(100.0, 0.85, 100.0, &mut trail).unwrap();

        assert_eq!(a, b);
        assert_eq!(a.as_pair(), (a.secure_key_rate, a.qber));
        assert_eq!(trail.len(), 2);
    }
}
