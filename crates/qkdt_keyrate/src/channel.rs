//! Fiber channel loss model
//!
//! Gantree: L4_KeyRate → FiberChannel

use qkdt_core::channel::{DEFAULT_DISTANCE_KM, FIBER_ATTENUATION_DB_PER_KM};
use qkdt_core::{QkdtError, QkdtResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Optical fiber link between source and detector
/// Gantree: FiberChannel // 광섬유 손실 모델
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FiberChannel {
    distance_km: f64,
}

impl FiberChannel {
    /// Create a channel, rejecting negative or non-finite distances
    pub fn new(distance_km: f64) -> QkdtResult<Self> {
        if !distance_km.is_finite() || distance_km < 0.0 {
            return Err(QkdtError::InvalidDistance(distance_km));
        }
        Ok(Self { distance_km })
    }

    /// Link length (km)
    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Total loss (dB)
    pub fn loss_db(&self) -> f64 {
        FIBER_ATTENUATION_DB_PER_KM * self.distance_km
    }

    /// Fraction of photons surviving the link
    pub fn transmission(&self) -> f64 {
        10f64.powf(-self.loss_db() / 10.0)
    }
}

impl Default for FiberChannel {
    fn default() -> Self {
        Self {
            distance_km: DEFAULT_DISTANCE_KM,
        }
    }
}

impl fmt::Display for FiberChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FiberChannel({} km, {:.1} dB, T={:.4})",
            self.distance_km,
            self.loss_db(),
            self.transmission()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_distance_is_lossless() {
        let ch = FiberChannel::new(0.0).unwrap();
        assert_eq!(ch.loss_db(), 0.0);
        assert_eq!(ch.transmission(), 1.0);
    }

    #[test]
    fn test_fifty_km() {
        let ch = FiberChannel::new(50.0).unwrap();
        assert_relative_eq!(ch.loss_db(), 10.0, epsilon = 1e-12);
        assert_relative_eq!(ch.transmission(), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_default_ten_km() {
        let ch = FiberChannel::default();
        assert_eq!(ch.distance_km(), 10.0);
        assert_relative_eq!(ch.transmission(), 10f64.powf(-0.2), epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_distance() {
        assert!(matches!(
            FiberChannel::new(-1.0),
            Err(QkdtError::InvalidDistance(_))
        ));
        assert!(FiberChannel::new(f64::INFINITY).is_err());
        assert!(FiberChannel::new(f64::NAN).is_err());
    }
}
