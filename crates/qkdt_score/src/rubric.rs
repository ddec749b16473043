//! Suitability rubric
//!
//! Gantree: L5_Score → Rubric
//!
//! Four independent bucketed dimensions summed into a score in [20, 100].
//! Thresholds are strict; the first matching bucket wins.

use qkdt_core::{Analysis, Rating};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fidelity buckets: (exclusive lower bound, points)
pub const FIDELITY_BUCKETS: [(f64, u32); 3] = [(0.95, 30), (0.90, 20), (0.85, 10)];
/// Points when fidelity matches no bucket
pub const FIDELITY_FLOOR: u32 = 0;

/// Detection efficiency buckets: (exclusive lower bound, points)
pub const EFFICIENCY_BUCKETS: [(f64, u32); 3] = [(0.90, 25), (0.80, 20), (0.70, 15)];
/// Points when efficiency matches no bucket
pub const EFFICIENCY_FLOOR: u32 = 10;

/// QBER buckets: (exclusive upper bound, points)
pub const QBER_BUCKETS: [(f64, u32); 3] = [(0.05, 25), (0.10, 20), (0.15, 15)];
/// Points when QBER matches no bucket
pub const QBER_FLOOR: u32 = 5;

/// Key rate buckets (bits/s): (exclusive lower bound, points)
pub const KEY_RATE_BUCKETS: [(f64, u32); 3] = [(1000.0, 20), (500.0, 15), (100.0, 10)];
/// Points when key rate matches no bucket
pub const KEY_RATE_FLOOR: u32 = 5;

/// Rating bands: (inclusive lower score, rating)
pub const RATING_BANDS: [(u32, Rating); 3] = [(80, Rating::A), (60, Rating::B), (40, Rating::C)];

fn above(value: f64, buckets: &[(f64, u32)], floor: u32) -> u32 {
    buckets
        .iter()
        .find(|(threshold, _)| value > *threshold)
        .map_or(floor, |(_, points)| *points)
}

fn below(value: f64, buckets: &[(f64, u32)], floor: u32) -> u32 {
    buckets
        .iter()
        .find(|(threshold, _)| value < *threshold)
        .map_or(floor, |(_, points)| *points)
}

/// Points per dimension
/// Gantree: ScoreBreakdown // 항목별 점수
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Fidelity points (0-30)
    pub fidelity: u32,
    /// Detection efficiency points (10-25)
    pub detection_efficiency: u32,
    /// QBER points (5-25)
    pub qber: u32,
    /// Key rate points (5-20)
    pub secure_key_rate: u32,
}

impl ScoreBreakdown {
    /// Score each dimension
    pub fn evaluate(fidelity: f64, detection_efficiency: f64, qber: f64, secure_key_rate: f64) -> Self {
        Self {
            fidelity: above(fidelity, &FIDELITY_BUCKETS, FIDELITY_FLOOR),
            detection_efficiency: above(detection_efficiency, &EFFICIENCY_BUCKETS, EFFICIENCY_FLOOR),
            qber: below(qber, &QBER_BUCKETS, QBER_FLOOR),
            secure_key_rate: above(secure_key_rate, &KEY_RATE_BUCKETS, KEY_RATE_FLOOR),
        }
    }

    /// Total score
    pub fn total(&self) -> u32 {
        self.fidelity + self.detection_efficiency + self.qber + self.secure_key_rate
    }

    /// Analysis for the total score
    pub fn to_analysis(&self) -> Analysis {
        let total = self.total();
        Analysis::new(total, rating_for(total))
    }
}

impl fmt::Display for ScoreBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fidelity={} efficiency={} qber={} key_rate={} total={}",
            self.fidelity,
            self.detection_efficiency,
            self.qber,
            self.secure_key_rate,
            self.total()
        )
    }
}

/// Rating band for a score
pub fn rating_for(score: u32) -> Rating {
    RATING_BANDS
        .iter()
        .find(|(lower, _)| score >= *lower)
        .map_or(Rating::D, |(_, rating)| *rating)
}

/// Score the four metrics
pub fn score(fidelity: f64, detection_efficiency: f64, qber: f64, secure_key_rate: f64) -> Analysis {
    ScoreBreakdown::evaluate(fidelity, detection_efficiency, qber, secure_key_rate).to_analysis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fidelity_buckets() {
        let pts = |f| ScoreBreakdown::evaluate(f, 0.0, 1.0, 0.0).fidelity;
        assert_eq!(pts(0.999), 30);
        assert_eq!(pts(0.95), 20);
        assert_eq!(pts(0.91), 20);
        assert_eq!(pts(0.90), 10);
        assert_eq!(pts(0.85), 0);
        assert_eq!(pts(0.5), 0);
    }

    #[test]
    fn test_efficiency_buckets() {
        let pts = |e| ScoreBreakdown::evaluate(0.0, e, 1.0, 0.0).detection_efficiency;
        assert_eq!(pts(0.95), 25);
        assert_eq!(pts(0.90), 20);
        assert_eq!(pts(0.80), 15);
        assert_eq!(pts(0.70), 10);
        assert_eq!(pts(0.0), 10);
    }

    #[test]
    fn test_qber_buckets() {
        let pts = |q| ScoreBreakdown::evaluate(0.0, 0.0, q, 0.0).qber;
        assert_eq!(pts(0.0), 25);
        assert_eq!(pts(0.05), 20);
        assert_eq!(pts(0.10), 15);
        assert_eq!(pts(0.15), 5);
        assert_eq!(pts(0.25), 5);
    }

    #[test]
    fn test_key_rate_buckets() {
        let pts = |r| ScoreBreakdown::evaluate(0.0, 0.0, 1.0, r).secure_key_rate;
        assert_eq!(pts(1e7), 20);
        assert_eq!(pts(1000.0), 15);
        assert_eq!(pts(500.0), 10);
        assert_eq!(pts(100.0), 5);
        assert_eq!(pts(0.0), 5);
    }

    #[test]
    fn test_rating_bands() {
        assert_eq!(rating_for(100), Rating::A);
        assert_eq!(rating_for(80), Rating::A);
        assert_eq!(rating_for(79), Rating::B);
        assert_eq!(rating_for(60), Rating::B);
        assert_eq!(rating_for(59), Rating::C);
        assert_eq!(rating_for(40), Rating::C);
        assert_eq!(rating_for(39), Rating::D);
        assert_eq!(rating_for(0), Rating::D);
    }

    #[test]
    fn test_extremes() {
        let best = score(0.999, 0.95, 0.0, 1e7);
        assert_eq!(best.suitability_score, 100);
        assert_eq!(best.rating, Rating::A);
        assert_eq!(best.recommendation, "Excellent for QKD deployment");

        let worst = score(0.0, 0.0, 0.25, 0.0);
        assert_eq!(worst.suitability_score, 20);
        assert_eq!(worst.rating, Rating::D);
        assert_eq!(worst.recommendation, "Not suitable for secure QKD");
    }

    #[test]
    fn test_measurement_range_extremes() {
        // Best values a run can report together
        let best = score(0.99, 0.95, 0.0, 2000.0);
        assert_eq!(best.suitability_score, 100);
        assert_eq!(best.rating, Rating::A);

        // Lower clamp edges of fidelity and efficiency, capped QBER, no key
        let breakdown = ScoreBreakdown::evaluate(0.80, 0.60, 0.25, 0.0);
        assert_eq!(
            breakdown,
            ScoreBreakdown {
                fidelity: 0,
                detection_efficiency: 10,
                qber: 5,
                secure_key_rate: 5,
            }
        );

        let worst = score(0.80, 0.60, 0.25, 0.0);
        assert_eq!(worst.suitability_score, 20);
        assert_eq!(worst.rating, Rating::D);
    }

    #[test]
    fn test_marginal_recommendation() {
        // 10 + 15 + 15 + 5
        let analysis = score(0.86, 0.75, 0.12, 50.0);
        assert_eq!(analysis.suitability_score, 45);
        assert_eq!(analysis.rating, Rating::C);
        assert_eq!(
            analysis.recommendation,
            "Marginal - requires significant optimization"
        );
    }
}
