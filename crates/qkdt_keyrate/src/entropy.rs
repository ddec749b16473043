//! Binary Shannon entropy
//!
//! Gantree: L4_KeyRate → Entropy

/// h(q) = -q log2 q - (1-q) log2 (1-q), with h(0) = h(1) = 0.
///
/// Callers pass probabilities in [0, 1]; values at or beyond either end are
/// treated as the deterministic endpoints.
pub fn binary_entropy(q: f64) -> f64 {
    if q <= 0.0 || q >= 1.0 {
        return 0.0;
    }
    -q * q.log2() - (1.0 - q) * (1.0 - q).log2()
}
