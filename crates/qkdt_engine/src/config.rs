//! Testbed configuration
//!
//! Gantree: L6_Engine → TestbedConfig
//!
//! Run parameters of the testbed. Sources, in increasing priority: presets,
//! a JSON file, `QKDT_*` environment variables, builder calls.

use qkdt_core::backend::{CREDENTIAL_ENV_VARS, DEFAULT_SIMULATOR};
use qkdt_core::channel::DEFAULT_DISTANCE_KM;
use qkdt_core::{QkdtError, QkdtResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Default photon rate (MHz) used when a request carries none
pub const DEFAULT_PHOTON_RATE_MHZ: f64 = 150.0;

/// Default number of reports kept in history
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Environment variable: photon rate (MHz)
pub const ENV_PHOTON_RATE: &str = "QKDT_PHOTON_RATE";
/// Environment variable: fiber distance (km)
pub const ENV_DISTANCE_KM: &str = "QKDT_DISTANCE_KM";
/// Environment variable: probe seed
pub const ENV_SEED: &str = "QKDT_SEED";

/// Testbed configuration
/// Gantree: TestbedConfig // 테스트베드 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestbedConfig {
    // ========================================================================
    // Link Parameters
    // ========================================================================
    /// Source photon rate (MHz)
    pub photon_rate: f64,

    /// Fiber distance (km)
    pub distance_km: f64,

    // ========================================================================
    // Backend Parameters
    // ========================================================================
    /// Simulator reported when the directory cannot be reached
    pub simulator_name: String,

    /// Environment variables searched for a directory credential, in order
    pub credential_env_vars: Vec<String>,

    // ========================================================================
    // Execution Parameters
    // ========================================================================
    /// Probe seed; entropy-seeded when absent
    pub seed: Option<u64>,

    /// Reports kept by in-memory history
    pub history_capacity: usize,

    /// Log a summary of every report
    pub verbose: bool,
}

impl TestbedConfig {
    // ========================================================================
    // Presets
    // ========================================================================

    /// Metro-scale lab link: 10 km
    pub fn lab() -> Self {
        Self {
            photon_rate: DEFAULT_PHOTON_RATE_MHZ,
            distance_km: DEFAULT_DISTANCE_KM,
            simulator_name: DEFAULT_SIMULATOR.to_string(),
            credential_env_vars: CREDENTIAL_ENV_VARS.iter().map(|s| s.to_string()).collect(),
            seed: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            verbose: false,
        }
    }

    /// Intercity link: 50 km (10 dB)
    pub fn intercity() -> Self {
        Self {
            distance_km: 50.0,
            ..Self::lab()
        }
    }

    /// Reproducible configuration (fixed seed)
    pub fn benchmark() -> Self {
        Self {
            photon_rate: 100.0,
            seed: Some(42),
            ..Self::lab()
        }
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set photon rate (MHz)
    pub fn with_photon_rate(mut self, photon_rate: f64) -> Self {
        self.photon_rate = photon_rate;
        self
    }

    /// Set fiber distance (km)
    pub fn with_distance(mut self, distance_km: f64) -> Self {
        self.distance_km = distance_km;
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set fallback simulator name
    pub fn with_simulator_name(mut self, name: impl Into<String>) -> Self {
        self.simulator_name = name.into();
        self
    }

    /// Set credential variables
    pub fn with_credential_env_vars<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.credential_env_vars = vars.into_iter().map(Into::into).collect();
        self
    }

    /// Set history capacity
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    // ========================================================================
    // Sources
    // ========================================================================

    /// Overlay `QKDT_*` process environment variables on the lab preset
    pub fn from_env() -> QkdtResult<Self> {
        Self::lab().overlay_env(|key| std::env::var(key).ok())
    }

    /// Overlay variables supplied by `lookup`
    pub fn overlay_env<F>(mut self, lookup: F) -> QkdtResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_PHOTON_RATE) {
            self.photon_rate = parse_var(ENV_PHOTON_RATE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_DISTANCE_KM) {
            self.distance_km = parse_var(ENV_DISTANCE_KM, &raw)?;
        }
        if let Some(raw) = lookup(ENV_SEED) {
            self.seed = Some(parse_var(ENV_SEED, &raw)?);
        }
        Ok(self)
    }

    /// Load from a JSON file; missing fields take lab defaults
    pub fn load(path: impl AsRef<Path>) -> QkdtResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> QkdtResult<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    pub fn validate(&self) -> QkdtResult<()> {
        if !self.photon_rate.is_finite() || self.photon_rate < 0.0 {
            return Err(QkdtError::InvalidPhotonRate(self.photon_rate));
        }

        if !self.distance_km.is_finite() || self.distance_km < 0.0 {
            return Err(QkdtError::InvalidDistance(self.distance_km));
        }

        if self.simulator_name.trim().is_empty() {
            return Err(QkdtError::ConfigError(
                "simulator_name must not be empty".to_string(),
            ));
        }

        if self.history_capacity == 0 {
            return Err(QkdtError::ConfigError(
                "history_capacity must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> QkdtResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| QkdtError::ConfigError(format!("{} has invalid value '{}'", key, raw)))
}

impl Default for TestbedConfig {
    fn default() -> Self {
        Self::lab()
    }
}

impl fmt::Display for TestbedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TestbedConfig({} MHz, {} km, seed={:?}, simulator={})",
            self.photon_rate, self.distance_km, self.seed, self.simulator_name
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_lab_defaults() {
        let config = TestbedConfig::lab();
        assert_eq!(config.photon_rate, 150.0);
        assert_eq!(config.distance_km, 10.0);
        assert_eq!(config.simulator_name, "qiskit_aer_simulator");
        assert_eq!(config.credential_env_vars[0], "IBM_QUANTUM_API_KEY");
        assert_eq!(config.history_capacity, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(TestbedConfig::intercity().distance_km, 50.0);
        assert_eq!(TestbedConfig::benchmark().seed, Some(42));
    }

    #[test]
    fn test_builder() {
        let config = TestbedConfig::default()
            .with_photon_rate(80.0)
            .with_distance(25.0)
            .with_seed(7)
            .with_simulator_name("local_sim")
            .with_credential_env_vars(["MY_TOKEN"]);

        assert_eq!(config.photon_rate, 80.0);
        assert_eq!(config.distance_km, 25.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.credential_env_vars, vec!["MY_TOKEN".to_string()]);
    }

    #[test]
    fn test_env_overlay() {
        let config = TestbedConfig::lab()
            .overlay_env(env(&[("QKDT_PHOTON_RATE", "200"), ("QKDT_SEED", " 9 ")]))
            .unwrap();

        assert_eq!(config.photon_rate, 200.0);
        assert_eq!(config.distance_km, 10.0);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn test_env_overlay_rejects_garbage() {
        let result = TestbedConfig::lab().overlay_env(env(&[("QKDT_DISTANCE_KM", "far")]));
        assert!(matches!(result, Err(QkdtError::ConfigError(_))));
    }

    #[test]
    fn test_validation() {
        assert!(TestbedConfig::lab().with_distance(-1.0).validate().is_err());
        assert!(TestbedConfig::lab().with_photon_rate(f64::NAN).validate().is_err());
        assert!(TestbedConfig::lab().with_history_capacity(0).validate().is_err());
        assert!(TestbedConfig::lab().with_simulator_name(" ").validate().is_err());
    }

    #[test]
    fn test_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("testbed.json");

        let config = TestbedConfig::intercity().with_seed(5);
        config.save(&path).unwrap();

        assert_eq!(TestbedConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{"distance_km": 30.0}"#).unwrap();

        let config = TestbedConfig::load(&path).unwrap();
        assert_eq!(config.distance_km, 30.0);
        assert_eq!(config.photon_rate, 150.0);
    }
}
