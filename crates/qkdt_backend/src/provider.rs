//! Backend directory capability
//!
//! Gantree: L1_Backend → BackendProvider
//!
//! A provider answers one question: which devices can this credential reach?
//! Providers are chosen at startup. `NullBackendProvider` stands in when no
//! directory is installed, so the locator never probes for one at runtime.

use crate::credentials::Credential;
use qkdt_core::BackendInfo;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Backend directory errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DirectoryError {
    /// No directory capability installed
    #[error("{0}")]
    CapabilityUnavailable(String),

    /// No credential supplied and none found in the environment
    #[error("No IBM Quantum API key provided")]
    CredentialMissing,

    /// Credential rejected by the directory
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Transport or service failure
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Directory answered with zero devices
    #[error("No quantum backends available")]
    NoBackendAvailable,

    /// Directory answered with something unparseable
    #[error("Invalid directory response: {0}")]
    InvalidResponse(String),
}

/// Result alias for directory queries
pub type DirectoryResult<T> = Result<T, DirectoryError>;

// ============================================================================
// DeviceDescriptor
// ============================================================================

/// Static metadata of one device listed by a directory
/// Gantree: DeviceDescriptor // 디바이스 메타데이터
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Device name
    pub name: String,

    /// Qubit count, when the directory reports one
    #[serde(default)]
    pub num_qubits: Option<usize>,

    /// Native gate set
    #[serde(default)]
    pub basis_gates: Vec<String>,

    /// Coupling map, rendered as text
    #[serde(default)]
    pub coupling_map: Option<String>,

    /// Quantum volume
    #[serde(default)]
    pub quantum_volume: Option<u64>,
}

impl DeviceDescriptor {
    /// Create a descriptor with no optional metadata
    pub fn new(name: impl Into<String>, num_qubits: impl Into<Option<usize>>) -> Self {
        Self {
            name: name.into(),
            num_qubits: num_qubits.into(),
            basis_gates: Vec::new(),
            coupling_map: None,
            quantum_volume: None,
        }
    }

    /// Set basis gates
    pub fn with_basis_gates<I, S>(mut self, gates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.basis_gates = gates.into_iter().map(Into::into).collect();
        self
    }

    /// Set coupling map from qubit pairs
    pub fn with_coupling_map(mut self, pairs: &[(usize, usize)]) -> Self {
        self.coupling_map = Some(format_coupling_map(pairs));
        self
    }

    /// Set quantum volume
    pub fn with_quantum_volume(mut self, qv: u64) -> Self {
        self.quantum_volume = Some(qv);
        self
    }

    /// Convert to report metadata (connected)
    pub fn to_backend_info(&self) -> BackendInfo {
        BackendInfo::connected(
            self.name.clone(),
            self.num_qubits,
            self.basis_gates.clone(),
            self.coupling_map.clone(),
            self.quantum_volume,
        )
    }
}

/// Render qubit pairs as `[[0, 1], [1, 2]]`
pub fn format_coupling_map(pairs: &[(usize, usize)]) -> String {
    let inner: Vec<String> = pairs
        .iter()
        .map(|(a, b)| format!("[{}, {}]", a, b))
        .collect();
    format!("[{}]", inner.join(", "))
}

// ============================================================================
// Provider Trait
// ============================================================================

/// Whether a provider can answer directory queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// Queries are possible
    Available,
    /// No directory; carries the reason shown to users
    Unavailable(String),
}

/// Backend directory capability
/// Gantree: BackendProvider // 디렉터리 인터페이스
pub trait BackendProvider: Send + Sync {
    /// Directory name used in log messages
    fn name(&self) -> &str;

    /// Capability of this provider, known without any I/O
    fn capability(&self) -> Capability {
        Capability::Available
    }

    /// Credential saved with the directory itself (e.g. an account file),
    /// used only when neither the caller nor the environment supplies one
    fn stored_credential(&self) -> Option<Credential> {
        None
    }

    /// List devices reachable with the credential.
    ///
    /// Implementations must not cache clients or handles between calls.
    fn list_devices(&self, credential: &Credential) -> DirectoryResult<Vec<DeviceDescriptor>>;
}

// ============================================================================
// NullBackendProvider
// ============================================================================

/// Provider used when no backend directory is installed
#[derive(Debug, Clone)]
pub struct NullBackendProvider {
    reason: String,
}

impl NullBackendProvider {
    /// Default unavailability reason
    pub const DEFAULT_REASON: &'static str = "Quantum backend SDK not available";

    /// Create with the default reason
    pub fn new() -> Self {
        Self {
            reason: Self::DEFAULT_REASON.to_string(),
        }
    }

    /// Create with a custom reason
    pub fn with_reason(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Default for NullBackendProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendProvider for NullBackendProvider {
    fn name(&self) -> &str {
        "null"
    }

    fn capability(&self) -> Capability {
        Capability::Unavailable(self.reason.clone())
    }

    fn list_devices(&self, _credential: &Credential) -> DirectoryResult<Vec<DeviceDescriptor>> {
        Err(DirectoryError::CapabilityUnavailable(self.reason.clone()))
    }
}

// ============================================================================
// StaticBackendProvider
// ============================================================================

/// In-process directory with a fixed device list (tests, demos, offline labs)
#[derive(Debug)]
pub struct StaticBackendProvider {
    name: String,
    devices: Vec<DeviceDescriptor>,
    accepted_token: Option<String>,
    stored_token: Option<String>,
    failure: Option<DirectoryError>,
    queries: AtomicUsize,
}

impl StaticBackendProvider {
    /// Create a directory listing `devices`
    pub fn new(devices: Vec<DeviceDescriptor>) -> Self {
        Self {
            name: "static".to_string(),
            devices,
            accepted_token: None,
            stored_token: None,
            failure: None,
            queries: AtomicUsize::new(0),
        }
    }

    /// Directory with a single 5-qubit device
    pub fn single(name: &str) -> Self {
        Self::new(vec![DeviceDescriptor::new(name, 5)
            .with_basis_gates(["cx", "id", "rz", "sx", "x"])
            .with_coupling_map(&[(0, 1), (1, 2), (2, 3), (3, 4)])
            .with_quantum_volume(32)])
    }

    /// Set the name used in log messages
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Reject every credential except `token`
    pub fn requiring_token(mut self, token: impl Into<String>) -> Self {
        self.accepted_token = Some(token.into());
        self
    }

    /// Offer `token` as a saved account
    pub fn with_stored_token(mut self, token: impl Into<String>) -> Self {
        self.stored_token = Some(token.into());
        self
    }

    /// Fail every query with `error`
    pub fn failing(mut self, error: DirectoryError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Number of queries answered so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl BackendProvider for StaticBackendProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn stored_credential(&self) -> Option<Credential> {
        self.stored_token
            .as_ref()
            .map(|token| Credential::stored(token.clone(), "static"))
    }

    fn list_devices(&self, credential: &Credential) -> DirectoryResult<Vec<DeviceDescriptor>> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        if let Some(ref err) = self.failure {
            return Err(err.clone());
        }

        if let Some(ref token) = self.accepted_token {
            if credential.token() != token {
                return Err(DirectoryError::Authentication(
                    "Invalid or expired token".to_string(),
                ));
            }
        }

        Ok(self.devices.clone())
    }
}

// ============================================================================
// Tests
// ============================================================================
