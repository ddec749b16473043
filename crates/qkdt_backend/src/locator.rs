//! Backend locator
//!
//! Gantree: L1_Backend → BackendLocator
//!
//! Resolves the backend an analysis runs against. This is the only place in
//! the pipeline that recovers from failure: every directory problem ends in
//! a simulated-backend `BackendInfo`, never in an error for the caller.

use crate::credentials::{CredentialResolver, CredentialSource};
use crate::provider::{BackendProvider, Capability, DirectoryError};
use qkdt_core::backend::{DEFAULT_SIMULATOR, SIMULATION_BACKEND};
use qkdt_core::{BackendInfo, LogTrail};
use std::sync::Arc;

/// Locates a backend and extracts its metadata
/// Gantree: BackendLocator // 백엔드 탐색
#[derive(Clone)]
pub struct BackendLocator {
    provider: Arc<dyn BackendProvider>,
    resolver: CredentialResolver,
    simulator_name: String,
}

impl BackendLocator {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a locator over `provider`
    pub fn new(provider: Arc<dyn BackendProvider>) -> Self {
        Self {
            provider,
            resolver: CredentialResolver::new(),
            simulator_name: DEFAULT_SIMULATOR.to_string(),
        }
    }

    /// Replace the credential resolver
    pub fn with_resolver(mut self, resolver: CredentialResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Set the fallback simulator name
    pub fn with_simulator_name(mut self, name: impl Into<String>) -> Self {
        self.simulator_name = name.into();
        self
    }

    /// Installed provider
    pub fn provider(&self) -> &dyn BackendProvider {
        self.provider.as_ref()
    }

    /// Fallback simulator name
    pub fn simulator_name(&self) -> &str {
        &self.simulator_name
    }

    // ========================================================================
    // Locate
    // ========================================================================

    /// Resolve a backend. Never fails: see module docs.
    pub fn locate(&self, credential: Option<&str>, trail: &mut LogTrail) -> BackendInfo {
        if let Capability::Unavailable(reason) = self.provider.capability() {
            trail.error(format!("{} for device testing", reason));
            return BackendInfo::fallback(SIMULATION_BACKEND, reason);
        }

        match self.connect(credential, trail) {
            Ok(info) => info,
            Err(err) => {
                trail.error(format!("Device connection failed: {}", err));
                trail.warning(format!("Falling back to {}", self.simulator_name));
                BackendInfo::fallback(self.simulator_name.clone(), err.to_string())
            }
        }
    }

    fn connect(
        &self,
        credential: Option<&str>,
        trail: &mut LogTrail,
    ) -> Result<BackendInfo, DirectoryError> {
        let credential = match self.resolver.resolve(credential) {
            Ok(credential) => credential,
            Err(err) => self.provider.stored_credential().ok_or(err)?,
        };
        let devices = self.provider.list_devices(&credential)?;

        match credential.source() {
            CredentialSource::Explicit => {
                trail.success(format!("Connected to {} API", self.provider.name()))
            }
            CredentialSource::Environment(_) => trail.success(format!(
                "Connected to {} API with environment key",
                self.provider.name()
            )),
            CredentialSource::Stored(_) => trail.success(format!(
                "Connected to {} API with saved account",
                self.provider.name()
            )),
        }

        // First listed device; no ranking
        let device = devices
            .into_iter()
            .next()
            .ok_or(DirectoryError::NoBackendAvailable)?;

        trail.success(format!("Connected to device: {}", device.name));
        Ok(device.to_backend_info())
    }
}

impl std::fmt::Debug for BackendLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendLocator")
            .field("provider", &self.provider.name())
            .field("resolver", &self.resolver)
            .field("simulator_name", &self.simulator_name)
            .finish()
    }
}
