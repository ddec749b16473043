//! IBM Quantum backend directory
//!
//! Gantree: L2_Ibm → IbmBackendProvider
//!
//! Every `list_devices` call builds its own runtime and client and drops both
//! before returning. Nothing is shared between locate calls.
//!
//! With no explicit or environment credential, the saved Qiskit account
//! (`~/.qiskit/qiskit-ibm.json` by default) supplies the token, channel and
//! instance.

use crate::auth::{AuthError, IbmChannel, IbmCredentials};
use crate::client::{ClientError, DeviceConfiguration, DeviceSummary, IbmClient};
use qkdt_backend::{
    BackendProvider, Credential, CredentialSource, DeviceDescriptor, DirectoryError,
    DirectoryResult,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::runtime::Builder;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// IBM Quantum directory
#[derive(Debug, Clone)]
pub struct IbmBackendProvider {
    channel: IbmChannel,
    instance: Option<String>,
    service_crn: Option<String>,
    timeout: Duration,
    saved_account: Option<PathBuf>,
}

impl IbmBackendProvider {
    /// Create a provider for the default channel
    pub fn new() -> Self {
        Self {
            channel: IbmChannel::default(),
            instance: None,
            service_crn: None,
            timeout: DEFAULT_TIMEOUT,
            saved_account: IbmCredentials::qiskit_config_path(),
        }
    }

    /// Set channel
    pub fn with_channel(mut self, channel: IbmChannel) -> Self {
        self.channel = channel;
        self
    }

    /// Set instance
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Set service CRN
    pub fn with_crn(mut self, crn: impl Into<String>) -> Self {
        self.service_crn = Some(crn.into());
        self
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read the saved account from `path` instead of the home directory
    pub fn with_saved_account(mut self, path: impl Into<PathBuf>) -> Self {
        self.saved_account = Some(path.into());
        self
    }

    /// Never fall back to a saved account
    pub fn without_saved_account(mut self) -> Self {
        self.saved_account = None;
        self
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Saved account location, if one is consulted
    pub fn saved_account(&self) -> Option<&Path> {
        self.saved_account.as_deref()
    }

    fn credentials_for(&self, credential: &Credential) -> IbmCredentials {
        let saved = match credential.source() {
            CredentialSource::Stored(path) => {
                IbmCredentials::from_qiskit_config_file(Path::new(path), None)
                    .ok()
                    .filter(|creds| creds.token() == credential.token())
            }
            _ => None,
        };

        let mut creds = saved.unwrap_or_else(|| {
            IbmCredentials::from_credential(credential).with_channel(self.channel)
        });
        if let Some(ref instance) = self.instance {
            creds = creds.with_instance(instance.clone());
        }
        if let Some(ref crn) = self.service_crn {
            creds = creds.with_crn(crn.clone());
        }
        creds
    }

    async fn query(&self, creds: &IbmCredentials) -> Result<Vec<DeviceDescriptor>, ClientError> {
        let client = IbmClient::connect(creds, self.timeout).await?;
        let devices = client.list_devices().await?;

        // Metadata is only needed for the device the locator will pick
        let mut descriptors = Vec::with_capacity(devices.len());
        for (index, summary) in devices.iter().enumerate() {
            let config = if index == 0 {
                Some(client.get_configuration(&summary.name).await?)
            } else {
                None
            };
            descriptors.push(describe(summary, config.as_ref()));
        }

        Ok(descriptors)
    }
}

impl Default for IbmBackendProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendProvider for IbmBackendProvider {
    fn name(&self) -> &str {
        "IBM Quantum"
    }

    fn stored_credential(&self) -> Option<Credential> {
        let path = self.saved_account.as_ref()?;

        match IbmCredentials::from_qiskit_config_file(path, None) {
            Ok(creds) => Some(Credential::stored(creds.token(), path.display().to_string())),
            Err(e) => {
                log::debug!("No saved IBM Quantum account: {}", e);
                None
            }
        }
    }

    fn list_devices(&self, credential: &Credential) -> DirectoryResult<Vec<DeviceDescriptor>> {
        let creds = self.credentials_for(credential);

        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DirectoryError::ConnectionFailed(format!("async runtime: {}", e)))?;

        runtime.block_on(self.query(&creds)).map_err(into_directory_error)
    }
}

/// Descriptor for a listed device, enriched by its configuration when fetched.
///
/// The configuration's qubit count wins over the listing's; a device with
/// neither keeps an unknown size.
pub fn describe(summary: &DeviceSummary, config: Option<&DeviceConfiguration>) -> DeviceDescriptor {
    let mut descriptor = DeviceDescriptor::new(summary.name.clone(), summary.qubits);

    let Some(config) = config else {
        return descriptor;
    };

    if config.n_qubits.is_some() {
        descriptor.num_qubits = config.n_qubits;
    }
    if let Some(gates) = config.basis_gates.clone() {
        descriptor = descriptor.with_basis_gates(gates);
    }
    if let Some(pairs) = config.coupling_pairs() {
        descriptor = descriptor.with_coupling_map(&pairs);
    }
    if let Some(qv) = config.quantum_volume {
        descriptor = descriptor.with_quantum_volume(qv);
    }
    descriptor
}

/// Map client failures onto directory errors
pub fn into_directory_error(err: ClientError) -> DirectoryError {
    match err {
        ClientError::Auth(AuthError::MissingToken) => DirectoryError::CredentialMissing,
        ClientError::Auth(e) => DirectoryError::Authentication(e.to_string()),
        ClientError::ParseError(e) => DirectoryError::InvalidResponse(e.to_string()),
        other => DirectoryError::ConnectionFailed(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_builder() {
        let provider = IbmBackendProvider::new()
            .with_channel(IbmChannel::IbmCloud)
            .with_crn("crn:v1:test")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(provider.name(), "IBM Quantum");
        assert_eq!(provider.timeout(), Duration::from_secs(5));

        let creds = provider.credentials_for(&Credential::explicit("t"));
        assert_eq!(creds.channel(), IbmChannel::IbmCloud);
        assert_eq!(creds.service_crn(), Some("crn:v1:test"));
    }

    #[test]
    fn test_saved_account_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qiskit-ibm.json");
        std::fs::write(
            &path,
            r#"{"default-ibm-cloud": {"channel": "ibm_cloud", "token": "saved_token", "instance": "crn:v1:saved"}}"#,
        )
        .unwrap();

        let provider = IbmBackendProvider::new().with_saved_account(&path);
        let credential = provider.stored_credential().unwrap();
        assert_eq!(credential.token(), "saved_token");
        assert!(matches!(credential.source(), CredentialSource::Stored(_)));

        let creds = provider.credentials_for(&credential);
        assert_eq!(creds.channel(), IbmChannel::IbmCloud);
        assert_eq!(creds.instance(), Some("crn:v1:saved"));
    }

    #[test]
    fn test_missing_saved_account() {
        let dir = tempfile::tempdir().unwrap();
        let provider = IbmBackendProvider::new().with_saved_account(dir.path().join("none.json"));

        assert!(provider.stored_credential().is_none());
        assert!(IbmBackendProvider::new()
            .without_saved_account()
            .stored_credential()
            .is_none());
    }

    #[test]
    fn test_short_token_rejected_before_network() {
        let provider = IbmBackendProvider::new();
        let result = provider.list_devices(&Credential::explicit("short"));

        assert!(matches!(result, Err(DirectoryError::Authentication(_))));
    }

    #[test]
    fn test_describe_keeps_unknown_size() {
        let summary: DeviceSummary = serde_json::from_str(r#"{"name": "ibm_new"}"#).unwrap();
        let descriptor = describe(&summary, None);

        assert_eq!(descriptor.name, "ibm_new");
        assert_eq!(descriptor.num_qubits, None);
        assert_eq!(descriptor.to_backend_info().num_qubits, None);
    }

    #[test]
    fn test_describe_with_configuration() {
        let summary: DeviceSummary =
            serde_json::from_str(r#"{"name": "ibm_kyiv", "qubits": 100}"#).unwrap();
        let config: DeviceConfiguration = serde_json::from_str(
            r#"{"n_qubits": 127, "basis_gates": ["ecr", "rz"], "coupling_map": [[0, 1]], "quantum_volume": 64}"#,
        )
        .unwrap();
        let descriptor = describe(&summary, Some(&config));

        assert_eq!(descriptor.num_qubits, Some(127));
        assert_eq!(descriptor.basis_gates, vec!["ecr", "rz"]);
        assert_eq!(descriptor.coupling_map.as_deref(), Some("[[0, 1]]"));
        assert_eq!(descriptor.quantum_volume, Some(64));
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            into_directory_error(ClientError::Auth(AuthError::MissingToken)),
            DirectoryError::CredentialMissing
        );
        assert!(matches!(
            into_directory_error(ClientError::ServiceUnavailable),
            DirectoryError::ConnectionFailed(_)
        ));
        assert!(matches!(
            into_directory_error(ClientError::RateLimited { retry_after: 3 }),
            DirectoryError::ConnectionFailed(_)
        ));
    }

    #[test]
    #[ignore = "requires IBM Quantum credentials and network access"]
    fn test_live_listing() {
        let token = std::env::var("IBM_QUANTUM_API_KEY").unwrap();
        let devices = IbmBackendProvider::new()
            .list_devices(&Credential::explicit(token))
            .unwrap();
        assert!(!devices.is_empty());
    }
}
