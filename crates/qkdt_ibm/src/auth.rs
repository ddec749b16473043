//! IBM Quantum authentication
//!
//! Gantree: L2_Ibm → Auth
//!
//! Credentials come from the locator (explicit argument or environment) or,
//! failing both, from the saved Qiskit account (~/.qiskit/qiskit-ibm.json).
//!
//! Two token kinds:
//! - Direct token (IQP): sent as Bearer token directly
//! - API key (IBM Cloud, `ApiKey-` prefix): exchanged for an IAM access token

use qkdt_backend::Credential;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing API token
    #[error("IBM Quantum API token not provided")]
    MissingToken,

    /// Invalid token format
    #[error("Invalid API token format")]
    InvalidTokenFormat,

    /// Rejected by the service
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// Config file read error
    #[error("Failed to read Qiskit config file: {0}")]
    ConfigFileError(String),

    /// Config file parse error
    #[error("Failed to parse Qiskit config file: {0}")]
    ConfigParseError(String),

    /// IAM token exchange error
    #[error("IAM token exchange failed: {0}")]
    IamTokenExchangeFailed(String),

    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    HttpError(String),
}

/// Entry of ~/.qiskit/qiskit-ibm.json
#[derive(Debug, Clone, Deserialize)]
struct QiskitConfigEntry {
    token: String,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    instance: Option<String>,
}

/// Type of API token/key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Direct IQP token (used as Bearer directly)
    IqpToken,
    /// IBM Cloud API key (needs IAM exchange)
    ApiKey,
}

impl TokenType {
    /// Detect token type from format
    pub fn detect(token: &str) -> Self {
        if token.starts_with("ApiKey-") || token.starts_with("apikey-") {
            TokenType::ApiKey
        } else {
            TokenType::IqpToken
        }
    }
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

/// IBM Quantum channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IbmChannel {
    /// IBM Quantum Platform
    #[default]
    IbmQuantum,
    /// IBM Cloud
    IbmCloud,
}

impl IbmChannel {
    /// Base URL (both channels share the 2025 endpoint)
    pub fn base_url(&self) -> &'static str {
        match self {
            IbmChannel::IbmQuantum => "https://quantum.cloud.ibm.com",
            IbmChannel::IbmCloud => "https://quantum.cloud.ibm.com",
        }
    }

    /// API URL (with /api/v1 prefix)
    pub fn api_url(&self) -> String {
        format!("{}/api/v1", self.base_url())
    }

    /// Parse a channel name as found in configs and env vars
    pub fn parse(name: &str) -> Self {
        if name.to_lowercase().contains("cloud") {
            IbmChannel::IbmCloud
        } else {
            IbmChannel::IbmQuantum
        }
    }
}

/// IAM token endpoint
const IAM_TOKEN_URL: &str = "https://iam.cloud.ibm.com/identity/token";

/// IBM Quantum credentials
#[derive(Clone)]
pub struct IbmCredentials {
    api_token: String,
    token_type: TokenType,
    instance: Option<String>,
    channel: IbmChannel,
    service_crn: Option<String>,
}

impl IbmCredentials {
    /// Create from an API token or API key
    pub fn new(api_token: impl Into<String>) -> Self {
        let api_token = api_token.into();
        let token_type = TokenType::detect(&api_token);
        Self {
            api_token,
            token_type,
            instance: None,
            channel: IbmChannel::default(),
            service_crn: None,
        }
    }

    /// Create from a locator credential
    pub fn from_credential(credential: &Credential) -> Self {
        Self::new(credential.token())
    }

    /// Location of the saved Qiskit account file
    pub fn qiskit_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".qiskit").join("qiskit-ibm.json"))
    }

    /// Load credentials from the Qiskit config file in the home directory.
    ///
    /// `name` selects a named entry; otherwise an entry whose name starts with
    /// "default" wins, then any entry.
    pub fn from_qiskit_config(name: Option<&str>) -> Result<Self, AuthError> {
        let path = Self::qiskit_config_path().ok_or_else(|| {
            AuthError::ConfigFileError("Could not determine home directory".into())
        })?;
        Self::from_qiskit_config_file(&path, name)
    }

    /// Load credentials from a Qiskit config file at `path`
    pub fn from_qiskit_config_file(path: &Path, name: Option<&str>) -> Result<Self, AuthError> {
        let content = fs::read_to_string(path)
            .map_err(|e| AuthError::ConfigFileError(format!("{}: {}", path.display(), e)))?;

        let creds = Self::parse_qiskit_config(&content, name)?;
        log::info!("Loaded IBM Quantum credentials from {}", path.display());
        Ok(creds)
    }

    fn parse_qiskit_config(content: &str, name: Option<&str>) -> Result<Self, AuthError> {
        let config: HashMap<String, QiskitConfigEntry> = serde_json::from_str(content)
            .map_err(|e| AuthError::ConfigParseError(e.to_string()))?;

        let entry = match name {
            Some(requested) => config.get(requested).ok_or_else(|| {
                AuthError::ConfigParseError(format!("Credential '{}' not found", requested))
            })?,
            None => config
                .iter()
                .find(|(k, _)| k.starts_with("default"))
                .or_else(|| config.iter().next())
                .map(|(_, v)| v)
                .ok_or_else(|| AuthError::ConfigParseError("No credentials found".into()))?,
        };

        let channel = match (&entry.channel, &entry.url) {
            (Some(ch), _) => IbmChannel::parse(ch),
            (None, Some(url)) if url.contains("cloud.ibm.com") => IbmChannel::IbmCloud,
            _ => IbmChannel::IbmQuantum,
        };

        let mut creds = Self::new(entry.token.clone()).with_channel(channel);
        creds.instance = entry.instance.clone();
        Ok(creds)
    }

    /// Set instance (hub/group/project or CRN)
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Set channel
    pub fn with_channel(mut self, channel: IbmChannel) -> Self {
        self.channel = channel;
        self
    }

    /// Set service CRN (required by IBM Cloud)
    pub fn with_crn(mut self, crn: impl Into<String>) -> Self {
        self.service_crn = Some(crn.into());
        self
    }

    /// API token
    pub fn token(&self) -> &str {
        &self.api_token
    }

    /// Instance
    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    /// Channel
    pub fn channel(&self) -> IbmChannel {
        self.channel
    }

    /// Service CRN
    pub fn service_crn(&self) -> Option<&str> {
        self.service_crn.as_deref()
    }

    /// Token type
    pub fn token_type(&self) -> TokenType {
        self.token_type
    }

    /// Check basic token shape
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.api_token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        if self.api_token.len() < 32 {
            return Err(AuthError::InvalidTokenFormat);
        }
        Ok(())
    }

    /// Authorization header value, exchanging API keys for IAM tokens
    pub async fn authorization(&self) -> Result<String, AuthError> {
        match self.token_type {
            TokenType::IqpToken => Ok(format!("Bearer {}", self.api_token)),
            TokenType::ApiKey => {
                let access_token = self.exchange_api_key().await?;
                Ok(format!("Bearer {}", access_token))
            }
        }
    }

    async fn exchange_api_key(&self) -> Result<String, AuthError> {
        let api_key = self
            .api_token
            .strip_prefix("ApiKey-")
            .or_else(|| self.api_token.strip_prefix("apikey-"))
            .unwrap_or(&self.api_token);

        let params = [
            ("grant_type", "urn:ibm:params:oauth:grant-type:apikey"),
            ("apikey", api_key),
        ];

        let response = reqwest::Client::new()
            .post(IAM_TOKEN_URL)
            .header("Accept", "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::HttpError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::IamTokenExchangeFailed(format!(
                "HTTP {}: {}",
                status, body
            )));
        }

        let token: IamTokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::IamTokenExchangeFailed(e.to_string()))?;

        log::debug!("IAM token obtained, expires in {}s", token.expires_in);
        Ok(token.access_token)
    }
}

impl std::fmt::Debug for IbmCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IbmCredentials")
            .field("token_type", &self.token_type)
            .field("instance", &self.instance)
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}
