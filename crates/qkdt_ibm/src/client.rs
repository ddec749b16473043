//! IBM Quantum REST API client
//!
//! Gantree: L2_Ibm → Client
//!
//! Read-only subset of the API: device listing and device configuration.

use crate::auth::{AuthError, IbmCredentials};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API error response
    #[error("API error ({code}): {message}")]
    ApiError {
        /// HTTP status code
        code: u16,
        /// Error message
        message: String,
    },

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after}s")]
    RateLimited {
        /// Seconds to wait before retry
        retry_after: u64,
    },

    /// Service unavailable
    #[error("Service temporarily unavailable")]
    ServiceUnavailable,
}

/// IBM Quantum API client
pub struct IbmClient {
    client: reqwest::Client,
    base_url: String,
}

impl IbmClient {
    /// Create a client; API keys are exchanged for an IAM token here
    pub async fn connect(credentials: &IbmCredentials, timeout: Duration) -> Result<Self, ClientError> {
        credentials.validate()?;

        let authorization = credentials.authorization().await?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&authorization).map_err(|_| AuthError::InvalidTokenFormat)?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("qkdt-ibm/0.1.0 (Rust; QKD Device Testbed)"),
        );
        headers.insert(
            HeaderName::from_static("ibm-api-version"),
            HeaderValue::from_static("2025-01-01"),
        );
        if let Some(crn) = credentials.service_crn().or(credentials.instance()) {
            headers.insert(
                HeaderName::from_static("service-crn"),
                HeaderValue::from_str(crn).map_err(|_| AuthError::InvalidTokenFormat)?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: credentials.channel().api_url(),
        })
    }

    /// GET a JSON document
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let body = self.get_text(path).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_text(&self, path: &str) -> Result<String, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.text().await?);
        }

        match status.as_u16() {
            401 | 403 => Err(ClientError::Auth(AuthError::AuthFailed(
                "Invalid or expired token".to_string(),
            ))),
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60);
                Err(ClientError::RateLimited { retry_after })
            }
            503 => Err(ClientError::ServiceUnavailable),
            code => Err(ClientError::ApiError {
                code,
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }

    // ========================================================================
    // Device APIs
    // ========================================================================

    /// List devices visible to the credentials, in service order
    pub async fn list_devices(&self) -> Result<Vec<DeviceSummary>, ClientError> {
        let body = self.get_text("/backends").await?;
        parse_device_list(&body)
    }

    /// Get device configuration
    pub async fn get_configuration(&self, name: &str) -> Result<DeviceConfiguration, ClientError> {
        self.get(&format!("/backends/{}/configuration", name)).await
    }

    /// Base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Parse the device listing in any of the formats the service has used:
/// `{"devices": [...]}` (2025), `{"backends": [...]}` (legacy) or a bare array.
pub fn parse_device_list(body: &str) -> Result<Vec<DeviceSummary>, ClientError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Listing {
        Devices { devices: Vec<DeviceSummary> },
        Backends { backends: Vec<DeviceSummary> },
        Bare(Vec<DeviceSummary>),
    }

    match serde_json::from_str::<Listing>(body) {
        Ok(Listing::Devices { devices }) => Ok(devices),
        Ok(Listing::Backends { backends }) => Ok(backends),
        Ok(Listing::Bare(list)) => Ok(list),
        Err(_) => {
            log::warn!(
                "Unexpected backends response format: {}",
                preview(body, BODY_PREVIEW_CHARS)
            );
            Err(ClientError::ApiError {
                code: 500,
                message: "Unknown response format from backends API".to_string(),
            })
        }
    }
}

/// Characters of an unparsable body echoed to the log
const BODY_PREVIEW_CHARS: usize = 200;

/// First `max_chars` characters of `body`, cut on a char boundary
fn preview(body: &str, max_chars: usize) -> &str {
    match body.char_indices().nth(max_chars) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// One entry of the device listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSummary {
    /// Device name
    #[serde(alias = "backend_name")]
    pub name: String,

    /// Qubit count
    #[serde(default, alias = "n_qubits", alias = "num_qubits")]
    pub qubits: Option<usize>,

    /// Simulator flag
    #[serde(default)]
    pub simulator: bool,
}

/// Device configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceConfiguration {
    /// Number of qubits
    pub n_qubits: Option<usize>,

    /// Basis gates
    #[serde(default)]
    pub basis_gates: Option<Vec<String>>,

    /// Coupling map as qubit pairs
    #[serde(default)]
    pub coupling_map: Option<Vec<Vec<usize>>>,

    /// Quantum volume
    #[serde(default)]
    pub quantum_volume: Option<u64>,
}

impl DeviceConfiguration {
    /// Coupling map as (control, target) pairs, skipping malformed entries
    pub fn coupling_pairs(&self) -> Option<Vec<(usize, usize)>> {
        self.coupling_map.as_ref().map(|cm| {
            cm.iter()
                .filter_map(|pair| match pair.as_slice() {
                    [a, b, ..] => Some((*a, *b)),
                    _ => None,
                })
                .collect()
        })
    }
}
