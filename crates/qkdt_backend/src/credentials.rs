//! Credential resolution
//!
//! Gantree: L1_Backend → Credentials
//!
//! Priority order:
//! 1. Explicit credential passed by the caller
//! 2. Environment variables (first non-empty match)
//! 3. Saved account of the directory (see [`BackendProvider::stored_credential`])
//!
//! [`BackendProvider::stored_credential`]: crate::provider::BackendProvider::stored_credential

use crate::provider::DirectoryError;
use qkdt_core::backend::CREDENTIAL_ENV_VARS;
use std::fmt;
use std::sync::Arc;

/// Where a credential came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Passed explicitly by the caller
    Explicit,
    /// Read from the named environment variable
    Environment(String),
    /// Loaded from a saved account (file path or store name)
    Stored(String),
}

/// Directory credential (API token or key)
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    source: CredentialSource,
}

impl Credential {
    /// Credential passed by the caller
    pub fn explicit(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            source: CredentialSource::Explicit,
        }
    }

    /// Credential read from an environment variable
    pub fn from_environment(token: impl Into<String>, var: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            source: CredentialSource::Environment(var.into()),
        }
    }

    /// Credential loaded from a saved account
    pub fn stored(token: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            source: CredentialSource::Stored(origin.into()),
        }
    }

    /// Raw token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Source of the token
    pub fn source(&self) -> &CredentialSource {
        &self.source
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible: String = self.token.chars().take(4).collect();
        f.debug_struct("Credential")
            .field("token", &format!("{}…", visible))
            .field("source", &self.source)
            .finish()
    }
}

type EnvLookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Resolves the credential for one locate call
/// Gantree: CredentialResolver // 자격 증명 해석
#[derive(Clone)]
pub struct CredentialResolver {
    env_vars: Vec<String>,
    lookup: Arc<EnvLookup>,
}

impl CredentialResolver {
    /// Resolver over the process environment and the default variables
    pub fn new() -> Self {
        Self {
            env_vars: CREDENTIAL_ENV_VARS.iter().map(|s| s.to_string()).collect(),
            lookup: Arc::new(|key| std::env::var(key).ok()),
        }
    }

    /// Replace the searched variable names
    pub fn with_env_vars<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env_vars = vars.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the environment lookup (tests, sandboxed hosts)
    pub fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.lookup = Arc::new(lookup);
        self
    }

    /// Resolver that never consults any environment
    pub fn explicit_only() -> Self {
        Self::new().with_lookup(|_| None)
    }

    /// Searched variable names
    pub fn env_vars(&self) -> &[String] {
        &self.env_vars
    }

    /// Resolve a credential. Blank values count as absent.
    pub fn resolve(&self, explicit: Option<&str>) -> Result<Credential, DirectoryError> {
        if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
            return Ok(Credential::explicit(token));
        }

        self.env_vars
            .iter()
            .find_map(|var| {
                (self.lookup)(var)
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .map(|token| Credential::from_environment(token, var.clone()))
            })
            .ok_or(DirectoryError::CredentialMissing)
    }
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CredentialResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialResolver")
            .field("env_vars", &self.env_vars)
            .finish_non_exhaustive()
    }
}
