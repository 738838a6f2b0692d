//! Active network profile resolution.
//!
//! The resolver never touches the process environment itself. Credential
//! variables are captured once into a [`CredentialSource`] at startup and
//! handed in alongside the configuration.

use std::collections::HashMap;

use crate::config::schema::{DeployerConfig, NetworkConfig};
use crate::deploy::types::{DeployError, DeployResult};
use crate::network::profile::{Credentials, NetworkProfile, SigningKey};

/// Snapshot of the variables that may carry signing keys.
#[derive(Clone, Default)]
pub struct CredentialSource {
    vars: HashMap<String, String>,
}

impl CredentialSource {
    /// Capture the current process environment.
    pub fn from_env() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Build a source from explicit name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSource")
            .field("vars", &self.vars.len())
            .finish()
    }
}

/// Supplies the signing/network context for a deployment.
#[derive(Debug, Clone)]
pub struct NetworkResolver {
    active: String,
    networks: Vec<NetworkConfig>,
    credentials: CredentialSource,
}

impl NetworkResolver {
    pub fn new(config: &DeployerConfig, credentials: CredentialSource) -> Self {
        Self {
            active: config.network.clone(),
            networks: config.networks.clone(),
            credentials,
        }
    }

    /// Select a different profile than the configured default.
    pub fn with_active(mut self, name: impl Into<String>) -> Self {
        self.active = name.into();
        self
    }

    /// Name of the profile that will be resolved.
    pub fn active_name(&self) -> &str {
        &self.active
    }

    /// Resolve the active profile, including its key material.
    pub fn resolve_active_profile(&self) -> DeployResult<NetworkProfile> {
        let network = self
            .networks
            .iter()
            .find(|n| n.name == self.active)
            .ok_or_else(|| {
                DeployError::Configuration(format!(
                    "network '{}' is not defined (known: {})",
                    self.active,
                    self.known_names()
                ))
            })?;

        let rpc_url = network.url.parse().map_err(|e| {
            DeployError::Configuration(format!(
                "network '{}' has invalid RPC url '{}': {}",
                network.name, network.url, e
            ))
        })?;

        if network.chain_id == 0 {
            return Err(DeployError::Configuration(format!(
                "network '{}' has chain_id 0",
                network.name
            )));
        }

        let credentials = self.load_credentials(network)?;

        tracing::debug!(
            network = %network.name,
            chain_id = network.chain_id,
            accounts = credentials.len(),
            "Resolved network profile"
        );

        Ok(NetworkProfile {
            name: network.name.clone(),
            rpc_url,
            chain_id: network.chain_id,
            credentials,
        })
    }

    fn load_credentials(&self, network: &NetworkConfig) -> DeployResult<Credentials> {
        if network.accounts_env.is_empty() {
            return Err(DeployError::Configuration(format!(
                "network '{}' has no accounts configured",
                network.name
            )));
        }

        let mut keys = Vec::with_capacity(network.accounts_env.len());
        for var in &network.accounts_env {
            let value = self
                .credentials
                .get(var)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| {
                    DeployError::Configuration(format!(
                        "environment variable {} is not set or empty (required by network '{}')",
                        var, network.name
                    ))
                })?;
            keys.push(SigningKey::new(value));
        }

        Ok(Credentials::new(keys))
    }

    fn known_names(&self) -> String {
        self.networks
            .iter()
            .map(|n| n.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
