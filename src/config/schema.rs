//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the deployer.
//! All types derive `Deserialize` for loading from TOML files.

use serde::Deserialize;

/// Default network profile, matching the Monad testnet endpoint.
pub const DEFAULT_NETWORK: &str = "monadTestnet";

/// Default environment variable holding the signing key.
pub const DEFAULT_ACCOUNTS_ENV: &str = "PRIVATE_KEY";

/// Default contract deployed when none is named on the command line.
pub const DEFAULT_CONTRACT: &str = "DelayedExecutor";

/// Root configuration for the deployer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeployerConfig {
    /// Name of the active network profile.
    pub network: String,

    /// Named network profiles.
    pub networks: Vec<NetworkConfig>,

    /// Where compiled artifacts are looked up.
    pub artifacts: ArtifactsConfig,

    /// Deployment and confirmation settings.
    pub deployment: DeploymentConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for DeployerConfig {
    fn default() -> Self {
        Self {
            network: DEFAULT_NETWORK.to_string(),
            networks: vec![NetworkConfig::default()],
            artifacts: ArtifactsConfig::default(),
            deployment: DeploymentConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl DeployerConfig {
    /// Look up a network profile by name.
    pub fn find_network(&self, name: &str) -> Option<&NetworkConfig> {
        self.networks.iter().find(|n| n.name == name)
    }
}

/// A named network profile.
///
/// Key material is never stored here, only the names of the environment
/// variables that carry it.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Unique profile name (e.g., "monadTestnet").
    pub name: String,

    /// JSON-RPC endpoint URL.
    pub url: String,

    /// Chain ID (e.g., 10143 for Monad testnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// Environment variables holding signing keys, in signing order.
    #[serde(default = "default_accounts_env")]
    pub accounts_env: Vec<String>,
}

fn default_accounts_env() -> Vec<String> {
    vec![DEFAULT_ACCOUNTS_ENV.to_string()]
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NETWORK.to_string(),
            url: "https://testnet-rpc.monad.xyz".to_string(),
            chain_id: 10143,
            accounts_env: default_accounts_env(),
        }
    }
}

/// Artifact lookup configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Root of the Hardhat-style artifacts directory.
    pub path: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            path: "artifacts".to_string(),
        }
    }
}

/// Deployment transaction and confirmation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    /// Contract deployed when none is given on the command line.
    pub contract: String,

    /// Per-call RPC timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Upper bound on the whole confirmation wait, in seconds.
    pub confirmation_timeout_secs: u64,

    /// Blocks (including the inclusion block) required for confirmation.
    pub confirmation_blocks: u32,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Consecutive polls in which the node no longer knows the
    /// transaction before it is reported as dropped.
    pub dropped_after_polls: u32,

    /// Gas price multiplier (1.0 = node estimate, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,

    /// Extra gas added on top of the estimate, in percent.
    pub gas_limit_buffer_percent: u64,

    /// Resubmission attempts after an RPC-level rejection. Zero disables.
    pub submission_retries: u32,

    /// Base delay for submission retry backoff, in milliseconds.
    pub retry_base_delay_ms: u64,

    /// Maximum delay for submission retry backoff, in milliseconds.
    pub retry_max_delay_ms: u64,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            contract: DEFAULT_CONTRACT.to_string(),
            rpc_timeout_secs: 30,
            confirmation_timeout_secs: 300,
            confirmation_blocks: 1,
            poll_interval_ms: 2_000,
            dropped_after_polls: 15,
            gas_price_multiplier: 1.0,
            max_gas_price_gwei: 500,
            gas_limit_buffer_percent: 20,
            submission_retries: 0,
            retry_base_delay_ms: 500,
            retry_max_delay_ms: 10_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
