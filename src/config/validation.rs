//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (active network names an existing profile)
//! - Validate value ranges (timeouts > 0, chain id non-zero)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DeployerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::DeployerConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("network profile name must not be empty")]
    EmptyNetworkName,

    #[error("network profile '{0}' is defined more than once")]
    DuplicateNetwork(String),

    #[error("network '{0}' has an empty RPC url")]
    EmptyRpcUrl(String),

    #[error("network '{0}' has chain_id 0")]
    ZeroChainId(String),

    #[error("network '{0}' lists no credential variables in accounts_env")]
    NoAccounts(String),

    #[error("active network '{0}' is not defined")]
    UnknownActiveNetwork(String),

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),

    #[error("gas_price_multiplier must be a finite number of at least 1.0, got {0}")]
    InvalidGasMultiplier(String),

    #[error("artifacts path must not be empty")]
    EmptyArtifactsPath,
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &DeployerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for network in &config.networks {
        if network.name.trim().is_empty() {
            errors.push(ValidationError::EmptyNetworkName);
            continue;
        }
        if !seen.insert(network.name.as_str()) {
            errors.push(ValidationError::DuplicateNetwork(network.name.clone()));
        }
        if network.url.trim().is_empty() {
            errors.push(ValidationError::EmptyRpcUrl(network.name.clone()));
        }
        if network.chain_id == 0 {
            errors.push(ValidationError::ZeroChainId(network.name.clone()));
        }
        if network.accounts_env.is_empty() {
            errors.push(ValidationError::NoAccounts(network.name.clone()));
        }
    }

    if config.find_network(&config.network).is_none() {
        errors.push(ValidationError::UnknownActiveNetwork(config.network.clone()));
    }

    let deployment = &config.deployment;
    let positive = [
        ("rpc_timeout_secs", deployment.rpc_timeout_secs),
        ("confirmation_timeout_secs", deployment.confirmation_timeout_secs),
        ("confirmation_blocks", u64::from(deployment.confirmation_blocks)),
        ("poll_interval_ms", deployment.poll_interval_ms),
        ("dropped_after_polls", u64::from(deployment.dropped_after_polls)),
        ("max_gas_price_gwei", deployment.max_gas_price_gwei),
    ];
    for (field, value) in positive {
        if value == 0 {
            errors.push(ValidationError::ZeroValue(field));
        }
    }

    let multiplier = deployment.gas_price_multiplier;
    if !multiplier.is_finite() || multiplier < 1.0 {
        errors.push(ValidationError::InvalidGasMultiplier(
            deployment.gas_price_multiplier.to_string(),
        ));
    }

    if config.artifacts.path.trim().is_empty() {
        errors.push(ValidationError::EmptyArtifactsPath);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
