//! Compiled contract artifacts.
//!
//! Compilation happens elsewhere (Hardhat, solc). This subsystem only reads
//! the output and turns a contract name into deployable bytecode.

pub mod hardhat;

use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use async_trait::async_trait;

use crate::deploy::types::DeployResult;

pub use hardhat::HardhatArtifacts;

/// Bytecode and ABI for one contract.
#[derive(Debug, Clone)]
pub struct DeployableArtifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

/// Resolves contract names to deployable artifacts.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Look up a contract by name.
    ///
    /// Returns [`DeployError::ArtifactNotFound`](crate::DeployError::ArtifactNotFound)
    /// for unknown names.
    async fn resolve_artifact(&self, name: &str) -> DeployResult<DeployableArtifact>;
}
