//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! NetworkProfile (RPC url, chain id, keys)
//!     → wallet.rs (key loading, signing)
//!     → client.rs (RPC connection with timeouts)
//!     → transaction.rs (build, sign, confirm)
//!     → rpc.rs (DeploymentNetwork over JSON-RPC)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod rpc;
pub mod transaction;
pub mod types;
pub mod wallet;

use alloy::primitives::TxHash;
use async_trait::async_trait;

use crate::artifacts::DeployableArtifact;
use crate::deploy::types::DeployResult;
use crate::network::NetworkProfile;

pub use client::BlockchainClient;
pub use rpc::RpcNetwork;
pub use types::{
    BlockchainError, ConfirmationOutcome, PreparedDeployment, SubmittedDeployment,
};
pub use wallet::Wallet;

/// Network and signing capabilities used by the deployer.
#[async_trait]
pub trait DeploymentNetwork: Send + Sync {
    /// Bind an artifact to the profile's signer, producing a signed creation
    /// transaction. Fails with `Signing` on key, gas-price or gas-estimation
    /// problems.
    async fn prepare(
        &self,
        artifact: &DeployableArtifact,
        profile: &NetworkProfile,
    ) -> DeployResult<PreparedDeployment>;

    /// Broadcast a prepared transaction. Fails with `Submission` on RPC
    /// rejection. Resubmitting the same prepared transaction is idempotent.
    async fn submit(&self, prepared: &PreparedDeployment) -> DeployResult<SubmittedDeployment>;

    /// Wait until the transaction is confirmed, reverted or dropped.
    async fn await_confirmation(&self, tx_hash: TxHash) -> DeployResult<ConfirmationOutcome>;
}
