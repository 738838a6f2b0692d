//! Chain-specific types and error definitions.

use alloy::primitives::{Address, Bytes, TxHash};
use thiserror::Error;

use crate::deploy::types::DeployError;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Invalid private key format or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// The node refused to estimate gas for the creation transaction.
    #[error("Gas estimation failed: {0}")]
    GasEstimation(String),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// The signer cannot pay for the deployment.
    #[error("Insufficient funds: {address} holds {balance} wei, deployment needs up to {required} wei")]
    InsufficientFunds {
        address: Address,
        balance: String,
        required: String,
    },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

impl From<BlockchainError> for DeployError {
    fn from(err: BlockchainError) -> Self {
        match err {
            BlockchainError::Rpc(_) | BlockchainError::Timeout(_) => {
                DeployError::Submission(err.to_string())
            }
            BlockchainError::Wallet(_)
            | BlockchainError::GasEstimation(_)
            | BlockchainError::GasPriceTooHigh { .. }
            | BlockchainError::InsufficientFunds { .. } => DeployError::Signing(err.to_string()),
            BlockchainError::ChainMismatch { .. } => DeployError::Configuration(err.to_string()),
        }
    }
}

/// A signed creation transaction, ready to broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedDeployment {
    pub from: Address,
    pub nonce: u64,
    /// CREATE address derived from `(from, nonce)`.
    pub predicted_address: Address,
    pub gas_limit: u64,
    pub gas_price: u128,
    pub tx_hash: TxHash,
    /// EIP-2718 encoded signed transaction.
    pub raw: Bytes,
}

/// A broadcast creation transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmittedDeployment {
    pub tx_hash: TxHash,
    pub address: Address,
}

/// Final status of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// Included with enough block depth.
    Confirmed {
        block_number: u64,
        /// `contractAddress` reported by the receipt, when present.
        contract_address: Option<Address>,
    },
    /// Mined, but execution failed.
    Reverted { block_number: u64 },
    /// No longer known to the node.
    Dropped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BlockchainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = BlockchainError::GasPriceTooHigh {
            current_gwei: 600,
            max_gwei: 500,
        };
        assert!(err.to_string().contains("600"));
    }

    #[test]
    fn test_deploy_error_mapping() {
        let err: DeployError = BlockchainError::Rpc("connection refused".into()).into();
        assert!(matches!(err, DeployError::Submission(_)));

        let err: DeployError = BlockchainError::GasEstimation("execution reverted".into()).into();
        assert!(matches!(err, DeployError::Signing(_)));

        let err: DeployError = BlockchainError::Wallet("bad key".into()).into();
        assert!(matches!(err, DeployError::Signing(_)));

        let err: DeployError = BlockchainError::ChainMismatch {
            expected: 10143,
            actual: 1,
        }
        .into();
        assert!(matches!(err, DeployError::Configuration(_)));
    }
}
