//! Deployment outcome types and error definitions.

use std::fmt;

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

/// Why a submitted deployment did not reach confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationFailure {
    /// The creation transaction was mined but execution reverted.
    Reverted,
    /// The node no longer knows the transaction.
    Dropped,
    /// No confirmation arrived within the configured bound.
    TimedOut { secs: u64 },
    /// Confirmation polling failed at the RPC level.
    Rpc(String),
}

impl fmt::Display for ConfirmationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reverted => write!(f, "transaction reverted"),
            Self::Dropped => write!(f, "transaction dropped from the mempool"),
            Self::TimedOut { secs } => write!(f, "timed out after {} seconds", secs),
            Self::Rpc(e) => write!(f, "RPC error: {}", e),
        }
    }
}

/// Errors that can end a deployment attempt.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Missing or invalid credentials or network parameters.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The contract name is unknown to the artifact source.
    #[error("Artifact not found: no compiled contract named '{name}' in {searched}")]
    ArtifactNotFound { name: String, searched: String },

    /// Key parsing, gas pricing or gas estimation failed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// The RPC node rejected the transaction or could not be reached.
    #[error("Submission error: {0}")]
    Submission(String),

    /// The transaction was submitted but not confirmed.
    #[error("Confirmation error for transaction {tx_hash}: {reason}")]
    Confirmation {
        tx_hash: TxHash,
        reason: ConfirmationFailure,
    },
}

impl DeployError {
    /// Whether the step may be repeated without on-chain side effects.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Submission(_))
    }

    /// Transaction hash attached to the error, if the failure happened after submission.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::Confirmation { tx_hash, .. } => Some(*tx_hash),
            _ => None,
        }
    }
}

/// Result type for deployment operations.
pub type DeployResult<T> = Result<T, DeployError>;

/// A confirmed contract deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentResult {
    pub contract_name: String,
    pub address: Address,
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub confirmed: bool,
}

impl fmt::Display for DeploymentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} deployed to: {}", self.contract_name, self.address)
    }
}

/// Progress of a single deployment attempt.
///
/// ```text
/// Pending → Broadcasting → Submitted → Confirmed
///    │           │             └──────→ Failed
///    │           └────────────────────→ Failed
///    └────────────────────────────────→ Failed
/// ```
///
/// `Broadcasting` is entered once the transaction is signed and handed to the
/// node; from then on it may be mined even if the node never answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentState {
    Pending,
    Broadcasting { tx_hash: TxHash, address: Address },
    Submitted { tx_hash: TxHash, address: Address },
    Confirmed { tx_hash: TxHash, address: Address, block_number: u64 },
    Failed { tx_hash: Option<TxHash>, reason: String },
}

impl DeploymentState {
    /// The transaction hash once one has been broadcast.
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            Self::Pending => None,
            Self::Broadcasting { tx_hash, .. }
            | Self::Submitted { tx_hash, .. }
            | Self::Confirmed { tx_hash, .. } => Some(*tx_hash),
            Self::Failed { tx_hash, .. } => *tx_hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeployError::Confirmation {
            tx_hash: TxHash::repeat_byte(0xab),
            reason: ConfirmationFailure::TimedOut { secs: 300 },
        };
        let text = err.to_string();
        assert!(text.contains("0xabab"));
        assert!(text.contains("timed out after 300 seconds"));

        let err = DeployError::ArtifactNotFound {
            name: "Missing".into(),
            searched: "artifacts".into(),
        };
        assert!(err.to_string().contains("'Missing'"));
    }

    #[test]
    fn test_only_submission_is_retryable() {
        assert!(DeployError::Submission("nonce too low".into()).is_retryable());
        assert!(!DeployError::Signing("bad key".into()).is_retryable());
        assert!(!DeployError::Confirmation {
            tx_hash: TxHash::ZERO,
            reason: ConfirmationFailure::Dropped,
        }
        .is_retryable());
    }

    #[test]
    fn test_report_line() {
        let result = DeploymentResult {
            contract_name: "DelayedExecutor".into(),
            address: Address::repeat_byte(0x11),
            transaction_hash: TxHash::ZERO,
            block_number: 7,
            confirmed: true,
        };
        assert_eq!(
            result.to_string(),
            format!("DelayedExecutor deployed to: {}", Address::repeat_byte(0x11))
        );
    }

    #[test]
    fn test_state_tx_hash() {
        let hash = TxHash::repeat_byte(1);
        assert_eq!(DeploymentState::Pending.tx_hash(), None);
        let broadcasting = DeploymentState::Broadcasting { tx_hash: hash, address: Address::ZERO };
        assert_eq!(broadcasting.tx_hash(), Some(hash));
        let submitted = DeploymentState::Submitted { tx_hash: hash, address: Address::ZERO };
        assert_eq!(submitted.tx_hash(), Some(hash));
    }
}
