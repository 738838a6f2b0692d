//! JSON-RPC implementation of [`DeploymentNetwork`].

use std::time::Duration;

use alloy::primitives::TxHash;
use async_trait::async_trait;

use crate::artifacts::DeployableArtifact;
use crate::blockchain::client::BlockchainClient;
use crate::blockchain::transaction::TxBuilder;
use crate::blockchain::types::{
    BlockchainError, ConfirmationOutcome, PreparedDeployment, SubmittedDeployment,
};
use crate::blockchain::wallet::Wallet;
use crate::blockchain::DeploymentNetwork;
use crate::config::DeploymentConfig;
use crate::deploy::types::{ConfirmationFailure, DeployError, DeployResult};
use crate::network::NetworkProfile;

/// Deploys through the profile's RPC endpoint, signing locally.
#[derive(Debug, Clone)]
pub struct RpcNetwork {
    client: BlockchainClient,
    settings: DeploymentConfig,
}

impl RpcNetwork {
    /// Set up a client for the profile's endpoint. Makes no RPC calls.
    pub fn connect(profile: &NetworkProfile, settings: &DeploymentConfig) -> Self {
        let client = BlockchainClient::new(
            profile.rpc_url.clone(),
            Duration::from_secs(settings.rpc_timeout_secs),
        );
        Self::with_client(client, settings)
    }

    pub fn with_client(client: BlockchainClient, settings: &DeploymentConfig) -> Self {
        Self {
            client,
            settings: settings.clone(),
        }
    }

    /// Whether `tx_hash` was mined or sits in the node's mempool.
    async fn reached_network(&self, tx_hash: TxHash) -> bool {
        match self.client.get_transaction_receipt(tx_hash).await {
            Ok(Some(_)) => return true,
            Ok(None) => {}
            Err(e) => tracing::debug!(tx_hash = %tx_hash, error = %e, "Receipt lookup failed"),
        }
        match self.client.is_transaction_known(tx_hash).await {
            Ok(known) => known,
            Err(e) => {
                tracing::debug!(tx_hash = %tx_hash, error = %e, "Mempool lookup failed");
                false
            }
        }
    }

    fn tx_builder(&self) -> TxBuilder<'_> {
        TxBuilder::new(&self.client, &self.settings)
    }
}

#[async_trait]
impl DeploymentNetwork for RpcNetwork {
    async fn prepare(
        &self,
        artifact: &DeployableArtifact,
        profile: &NetworkProfile,
    ) -> DeployResult<PreparedDeployment> {
        let wallet = Wallet::from_credentials(&profile.credentials, profile.chain_id)?;
        self.client.verify_chain_id(profile.chain_id).await?;

        let prepared = self
            .tx_builder()
            .build_deployment(&wallet, artifact.bytecode.clone())
            .await?;
        Ok(prepared)
    }

    async fn submit(&self, prepared: &PreparedDeployment) -> DeployResult<SubmittedDeployment> {
        let tx_hash = match self.client.send_raw_transaction(&prepared.raw).await {
            Ok(hash) => hash,
            // A resubmission of a transaction the node already accepted.
            Err(e) if is_already_known(&e.to_string()) => {
                tracing::info!(tx_hash = %prepared.tx_hash, "Transaction already known to node");
                prepared.tx_hash
            }
            // A timed-out send may have landed; "nonce too low" may mean an
            // earlier attempt of this same transaction was mined.
            Err(e) if is_uncertain(&e) => {
                if !self.reached_network(prepared.tx_hash).await {
                    return Err(DeployError::Submission(format!(
                        "broadcast of transaction {} was not acknowledged: {}",
                        prepared.tx_hash, e
                    )));
                }
                tracing::info!(tx_hash = %prepared.tx_hash, error = %e, "Earlier broadcast reached the network");
                prepared.tx_hash
            }
            Err(e) => return Err(DeployError::Submission(e.to_string())),
        };

        if tx_hash != prepared.tx_hash {
            tracing::warn!(
                expected = %prepared.tx_hash,
                returned = %tx_hash,
                "Node returned an unexpected transaction hash"
            );
        }

        Ok(SubmittedDeployment {
            tx_hash,
            address: prepared.predicted_address,
        })
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> DeployResult<ConfirmationOutcome> {
        self.tx_builder()
            .wait_for_confirmation(tx_hash)
            .await
            .map_err(|e| DeployError::Confirmation {
                tx_hash,
                reason: ConfirmationFailure::Rpc(e.to_string()),
            })
    }
}

fn is_uncertain(err: &BlockchainError) -> bool {
    match err {
        BlockchainError::Timeout(_) => true,
        other => other.to_string().to_ascii_lowercase().contains("nonce too low"),
    }
}

fn is_already_known(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("already known") || message.contains("known transaction")
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::blockchain::client::mock::{mocked_client, receipt_json};
    use crate::network::{Credentials, SigningKey};
    use alloy::json_abi::JsonAbi;
    use alloy::primitives::{Address, Bytes};
    use alloy::providers::mock::Asserter;

    fn prepared() -> PreparedDeployment {
        PreparedDeployment {
            from: Address::repeat_byte(0xf3),
            nonce: 4,
            predicted_address: Address::repeat_byte(0xf3).create(4),
            gas_limit: 120_000,
            gas_price: 1_000_000_000,
            tx_hash: TxHash::repeat_byte(0x77),
            raw: Bytes::from_static(&[0xf8, 0x00]),
        }
    }

    fn mocked_network(asserter: &Asserter) -> RpcNetwork {
        RpcNetwork::with_client(mocked_client(asserter.clone()), &DeploymentConfig::default())
    }

    fn profile(key: &str) -> NetworkProfile {
        NetworkProfile {
            name: "local".into(),
            rpc_url: "http://127.0.0.1:1".parse().unwrap(),
            chain_id: 31337,
            credentials: Credentials::new(vec![SigningKey::new(key)]),
        }
    }

    fn artifact() -> DeployableArtifact {
        DeployableArtifact {
            contract_name: "DelayedExecutor".into(),
            source_name: "contracts/DelayedExecutor.sol".into(),
            abi: JsonAbi::default(),
            bytecode: Bytes::from_static(&[0x60, 0x80]),
        }
    }

    #[tokio::test]
    async fn test_invalid_key_is_signing_error() {
        let profile = profile("not-a-key");
        let network = RpcNetwork::connect(&profile, &DeploymentConfig::default());
        let err = network.prepare(&artifact(), &profile).await.unwrap_err();
        assert!(matches!(err, DeployError::Signing(_)));
    }

    #[tokio::test]
    async fn test_unreachable_rpc_is_submission_error() {
        let profile = profile("ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80");
        let network = RpcNetwork::connect(&profile, &DeploymentConfig::default());
        let err = network.prepare(&artifact(), &profile).await.unwrap_err();
        assert!(matches!(err, DeployError::Submission(_)));
    }

    #[test]
    fn test_already_known_detection() {
        assert!(is_already_known(
            "eth_sendRawTransaction failed: server returned an error response: error code -32000: already known"
        ));
        assert!(is_already_known("Known transaction: 0xabc"));
        assert!(!is_already_known("nonce too low"));
    }

    #[test]
    fn test_uncertain_broadcast_errors() {
        assert!(is_uncertain(&BlockchainError::Timeout(30)));
        assert!(is_uncertain(&BlockchainError::Rpc(
            "eth_sendRawTransaction failed: nonce too low: next nonce 5, tx nonce 4".into()
        )));
        assert!(!is_uncertain(&BlockchainError::Rpc("insufficient funds".into())));
    }

    #[tokio::test]
    async fn test_nonce_too_low_for_mined_transaction_is_success() {
        let asserter = Asserter::new();
        let network = mocked_network(&asserter);
        let prepared = prepared();

        asserter.push_failure_msg("nonce too low");
        asserter.push_success(&receipt_json(prepared.tx_hash, 9, true, None));

        let submitted = network.submit(&prepared).await.unwrap();
        assert_eq!(submitted.tx_hash, prepared.tx_hash);
        assert_eq!(submitted.address, prepared.predicted_address);
    }

    #[tokio::test]
    async fn test_unacknowledged_broadcast_reports_hash() {
        let asserter = Asserter::new();
        let network = mocked_network(&asserter);
        let prepared = prepared();

        asserter.push_failure_msg("nonce too low");
        asserter.push_success(&serde_json::Value::Null);
        asserter.push_success(&serde_json::Value::Null);

        let err = network.submit(&prepared).await.unwrap_err();
        assert!(matches!(err, DeployError::Submission(_)));
        assert!(err.to_string().contains(&prepared.tx_hash.to_string()));
    }

    #[tokio::test]
    async fn test_already_known_resubmission_is_success() {
        let asserter = Asserter::new();
        let network = mocked_network(&asserter);
        let prepared = prepared();

        asserter.push_failure_msg("already known");

        let submitted = network.submit(&prepared).await.unwrap();
        assert_eq!(submitted.tx_hash, prepared.tx_hash);
    }
}
