//! Deploy-and-confirm sequence for one contract.
//!
//! ```text
//! resolve artifact ─→ prepare (sign) ─→ submit ─→ await confirmation
//!   ArtifactNotFound    Signing          Submission   Confirmation
//! ```
//!
//! Each step either hands its output to the next or ends the attempt with
//! its own error class. Nothing is retried after submission.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::timeout;
use tracing::Instrument;
use uuid::Uuid;

use crate::artifacts::ArtifactSource;
use crate::blockchain::{ConfirmationOutcome, DeploymentNetwork};
use crate::config::DeploymentConfig;
use crate::deploy::types::{
    ConfirmationFailure, DeployError, DeployResult, DeploymentResult, DeploymentState,
};
use crate::network::NetworkProfile;
use crate::resilience::RetryPolicy;

/// Orchestrates a single contract deployment against one network.
pub struct Deployer<A, N> {
    artifacts: A,
    network: N,
    confirmation_timeout: Duration,
    retry: RetryPolicy,
    state: watch::Sender<DeploymentState>,
}

impl<A, N> Deployer<A, N>
where
    A: ArtifactSource,
    N: DeploymentNetwork,
{
    /// Create a deployer with default settings (no retries, 300s confirmation bound).
    pub fn new(artifacts: A, network: N) -> Self {
        Self::from_config(artifacts, network, &DeploymentConfig::default())
    }

    pub fn from_config(artifacts: A, network: N, config: &DeploymentConfig) -> Self {
        let (state, _) = watch::channel(DeploymentState::Pending);
        Self {
            artifacts,
            network,
            confirmation_timeout: Duration::from_secs(config.confirmation_timeout_secs),
            retry: RetryPolicy::from_config(config),
            state,
        }
    }

    pub fn with_confirmation_timeout(mut self, confirmation_timeout: Duration) -> Self {
        self.confirmation_timeout = confirmation_timeout;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Observe progress of the current attempt.
    pub fn subscribe(&self) -> watch::Receiver<DeploymentState> {
        self.state.subscribe()
    }

    /// Latest state of the current (or last) attempt.
    pub fn state(&self) -> DeploymentState {
        self.state.borrow().clone()
    }

    /// Deploy `contract_name` to the network described by `profile`.
    ///
    /// Every call creates a new contract instance. If the caller drops this
    /// future after the state reached `Broadcasting`, the transaction may still
    /// be mined.
    pub async fn deploy(
        &self,
        contract_name: &str,
        profile: &NetworkProfile,
    ) -> DeployResult<DeploymentResult> {
        let span = tracing::info_span!(
            "deploy",
            run_id = %Uuid::new_v4(),
            contract = %contract_name,
            network = %profile.name,
            chain_id = profile.chain_id,
        );

        async {
            self.state.send_replace(DeploymentState::Pending);

            let result = self.attempt(contract_name, profile).await;
            match &result {
                Ok(deployment) => {
                    tracing::info!(
                        address = %deployment.address,
                        tx_hash = %deployment.transaction_hash,
                        block_number = deployment.block_number,
                        "Deployment confirmed"
                    );
                }
                Err(e) => {
                    let tx_hash = e.tx_hash().or_else(|| self.state.borrow().tx_hash());
                    tracing::error!(error = %e, "Deployment failed");
                    self.state.send_replace(DeploymentState::Failed {
                        tx_hash,
                        reason: e.to_string(),
                    });
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn attempt(
        &self,
        contract_name: &str,
        profile: &NetworkProfile,
    ) -> DeployResult<DeploymentResult> {
        if profile.credentials.is_empty() {
            return Err(DeployError::Configuration(format!(
                "network '{}' has no signing credentials",
                profile.name
            )));
        }

        let artifact = self.artifacts.resolve_artifact(contract_name).await?;
        tracing::info!(
            source = %artifact.source_name,
            bytecode_len = artifact.bytecode.len(),
            "Artifact resolved"
        );

        let prepared = self.network.prepare(&artifact, profile).await?;
        self.state.send_replace(DeploymentState::Broadcasting {
            tx_hash: prepared.tx_hash,
            address: prepared.predicted_address,
        });

        let submitted = self
            .retry
            .run("submit", || self.network.submit(&prepared))
            .await?;
        self.state.send_replace(DeploymentState::Submitted {
            tx_hash: submitted.tx_hash,
            address: submitted.address,
        });
        tracing::info!(
            tx_hash = %submitted.tx_hash,
            predicted_address = %submitted.address,
            timeout_secs = self.confirmation_timeout.as_secs(),
            "Deployment transaction submitted, awaiting confirmation"
        );

        let tx_hash = submitted.tx_hash;
        let outcome = timeout(
            self.confirmation_timeout,
            self.network.await_confirmation(tx_hash),
        )
        .await
        .map_err(|_| DeployError::Confirmation {
            tx_hash,
            reason: ConfirmationFailure::TimedOut {
                secs: self.confirmation_timeout.as_secs(),
            },
        })??;

        match outcome {
            ConfirmationOutcome::Confirmed {
                block_number,
                contract_address,
            } => {
                let address = match contract_address {
                    Some(reported) if reported != submitted.address => {
                        tracing::warn!(
                            predicted = %submitted.address,
                            reported = %reported,
                            "Receipt address differs from predicted address"
                        );
                        reported
                    }
                    Some(reported) => reported,
                    None => submitted.address,
                };

                self.state.send_replace(DeploymentState::Confirmed {
                    tx_hash,
                    address,
                    block_number,
                });

                Ok(DeploymentResult {
                    contract_name: artifact.contract_name,
                    address,
                    transaction_hash: tx_hash,
                    block_number,
                    confirmed: true,
                })
            }
            ConfirmationOutcome::Reverted { block_number } => {
                tracing::warn!(tx_hash = %tx_hash, block_number, "Deployment reverted");
                Err(DeployError::Confirmation {
                    tx_hash,
                    reason: ConfirmationFailure::Reverted,
                })
            }
            ConfirmationOutcome::Dropped => Err(DeployError::Confirmation {
                tx_hash,
                reason: ConfirmationFailure::Dropped,
            }),
        }
    }
}
