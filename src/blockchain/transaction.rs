//! Creation transaction building, signing, and confirmation monitoring.
//!
//! # Responsibilities
//! - Build creation transactions with gas estimation and price limits
//! - Sign and encode them for broadcast
//! - Monitor receipts until confirmed, reverted or dropped

use std::time::Duration;

use alloy::eips::eip2718::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Bytes, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use tokio::time::interval;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{
    BlockchainError, BlockchainResult, ConfirmationOutcome, PreparedDeployment,
};
use crate::blockchain::wallet::Wallet;
use crate::config::DeploymentConfig;

const WEI_PER_GWEI: u128 = 1_000_000_000;

/// Builds and monitors deployment transactions for one signer.
pub struct TxBuilder<'a> {
    client: &'a BlockchainClient,
    settings: &'a DeploymentConfig,
}

impl<'a> TxBuilder<'a> {
    pub fn new(client: &'a BlockchainClient, settings: &'a DeploymentConfig) -> Self {
        Self { client, settings }
    }

    /// Build and sign a creation transaction for `bytecode`.
    pub async fn build_deployment(
        &self,
        wallet: &Wallet,
        bytecode: Bytes,
    ) -> BlockchainResult<PreparedDeployment> {
        let from = wallet.address();
        let nonce = self.client.get_transaction_count(from).await?;
        let gas_price = self.gas_price().await?;

        let unsigned = TransactionRequest::default()
            .with_from(from)
            .with_deploy_code(bytecode)
            .with_chain_id(wallet.chain_id());

        let estimated = self.client.estimate_gas(unsigned.clone()).await?;
        let gas_limit = apply_buffer(estimated, self.settings.gas_limit_buffer_percent);

        let required = U256::from(gas_limit) * U256::from(gas_price);
        let balance = self.client.get_balance(from).await?;
        if balance < required {
            return Err(BlockchainError::InsufficientFunds {
                address: from,
                balance: balance.to_string(),
                required: required.to_string(),
            });
        }

        let envelope = wallet
            .sign_transaction(
                unsigned
                    .with_nonce(nonce)
                    .with_gas_price(gas_price)
                    .with_gas_limit(gas_limit),
            )
            .await?;

        let prepared = PreparedDeployment {
            from,
            nonce,
            predicted_address: from.create(nonce),
            gas_limit,
            gas_price,
            tx_hash: *envelope.tx_hash(),
            raw: Bytes::from(envelope.encoded_2718()),
        };

        tracing::debug!(
            from = %prepared.from,
            nonce = prepared.nonce,
            gas_limit = prepared.gas_limit,
            estimated_gas = estimated,
            gas_price_gwei = prepared.gas_price / WEI_PER_GWEI,
            "Deployment transaction signed"
        );

        Ok(prepared)
    }

    /// Current gas price with the configured multiplier, capped by the maximum.
    async fn gas_price(&self) -> BlockchainResult<u128> {
        let quoted = self.client.get_gas_price().await?;
        adjusted_gas_price(
            quoted,
            self.settings.gas_price_multiplier,
            self.settings.max_gas_price_gwei,
        )
    }

    /// Poll until the transaction is confirmed, reverted or dropped.
    ///
    /// There is no deadline here; callers bound the wait.
    pub async fn wait_for_confirmation(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<ConfirmationOutcome> {
        let required = u64::from(self.settings.confirmation_blocks.max(1));
        let patience = self.settings.dropped_after_polls.max(1);
        let mut ticker = interval(Duration::from_millis(self.settings.poll_interval_ms));
        let mut unseen_polls = 0u32;
        let mut failed_polls = 0u32;

        loop {
            ticker.tick().await;

            let receipt = match self.client.get_transaction_receipt(tx_hash).await {
                Ok(receipt) => {
                    failed_polls = 0;
                    receipt
                }
                Err(e) => {
                    failed_polls += 1;
                    tracing::warn!(tx_hash = %tx_hash, error = %e, attempt = failed_polls, "Receipt poll failed");
                    if failed_polls >= patience {
                        return Err(e);
                    }
                    continue;
                }
            };

            let Some(receipt) = receipt else {
                match self.client.is_transaction_known(tx_hash).await {
                    Ok(true) => unseen_polls = 0,
                    Ok(false) => unseen_polls += 1,
                    Err(e) => tracing::debug!(tx_hash = %tx_hash, error = %e, "Mempool lookup failed"),
                }
                if unseen_polls >= patience {
                    return Ok(ConfirmationOutcome::Dropped);
                }
                tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                continue;
            };

            let Some(tx_block) = receipt.block_number else {
                continue;
            };

            if !receipt.status() {
                return Ok(ConfirmationOutcome::Reverted {
                    block_number: tx_block,
                });
            }

            let confirmations = if required > 1 {
                match self.client.get_block_number().await {
                    Ok(head) => head.saturating_sub(tx_block) + 1,
                    Err(e) => {
                        tracing::debug!(error = %e, "Block number lookup failed");
                        continue;
                    }
                }
            } else {
                1
            };

            if confirmations >= required {
                return Ok(ConfirmationOutcome::Confirmed {
                    block_number: tx_block,
                    contract_address: receipt.contract_address,
                });
            }

            tracing::debug!(
                tx_hash = %tx_hash,
                confirmations = confirmations,
                required = required,
                "Waiting for confirmations"
            );
        }
    }
}

/// Apply `multiplier` to the node's quote and reject results above `max_gwei`.
///
/// The cap applies to the price that will be signed, not to the quote.
pub fn adjusted_gas_price(quoted: u128, multiplier: f64, max_gwei: u64) -> BlockchainResult<u128> {
    let adjusted = quoted as f64 * multiplier;
    let max_wei = u128::from(max_gwei) * WEI_PER_GWEI;

    if !adjusted.is_finite() || adjusted > max_wei as f64 {
        let current_gwei = if adjusted.is_finite() {
            (adjusted / WEI_PER_GWEI as f64) as u64
        } else {
            u64::MAX
        };
        return Err(BlockchainError::GasPriceTooHigh {
            current_gwei,
            max_gwei,
        });
    }

    Ok(adjusted as u128)
}

/// Add `percent` on top of an estimate.
pub fn apply_buffer(estimate: u64, percent: u64) -> u64 {
    estimate.saturating_add(estimate.saturating_mul(percent) / 100)
}
