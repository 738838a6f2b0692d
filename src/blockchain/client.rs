//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to JSON-RPC endpoint
//! - Query chain state (chain id, nonce, balance, gas price, receipts)
//! - Estimate gas and broadcast signed transactions
//! - Bound every call with the configured timeout

use std::fmt::Display;
use std::future::IntoFuture;
use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use tokio::time::timeout;
use url::Url;

use crate::blockchain::types::{BlockchainError, BlockchainResult};

/// Blockchain RPC client wrapper.
#[derive(Clone)]
pub struct BlockchainClient {
    provider: DynProvider,
    rpc_url: Url,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a client for `rpc_url`. No request is made until first use.
    pub fn new(rpc_url: Url, rpc_timeout: Duration) -> Self {
        let provider = ProviderBuilder::new().connect_http(rpc_url.clone()).erased();
        Self::with_provider(provider, rpc_url, rpc_timeout)
    }

    /// Wrap an already built provider; `rpc_url` is only used for reporting.
    pub fn with_provider(provider: DynProvider, rpc_url: Url, rpc_timeout: Duration) -> Self {
        Self {
            provider,
            rpc_url,
            timeout_duration: rpc_timeout,
        }
    }

    async fn call<T, E, F>(&self, method: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::debug!(method, error = %e, "RPC error");
                Err(BlockchainError::Rpc(format!("{} failed: {}", method, e)))
            }
            Err(_) => {
                tracing::debug!(method, "RPC timeout");
                Err(BlockchainError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }

    /// Verify the connected chain ID matches `expected`.
    pub async fn verify_chain_id(&self, expected: u64) -> BlockchainResult<()> {
        let actual = self.get_chain_id().await?;
        if actual != expected {
            return Err(BlockchainError::ChainMismatch { expected, actual });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<u64> {
        self.call("eth_chainId", self.provider.get_chain_id()).await
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.call("eth_blockNumber", self.provider.get_block_number()).await
    }

    /// Get the balance of an address.
    pub async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        self.call("eth_getBalance", self.provider.get_balance(address)).await
    }

    /// Get the transaction count (nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        self.call(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address),
        )
        .await
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> BlockchainResult<u128> {
        self.call("eth_gasPrice", self.provider.get_gas_price()).await
    }

    /// Estimate gas for an unsigned transaction.
    pub async fn estimate_gas(&self, tx: TransactionRequest) -> BlockchainResult<u64> {
        self.call("eth_estimateGas", self.provider.estimate_gas(tx))
            .await
            .map_err(|e| match e {
                BlockchainError::Rpc(msg) => BlockchainError::GasEstimation(msg),
                other => other,
            })
    }

    /// Broadcast an encoded signed transaction, returning its hash.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> BlockchainResult<TxHash> {
        let pending = self
            .call("eth_sendRawTransaction", self.provider.send_raw_transaction(raw))
            .await?;
        Ok(*pending.tx_hash())
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.call(
            "eth_getTransactionReceipt",
            self.provider.get_transaction_receipt(tx_hash),
        )
        .await
    }

    /// Whether the node still knows the transaction (pending or mined).
    pub async fn is_transaction_known(&self, tx_hash: TxHash) -> BlockchainResult<bool> {
        let tx = self
            .call(
                "eth_getTransactionByHash",
                self.provider.get_transaction_by_hash(tx_hash),
            )
            .await?;
        Ok(tx.is_some())
    }

    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.rpc_url.as_str())
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}

/// Clients backed by alloy's mocked transport, answering from a queue.
#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use alloy::providers::mock::Asserter;

    pub(crate) fn mocked_client(asserter: Asserter) -> BlockchainClient {
        let provider = ProviderBuilder::new()
            .connect_mocked_client(asserter)
            .erased();
        BlockchainClient::with_provider(
            provider,
            "http://mocked.invalid".parse().unwrap(),
            Duration::from_secs(5),
        )
    }

    /// JSON-RPC shaped legacy receipt.
    pub(crate) fn receipt_json(
        tx_hash: TxHash,
        block_number: u64,
        success: bool,
        contract_address: Option<Address>,
    ) -> serde_json::Value {
        serde_json::json!({
            "transactionHash": tx_hash,
            "transactionIndex": "0x0",
            "blockHash": TxHash::repeat_byte(0xbb),
            "blockNumber": format!("{:#x}", block_number),
            "from": Address::repeat_byte(0xf3),
            "to": null,
            "contractAddress": contract_address,
            "cumulativeGasUsed": "0x5208",
            "effectiveGasPrice": "0x3b9aca00",
            "gasUsed": "0x5208",
            "logs": [],
            "logsBloom": format!("0x{}", "0".repeat(512)),
            "status": if success { "0x1" } else { "0x0" },
            "type": "0x0"
        })
    }
}
