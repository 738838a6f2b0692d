//! Shared test doubles for deployment flow tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use alloy::json_abi::JsonAbi;
use alloy::primitives::{keccak256, Address, Bytes, TxHash};
use async_trait::async_trait;

use contract_deployer::blockchain::{ConfirmationOutcome, PreparedDeployment, SubmittedDeployment};
use contract_deployer::config::{DeployerConfig, NetworkConfig};
use contract_deployer::{
    ArtifactSource, CredentialSource, DeployError, DeployResult, DeployableArtifact,
    DeploymentNetwork, NetworkProfile, NetworkResolver,
};

/// Anvil's first account.
pub const TEST_PRIVATE_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// Configuration with a single "testnet" profile on chain 10143.
pub fn testnet_config() -> DeployerConfig {
    let mut config = DeployerConfig::default();
    config.network = "testnet".to_string();
    config.networks = vec![NetworkConfig {
        name: "testnet".to_string(),
        url: "https://testnet-rpc.monad.xyz".to_string(),
        chain_id: 10143,
        accounts_env: vec!["PRIVATE_KEY".to_string()],
    }];
    config
}

pub fn testnet_profile() -> NetworkProfile {
    NetworkResolver::new(
        &testnet_config(),
        CredentialSource::from_pairs([("PRIVATE_KEY", TEST_PRIVATE_KEY)]),
    )
    .resolve_active_profile()
    .expect("testnet profile resolves")
}

/// Artifact catalog keyed by contract name.
pub struct FakeArtifacts {
    known: HashMap<String, DeployableArtifact>,
    resolves: Arc<AtomicU32>,
}

impl FakeArtifacts {
    pub fn with(names: &[&str]) -> Self {
        let known = names
            .iter()
            .map(|name| {
                let artifact = DeployableArtifact {
                    contract_name: name.to_string(),
                    source_name: format!("contracts/{}.sol", name),
                    abi: JsonAbi::default(),
                    bytecode: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52]),
                };
                (name.to_string(), artifact)
            })
            .collect();
        Self {
            known,
            resolves: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn resolve_counter(&self) -> Arc<AtomicU32> {
        self.resolves.clone()
    }
}

#[async_trait]
impl ArtifactSource for FakeArtifacts {
    async fn resolve_artifact(&self, name: &str) -> DeployResult<DeployableArtifact> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        self.known
            .get(name)
            .cloned()
            .ok_or_else(|| DeployError::ArtifactNotFound {
                name: name.to_string(),
                searched: "fake catalog".to_string(),
            })
    }
}

/// What the fake chain does with submitted transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behaviour {
    Confirm,
    Revert,
    Drop,
    /// Never answers.
    Hang,
}

/// Counters observable after the network moves into a `Deployer`.
#[derive(Debug, Clone, Default)]
pub struct Probe {
    pub prepares: Arc<AtomicU32>,
    pub submissions: Arc<AtomicU32>,
    pub last_tx_hash: Arc<Mutex<Option<TxHash>>>,
}

impl Probe {
    pub fn prepares(&self) -> u32 {
        self.prepares.load(Ordering::SeqCst)
    }

    pub fn submissions(&self) -> u32 {
        self.submissions.load(Ordering::SeqCst)
    }

    pub fn last_tx_hash(&self) -> Option<TxHash> {
        *self.last_tx_hash.lock().unwrap()
    }
}

/// In-memory chain that derives addresses from (sender, nonce) like CREATE.
pub struct FakeNetwork {
    sender: Address,
    nonce: AtomicU64,
    behaviour: Behaviour,
    reject_first: u32,
    stall_submit: bool,
    block: AtomicU64,
    probe: Probe,
}

impl FakeNetwork {
    pub fn new(behaviour: Behaviour) -> Self {
        Self {
            sender: Address::repeat_byte(0xf3),
            nonce: AtomicU64::new(0),
            behaviour,
            reject_first: 0,
            stall_submit: false,
            block: AtomicU64::new(100),
            probe: Probe::default(),
        }
    }

    /// Reject the first `n` submissions with an RPC-level error.
    pub fn rejecting_first(mut self, n: u32) -> Self {
        self.reject_first = n;
        self
    }

    /// Accept submissions but never answer, like a node that hangs mid-broadcast.
    pub fn stalling_submit(mut self) -> Self {
        self.stall_submit = true;
        self
    }

    pub fn probe(&self) -> Probe {
        self.probe.clone()
    }
}

#[async_trait]
impl DeploymentNetwork for FakeNetwork {
    async fn prepare(
        &self,
        artifact: &DeployableArtifact,
        profile: &NetworkProfile,
    ) -> DeployResult<PreparedDeployment> {
        self.probe.prepares.fetch_add(1, Ordering::SeqCst);
        if profile.credentials.primary().is_none() {
            return Err(DeployError::Signing("no key".into()));
        }

        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        let mut preimage = self.sender.to_vec();
        preimage.extend_from_slice(&nonce.to_be_bytes());
        preimage.extend_from_slice(&artifact.bytecode);

        Ok(PreparedDeployment {
            from: self.sender,
            nonce,
            predicted_address: self.sender.create(nonce),
            gas_limit: 120_000,
            gas_price: 1_000_000_000,
            tx_hash: keccak256(&preimage),
            raw: Bytes::from(preimage),
        })
    }

    async fn submit(&self, prepared: &PreparedDeployment) -> DeployResult<SubmittedDeployment> {
        let attempt = self.probe.submissions.fetch_add(1, Ordering::SeqCst);
        if attempt < self.reject_first {
            return Err(DeployError::Submission("connection reset by peer".into()));
        }
        if self.stall_submit {
            return std::future::pending().await;
        }
        *self.probe.last_tx_hash.lock().unwrap() = Some(prepared.tx_hash);
        Ok(SubmittedDeployment {
            tx_hash: prepared.tx_hash,
            address: prepared.predicted_address,
        })
    }

    async fn await_confirmation(&self, _tx_hash: TxHash) -> DeployResult<ConfirmationOutcome> {
        let block_number = self.block.fetch_add(1, Ordering::SeqCst);
        match self.behaviour {
            Behaviour::Confirm => Ok(ConfirmationOutcome::Confirmed {
                block_number,
                contract_address: None,
            }),
            Behaviour::Revert => Ok(ConfirmationOutcome::Reverted { block_number }),
            Behaviour::Drop => Ok(ConfirmationOutcome::Dropped),
            Behaviour::Hang => std::future::pending().await,
        }
    }
}
