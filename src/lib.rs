//! Single-contract deployer library.

pub mod artifacts;
pub mod blockchain;
pub mod config;
pub mod deploy;
pub mod lifecycle;
pub mod network;
pub mod observability;
pub mod resilience;

pub use artifacts::{ArtifactSource, DeployableArtifact, HardhatArtifacts};
pub use blockchain::{DeploymentNetwork, RpcNetwork};
pub use config::DeployerConfig;
pub use deploy::{DeployError, DeployResult, Deployer, DeploymentResult, DeploymentState};
pub use network::{CredentialSource, NetworkProfile, NetworkResolver};
