//! Deployment orchestration.
//!
//! # Data Flow
//! ```text
//! contract name + NetworkProfile
//!     → ArtifactSource (bytecode)
//!     → DeploymentNetwork::prepare (signed creation tx)
//!     → DeploymentNetwork::submit (tx hash, predicted address)
//!     → DeploymentNetwork::await_confirmation (bounded by timeout)
//!     → DeploymentResult
//! ```
//!
//! Progress is published as [`DeploymentState`] so the process boundary can
//! tell whether a transaction was already broadcast when it is interrupted.

pub mod orchestrator;
pub mod types;

pub use orchestrator::Deployer;
pub use types::{
    ConfirmationFailure, DeployError, DeployResult, DeploymentResult, DeploymentState,
};
