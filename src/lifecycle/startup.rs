//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve the active profile before any artifact or network work
//! - Connect the network collaborator only once a profile exists
//! - Run one deployment, racing it against an interrupt
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The interrupt source is injected so the race is testable

use std::future::Future;

use crate::artifacts::ArtifactSource;
use crate::blockchain::DeploymentNetwork;
use crate::config::DeploymentConfig;
use crate::deploy::Deployer;
use crate::lifecycle::exit::RunOutcome;
use crate::network::{NetworkProfile, NetworkResolver};

/// Resolve the active profile, connect, then deploy `contract_name`.
///
/// `connect` is only called after the profile resolved, so a missing
/// credential never reaches the artifact source or the network.
pub async fn run<A, N, C, F>(
    resolver: &NetworkResolver,
    settings: &DeploymentConfig,
    contract_name: &str,
    artifacts: A,
    connect: C,
    interrupt: F,
) -> RunOutcome
where
    A: ArtifactSource,
    N: DeploymentNetwork,
    C: FnOnce(&NetworkProfile, &DeploymentConfig) -> N,
    F: Future<Output = ()>,
{
    let profile = match resolver.resolve_active_profile() {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(network = %resolver.active_name(), error = %e, "Network resolution failed");
            return RunOutcome::Failed(e);
        }
    };

    tracing::info!(
        network = %profile.name,
        rpc_url = %profile.rpc_url,
        chain_id = profile.chain_id,
        contract = %contract_name,
        "Network profile resolved"
    );

    let network = connect(&profile, settings);
    let deployer = Deployer::from_config(artifacts, network, settings);

    run_until_interrupted(&deployer, contract_name, &profile, interrupt).await
}

/// Deploy `contract_name`, stopping early if `interrupt` resolves first.
pub async fn run_until_interrupted<A, N, F>(
    deployer: &Deployer<A, N>,
    contract_name: &str,
    profile: &NetworkProfile,
    interrupt: F,
) -> RunOutcome
where
    A: ArtifactSource,
    N: DeploymentNetwork,
    F: Future<Output = ()>,
{
    tokio::select! {
        result = deployer.deploy(contract_name, profile) => RunOutcome::from(result),
        _ = interrupt => {
            let state = deployer.state();
            tracing::warn!(state = ?state, "Deployment interrupted");
            RunOutcome::Interrupted(state)
        }
    }
}
