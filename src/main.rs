//! contract-deployer
//!
//! Deploys one compiled contract to a configured network and prints the
//! address it landed at.
//!
//! # Architecture Overview
//!
//! ```text
//!   deployer.toml / defaults      PRIVATE_KEY (env)
//!            │                          │
//!            ▼                          ▼
//!   ┌──────────────┐          ┌──────────────────┐
//!   │    config    │─────────▶│ network resolver │──▶ NetworkProfile
//!   └──────────────┘          └──────────────────┘          │
//!                                                           ▼
//!   ┌──────────────┐          ┌──────────────────┐   ┌─────────────┐
//!   │  artifacts   │─────────▶│     Deployer     │◀──│ blockchain  │
//!   │  (Hardhat)   │          │ resolve → sign → │   │ (JSON-RPC)  │
//!   └──────────────┘          │ submit → confirm │   └─────────────┘
//!                             └────────┬─────────┘
//!                                      ▼
//!                         stdout: "<Name> deployed to: 0x…"
//!                         stderr: errors, logs
//!                         exit code: 0 / 2..6 / 130
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use contract_deployer::config::{self, DeployerConfig};
use contract_deployer::lifecycle::exit::EXIT_CONFIGURATION;
use contract_deployer::lifecycle::{self, signals, RunOutcome};
use contract_deployer::observability::init_logging;
use contract_deployer::{CredentialSource, HardhatArtifacts, NetworkResolver, RpcNetwork};

#[derive(Parser, Debug)]
#[command(name = "contract-deployer", version)]
#[command(about = "Deploy a compiled contract and report its address", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in defaults are used when omitted.
    #[arg(short, long, env = "DEPLOYER_CONFIG")]
    config: Option<PathBuf>,

    /// Network profile to deploy to, overriding the configured one.
    #[arg(short, long, env = "DEPLOYER_NETWORK")]
    network: Option<String>,

    /// Contract to deploy (bare or fully qualified name).
    #[arg(long)]
    contract: Option<String>,

    /// Hardhat artifacts directory.
    #[arg(long)]
    artifacts: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Configuration error: {}", e);
            return ExitCode::from(EXIT_CONFIGURATION);
        }
    };

    init_logging(&config.observability);
    tracing::info!("contract-deployer v{} starting", env!("CARGO_PKG_VERSION"));

    let outcome = run(cli, config).await;

    let reported = outcome.report(&mut io::stdout().lock(), &mut io::stderr().lock());
    if let Err(e) = reported.and_then(|_| io::stdout().flush()) {
        tracing::error!(error = %e, "Failed to write report");
        return ExitCode::FAILURE;
    }

    ExitCode::from(outcome.exit_code())
}

async fn run(cli: Cli, config: DeployerConfig) -> RunOutcome {
    let mut resolver = NetworkResolver::new(&config, CredentialSource::from_env());
    if let Some(network) = cli.network {
        resolver = resolver.with_active(network);
    }

    let contract = cli
        .contract
        .unwrap_or_else(|| config.deployment.contract.clone());
    let artifacts = HardhatArtifacts::new(
        cli.artifacts
            .unwrap_or_else(|| PathBuf::from(&config.artifacts.path)),
    );

    tracing::info!(
        network = %resolver.active_name(),
        contract = %contract,
        artifacts = %artifacts.root().display(),
        "Configuration loaded"
    );

    lifecycle::run(
        &resolver,
        &config.deployment,
        &contract,
        artifacts,
        RpcNetwork::connect,
        signals::interrupted(),
    )
    .await
}
