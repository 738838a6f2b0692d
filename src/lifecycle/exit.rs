//! Process outcome reporting and exit codes.

use std::io::{self, Write};

use crate::deploy::types::{DeployError, DeploymentResult, DeploymentState};

pub const EXIT_OK: u8 = 0;
pub const EXIT_CONFIGURATION: u8 = 2;
pub const EXIT_ARTIFACT_NOT_FOUND: u8 = 3;
pub const EXIT_SIGNING: u8 = 4;
pub const EXIT_SUBMISSION: u8 = 5;
pub const EXIT_CONFIRMATION: u8 = 6;
/// 128 + SIGINT, as shells report it.
pub const EXIT_INTERRUPTED: u8 = 130;

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    Deployed(DeploymentResult),
    Failed(DeployError),
    /// Interrupted; carries the last observed deployment state.
    Interrupted(DeploymentState),
}

impl From<Result<DeploymentResult, DeployError>> for RunOutcome {
    fn from(result: Result<DeploymentResult, DeployError>) -> Self {
        match result {
            Ok(deployment) => Self::Deployed(deployment),
            Err(e) => Self::Failed(e),
        }
    }
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Deployed(_) => EXIT_OK,
            Self::Failed(e) => error_exit_code(e),
            Self::Interrupted(_) => EXIT_INTERRUPTED,
        }
    }

    /// Write the user-facing report: the address on `out`, anything else on `err`.
    pub fn report(&self, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
        match self {
            Self::Deployed(deployment) => writeln!(out, "{}", deployment),
            Self::Failed(e) => {
                writeln!(err, "Error: {}", e)?;
                if let DeployError::Confirmation { tx_hash, .. } = e {
                    writeln!(
                        err,
                        "The transaction {} was broadcast; inspect it on a block explorer before redeploying.",
                        tx_hash
                    )?;
                }
                Ok(())
            }
            Self::Interrupted(state) => report_interrupted(state, err),
        }
    }
}

fn report_interrupted(state: &DeploymentState, err: &mut impl Write) -> io::Result<()> {
    match state {
        DeploymentState::Pending => {
            writeln!(err, "Interrupted before any transaction was submitted.")
        }
        DeploymentState::Broadcasting { tx_hash, address } => writeln!(
            err,
            "Interrupted while broadcasting. Transaction {} may have reached the node \
             and may still be mined; the contract would appear at {}.",
            tx_hash, address
        ),
        DeploymentState::Submitted { tx_hash, address } => writeln!(
            err,
            "Interrupted while awaiting confirmation. Transaction {} was already submitted \
             and may still be mined; the contract would appear at {}.",
            tx_hash, address
        ),
        DeploymentState::Confirmed { address, .. } => {
            writeln!(err, "Interrupted after confirmation; contract is at {}.", address)
        }
        DeploymentState::Failed { tx_hash, reason } => {
            writeln!(err, "Interrupted after failure: {}", reason)?;
            if let Some(tx_hash) = tx_hash {
                writeln!(err, "Transaction {} may still be mined.", tx_hash)?;
            }
            Ok(())
        }
    }
}

/// Exit code for each error class.
pub fn error_exit_code(err: &DeployError) -> u8 {
    match err {
        DeployError::Configuration(_) => EXIT_CONFIGURATION,
        DeployError::ArtifactNotFound { .. } => EXIT_ARTIFACT_NOT_FOUND,
        DeployError::Signing(_) => EXIT_SIGNING,
        DeployError::Submission(_) => EXIT_SUBMISSION,
        DeployError::Confirmation { .. } => EXIT_CONFIRMATION,
    }
}
