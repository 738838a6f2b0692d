//! Hardhat artifact directory lookup.
//!
//! Layout: `<root>/<sourceName>/<ContractName>.json`, e.g.
//! `artifacts/contracts/DelayedExecutor.sol/DelayedExecutor.json`.
//! Names may be bare (`DelayedExecutor`) or fully qualified
//! (`contracts/DelayedExecutor.sol:DelayedExecutor`).

use std::fs;
use std::path::{Path, PathBuf};

use alloy::hex;
use alloy::json_abi::JsonAbi;
use alloy::primitives::Bytes;
use async_trait::async_trait;
use serde::Deserialize;

use crate::artifacts::{ArtifactSource, DeployableArtifact};
use crate::deploy::types::{DeployError, DeployResult};

const BUILD_INFO_DIR: &str = "build-info";
const DEBUG_SUFFIX: &str = ".dbg.json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardhatArtifact {
    contract_name: String,
    source_name: String,
    abi: JsonAbi,
    bytecode: String,
}

/// Artifact source backed by a Hardhat `artifacts/` directory.
#[derive(Debug, Clone)]
pub struct HardhatArtifacts {
    root: PathBuf,
}

impl HardhatArtifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn not_found(&self, name: &str) -> DeployError {
        DeployError::ArtifactNotFound {
            name: name.to_string(),
            searched: self.root.display().to_string(),
        }
    }

    /// Find candidate artifact files for `name`.
    fn locate(&self, name: &str) -> DeployResult<Vec<PathBuf>> {
        if let Some((source, contract)) = name.rsplit_once(':') {
            if source.is_empty() || contract.is_empty() || source.contains("..") {
                return Err(self.not_found(name));
            }
            let path = self.root.join(source).join(format!("{}.json", contract));
            return Ok(if path.is_file() { vec![path] } else { Vec::new() });
        }

        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(self.not_found(name));
        }

        let file_name = format!("{}.json", name);
        let mut found = Vec::new();
        collect_matching(&self.root, &file_name, &mut found).map_err(|e| {
            DeployError::Configuration(format!(
                "cannot read artifacts directory {}: {}",
                self.root.display(),
                e
            ))
        })?;
        found.sort();
        Ok(found)
    }

    fn load(&self, name: &str, path: &Path) -> DeployResult<DeployableArtifact> {
        let invalid = |reason: String| {
            DeployError::Configuration(format!(
                "artifact {} for '{}' is unusable: {}",
                path.display(),
                name,
                reason
            ))
        };

        let content = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let artifact: HardhatArtifact =
            serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;

        let bytecode = decode_bytecode(&artifact.bytecode).map_err(invalid)?;

        if let Some(constructor) = &artifact.abi.constructor {
            if !constructor.inputs.is_empty() {
                return Err(invalid(format!(
                    "constructor takes {} argument(s); only argument-free constructors are supported",
                    constructor.inputs.len()
                )));
            }
        }

        tracing::debug!(
            contract = %artifact.contract_name,
            source = %artifact.source_name,
            bytecode_len = bytecode.len(),
            "Loaded artifact"
        );

        Ok(DeployableArtifact {
            contract_name: artifact.contract_name,
            source_name: artifact.source_name,
            abi: artifact.abi,
            bytecode,
        })
    }
}

#[async_trait]
impl ArtifactSource for HardhatArtifacts {
    async fn resolve_artifact(&self, name: &str) -> DeployResult<DeployableArtifact> {
        let candidates = self.locate(name)?;
        match candidates.as_slice() {
            [] => Err(self.not_found(name)),
            [path] => self.load(name, path),
            many => Err(DeployError::Configuration(format!(
                "contract name '{}' is ambiguous, found {}; use a fully qualified name such as 'contracts/{}.sol:{}'",
                name,
                many.iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
                name,
                name
            ))),
        }
    }
}

fn collect_matching(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> std::io::Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            if entry.file_name() == BUILD_INFO_DIR {
                continue;
            }
            collect_matching(&path, file_name, found)?;
        } else if entry.file_name() == file_name && !file_name.ends_with(DEBUG_SUFFIX) {
            found.push(path);
        }
    }
    Ok(())
}

fn decode_bytecode(raw: &str) -> Result<Bytes, String> {
    let trimmed = raw.trim();
    let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if body.contains("__$") {
        return Err("bytecode has unlinked library references".to_string());
    }
    if body.is_empty() {
        return Err("bytecode is empty (interface or abstract contract)".to_string());
    }
    hex::decode(body)
        .map(Bytes::from)
        .map_err(|e| format!("invalid bytecode hex: {}", e))
}
