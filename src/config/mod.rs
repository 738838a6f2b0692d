//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! deployer.toml (optional)
//!     → loader.rs (parse & deserialize, or built-in defaults)
//!     → validation.rs (semantic checks)
//!     → DeployerConfig (validated, immutable)
//!     → NetworkResolver / Deployer / RpcNetwork
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Key material never lives in the file, only the env var names

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{ArtifactsConfig, DeployerConfig, DeploymentConfig, NetworkConfig, ObservabilityConfig};
pub use validation::ValidationError;
