//! Network configuration resolution.
//!
//! # Data Flow
//! ```text
//! DeployerConfig (profiles, active name)
//!   + CredentialSource (env snapshot taken once at startup)
//!     → resolver.rs (select profile, validate url/chain, load keys)
//!     → NetworkProfile (read-only for the rest of the run)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data

pub mod profile;
pub mod resolver;

pub use profile::{Credentials, NetworkProfile, SigningKey};
pub use resolver::{CredentialSource, NetworkResolver};
