//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Deployment step:
//!     → timeouts (confirmation wait bounded in deploy::orchestrator,
//!       each RPC call bounded in blockchain::client)
//!     → On submission failure: retries.rs (retry with backoff.rs)
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - Retries only before anything can be on-chain (submission)
//! - Jittered backoff

pub mod backoff;
pub mod retries;

pub use retries::RetryPolicy;
