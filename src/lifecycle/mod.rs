//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Resolve profile → Connect network → Deploy (raced against signals)
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → stop waiting, report in-flight transaction
//!
//! Exit (exit.rs):
//!     RunOutcome → stdout/stderr report → process exit code
//! ```

pub mod exit;
pub mod signals;
pub mod startup;

pub use exit::RunOutcome;
pub use startup::{run, run_until_interrupted};
