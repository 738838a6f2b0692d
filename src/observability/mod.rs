//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → the `deploy` span (run id, contract, network, chain id)
//!
//! Consumers:
//!     → stderr via tracing-subscriber fmt layer
//! ```

pub mod logging;

pub use logging::init_logging;
