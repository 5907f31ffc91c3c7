//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → logging.rs (EnvFilter + fmt layer on stderr)
//! ```
//!
//! # Design Decisions
//! - Structured fields (block ids, attempts, exit codes), never key material
//! - stdout carries only the command result

pub mod logging;

pub use logging::init_logging;
