//! Shared building blocks for the microwave queue workspace
//!
//! Holds what both front ends need but the queue core should not own:
//! process identity for logging, configuration sources and the common error type.

pub mod config;
pub mod errors;
pub mod logging;
pub mod types;

pub use config::{ConfigOverrides, QueueConfig, DEFAULT_DELAY_MS, DEFAULT_ROSTER};
pub use errors::*;
pub use types::*;
