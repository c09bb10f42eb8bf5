//! ToyStand common library
//!
//! This crate contains shared code used across ToyStand components.

pub mod config;
pub mod error;
pub mod metrics;

// Re-export commonly used types
pub use config::{ModelConfig, ToyStandConfig};
pub use error::{Result, ToyStandError};
pub use metrics::{MetricsRegistry, METRICS};
