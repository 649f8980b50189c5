//! ping-core — shared types for the pingwatch uptime monitor.
//!
//! Holds the record shape written to the append-only logs, the probe
//! outcome taxonomy (real HTTP status codes plus the synthetic 590/591/599
//! codes), and the monitor configuration loaded once at startup.

pub mod config;
pub mod error;
pub mod types;

pub use config::{FileConfig, MonitorConfig, Rotation};
pub use error::{ConfigError, ConfigResult};
pub use types::*;
