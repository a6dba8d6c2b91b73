//! Configuration
//!
//! Layered configuration for drive behavior and logging. Sources, lowest to
//! highest precedence: defaults, global file, explicit file, `DRIVE_*` env.

pub mod facade;
pub mod merge;
pub mod paths;
pub mod sources;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

pub use facade::ConfigLoader;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveConfig {
    #[serde(default)]
    pub drive: DriveOptions,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Behavior of a [`Drive`](crate::drive::Drive)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriveOptions {
    /// Emit markers for empty folders when saving (default: true)
    #[serde(default = "default_true")]
    pub keep_empty_folders: bool,

    /// Servers tried after the drive's own and any per-call extras
    #[serde(default)]
    pub fallback_servers: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for DriveOptions {
    fn default() -> Self {
        Self {
            keep_empty_folders: default_true(),
            fallback_servers: Vec::new(),
        }
    }
}
