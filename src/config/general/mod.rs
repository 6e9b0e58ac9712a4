mod log_level;

pub use log_level::LogLevel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// General configuration settings for the bridge host.
///
/// Contains global settings that affect the overall behavior of the process,
/// such as logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct GeneralConfig {
    /// Logging level used when `RUST_LOG` is not set.
    pub log_level: LogLevel,

    /// Whether host mode also writes a rolling log file.
    pub log_to_file: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            log_to_file: true,
        }
    }
}
