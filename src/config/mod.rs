//! Configuration schema definitions and validation.
//!
//! Defines the complete configuration structure for the bridge host:
//! logging, bus-name announcement, native-messaging framing and the query
//! socket. All configurations are serializable to/from TOML format and every
//! field has a default, so an empty file is a valid configuration.

mod bus;
mod framing;
mod general;
mod loading;
mod paths;
mod query;

#[cfg(test)]
mod tests;

pub use bus::BusConfig;
pub use framing::{FramingConfig, LengthWidth};
pub use general::{GeneralConfig, LogLevel};
pub use paths::ConfigPaths;
pub use query::QueryConfig;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Main configuration structure for the bridge host.
///
/// Represents the complete configuration schema that can be loaded
/// from TOML files. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
pub struct Config {
    /// General application settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Media-control bus name announcement.
    #[serde(default)]
    pub bus: BusConfig,

    /// Native-messaging frame layout.
    #[serde(default)]
    pub framing: FramingConfig,

    /// Local query socket.
    #[serde(default)]
    pub query: QueryConfig,
}
