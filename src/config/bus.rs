use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Media-control bus configuration
///
/// The host does not publish players on the bus itself; it only announces
/// the name each tab would be registered under.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BusConfig {
    /// Whether to log bus-name registration intents for each player.
    pub announce_names: bool,

    /// Prefix joined with the tab id to form a player's bus name.
    pub name_prefix: String,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            announce_names: true,
            name_prefix: "org.mpris.MediaPlayer2.firefox_tab_".to_string(),
        }
    }
}
