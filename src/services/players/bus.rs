use tracing::{debug, info};

use super::TabId;
use crate::config::BusConfig;

/// A player's (announced) presence on the media-control bus.
///
/// Publication itself happens elsewhere; this only tracks the name a tab
/// would be registered under so that registration and release are logged
/// exactly once each.
#[derive(Debug, Default)]
pub struct BusRegistration {
    name: Option<String>,
}

impl BusRegistration {
    /// Announces the bus name for `tab_id` if announcements are enabled.
    pub fn announce(config: &BusConfig, tab_id: TabId) -> Self {
        if !config.announce_names {
            return Self::default();
        }

        let name = format!("{}{}", config.name_prefix, tab_id);
        info!(bus_name = %name, "Would register player on media-control bus");

        Self { name: Some(name) }
    }

    /// Name announced for this player, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Releases the announced name. Safe to call repeatedly.
    pub fn release(&mut self) {
        match self.name.take() {
            Some(name) => info!(bus_name = %name, "Cleaning up media-control bus name"),
            None => debug!("No media-control bus name to release"),
        }
    }
}
