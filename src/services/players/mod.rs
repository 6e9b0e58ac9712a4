//! Per-tab players and the registry that owns them.

/// Media-control bus name announcement
pub mod bus;
/// Registry error types
pub mod error;
/// The per-tab player
pub mod player;
/// The locked tab-id to player map
pub mod registry;
/// Player state, actions and snapshot types
pub mod types;

pub use bus::BusRegistration;
pub use error::RegistryError;
pub use player::Player;
pub use registry::{Registry, RegistryEventSender};
pub use types::*;
