//! Commands that query a running host over its socket.
mod action;
mod list;
mod status;

use std::sync::Arc;

pub use action::ActionCommand;
pub use list::ListCommand;
pub use status::StatusCommand;

use crate::{
    cli::{CommandRegistry, client::QueryClient},
    config::Config,
};

/// Registers all tab commands in the "tabs" category
///
/// Every command shares one client for the configured socket path.
pub fn register_commands(registry: &mut CommandRegistry, config: Arc<Config>) {
    const CATEGORY_NAME: &str = "tabs";

    let client = QueryClient::new(config.query.socket_path.clone());

    registry.register_command(CATEGORY_NAME, Box::new(StatusCommand::new(client.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(ListCommand::new(client.clone())));
    registry.register_command(CATEGORY_NAME, Box::new(ActionCommand::new(client)));
}
