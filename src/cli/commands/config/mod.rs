//! Configuration inspection commands.
mod schema;
mod show;

use std::sync::Arc;

pub use schema::SchemaCommand;
pub use show::ShowCommand;

use crate::{cli::CommandRegistry, config::Config};

/// Registers all configuration commands in the "config" category.
pub fn register_commands(registry: &mut CommandRegistry, config: Arc<Config>) {
    const CATEGORY_NAME: &str = "config";

    registry.register_command(CATEGORY_NAME, Box::new(ShowCommand::new(config)));
    registry.register_command(CATEGORY_NAME, Box::new(SchemaCommand::new()));
}
