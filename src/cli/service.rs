use std::sync::Arc;

use crate::config::Config;

use super::{CliError, CommandRegistry};

/// High-level service for managing and executing CLI commands.
///
/// Commands are organized by category and can be listed or executed by name.
pub struct CliService {
    registry: CommandRegistry,
}

impl CliService {
    /// Creates a new CLI service with all available commands registered.
    ///
    /// The configuration is shared by commands that need the socket path or
    /// want to render the effective settings.
    pub fn new(config: Config) -> Self {
        let mut registry = CommandRegistry::new(Arc::new(config));
        registry.register_all_commands();

        CliService { registry }
    }

    /// Executes a command by category and name with the provided arguments.
    ///
    /// `help` as the category, or a category with no command name, returns
    /// the generated help text.
    ///
    /// # Errors
    /// Returns `CliError::CommandNotFound` if the command doesn't exist in the
    /// category, or the command's own error if it fails.
    pub async fn execute_command(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        if category == "help" || command_name.is_empty() {
            return Ok(self.registry.help_text());
        }

        self.registry.execute(category, command_name, args).await
    }

    /// Lists all available commands as (category, command names) tuples.
    pub fn list_all(&self) -> Vec<(String, Vec<String>)> {
        self.registry.list_commands()
    }
}
