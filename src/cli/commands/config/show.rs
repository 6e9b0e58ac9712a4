use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    cli::{CliError, Command, CommandResult, types::CommandMetadata},
    config::Config,
};

/// Command printing the effective configuration as TOML.
///
/// Defaults are filled in, so the output is a complete configuration file.
pub struct ShowCommand {
    config: Arc<Config>,
}

impl ShowCommand {
    /// Creates a new ShowCommand for the loaded configuration
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Command for ShowCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        toml::to_string_pretty(self.config.as_ref())
            .map_err(|e| CliError::ConfigError(e.to_string()))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "show".to_string(),
            description: "Print the effective configuration".to_string(),
            category: "config".to_string(),
            args: vec![],
            examples: vec!["tab-bridge config show".to_string()],
        }
    }
}
