use std::{collections::BTreeMap, sync::Arc};

use crate::config::Config;

use super::{
    CliError, Command,
    commands::{config, tabs},
    formatting::{format_category, format_command, format_description, format_header},
};

type Category = BTreeMap<String, Box<dyn Command>>;

/// Commands grouped by category, both kept in name order.
///
/// ```text
/// registry
/// ├── config
/// │   ├── schema
/// │   └── show
/// └── tabs
///     ├── action
///     ├── list
///     └── status
/// ```
pub struct CommandRegistry {
    categories: BTreeMap<String, Category>,
    config: Arc<Config>,
}

impl CommandRegistry {
    /// Creates a registry with no commands.
    ///
    /// Built-in commands are added by [`CommandRegistry::register_all_commands`].
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            categories: BTreeMap::new(),
            config,
        }
    }

    /// Adds `command` to `category` under its metadata name.
    ///
    /// A command registered twice under the same name replaces the first.
    pub fn register_command(&mut self, category: &str, command: Box<dyn Command>) {
        let name = command.metadata().name;
        self.categories
            .entry(category.to_string())
            .or_default()
            .insert(name, command);
    }

    /// Registers every built-in command.
    pub fn register_all_commands(&mut self) {
        tabs::register_commands(self, self.config.clone());
        config::register_commands(self, self.config.clone());
    }

    /// Looks up a command and runs it with `args`.
    ///
    /// # Errors
    ///
    /// `CliError::CommandNotFound` for an unknown category or command,
    /// `CliError::InvalidArguments` if `args` has the wrong length, or
    /// whatever the command itself returns.
    pub async fn execute(
        &self,
        category: &str,
        command_name: &str,
        args: &[String],
    ) -> Result<String, CliError> {
        let command = self.find(category, command_name)?;
        command.metadata().check_arg_count(args.len())?;

        command.execute(args).await
    }

    /// (category, command names) pairs in alphabetical order.
    pub fn list_commands(&self) -> Vec<(String, Vec<String>)> {
        self.categories
            .iter()
            .map(|(category, commands)| (category.clone(), commands.keys().cloned().collect()))
            .collect()
    }

    /// Help text for every registered command, built from metadata
    pub fn help_text(&self) -> String {
        let mut output = format!("{}\n", format_header("tab-bridge commands"));

        for (category, commands) in &self.categories {
            output.push_str(&format!("\n{}\n", format_category(category)));

            for command in commands.values() {
                let metadata = command.metadata();
                output.push_str(&format!(
                    "  {}{}  {}\n",
                    format_command(&metadata.name),
                    metadata.usage(),
                    format_description(&metadata.description)
                ));
                for example in &metadata.examples {
                    output.push_str(&format!("      {}\n", format_description(example)));
                }
            }
        }

        output.push_str(&format!(
            "\n{}\n",
            format_description("Run without a category to start the host.")
        ));
        output
    }

    fn find(&self, category: &str, command_name: &str) -> Result<&dyn Command, CliError> {
        let commands = self.categories.get(category).ok_or_else(|| {
            CliError::CommandNotFound(format!("Failed to find category '{category}'"))
        })?;

        commands
            .get(command_name)
            .map(|command| &**command)
            .ok_or_else(|| {
                CliError::CommandNotFound(format!(
                    "Failed to find command '{command_name}' in '{category}'"
                ))
            })
    }
}
