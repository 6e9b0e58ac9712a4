use async_trait::async_trait;

use crate::{
    cli::{
        CliError, Command, CommandResult,
        client::QueryClient,
        types::{ArgType, CommandArg, CommandMetadata},
    },
    services::players::TabId,
};

/// Command to send a playback action to one tab
pub struct ActionCommand {
    client: QueryClient,
}

impl ActionCommand {
    /// Creates a new ActionCommand
    pub fn new(client: QueryClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Command for ActionCommand {
    /// Sends the action through the host to the browser
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidArguments` for a non-numeric id, or the
    /// host's error when the tab is unknown or the action is not recognized
    async fn execute(&self, args: &[String]) -> CommandResult {
        let (Some(raw_id), Some(action)) = (args.first(), args.get(1)) else {
            return Err(CliError::InvalidArguments(
                "Expected <tab-id> <action>".to_string(),
            ));
        };

        let tab_id: TabId = raw_id.parse().map_err(|e| {
            CliError::InvalidArguments(format!("Invalid tab id '{raw_id}': {e}"))
        })?;

        self.client.tab_action(tab_id, action).await?;

        Ok(format!("Sent '{action}' to tab {tab_id}"))
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "action".to_string(),
            description: "Send a playback action to a tab".to_string(),
            category: "tabs".to_string(),
            args: vec![
                CommandArg {
                    name: "tab-id".to_string(),
                    description: "Tab id as shown by 'tabs list'".to_string(),
                    required: true,
                    value_type: ArgType::Number,
                },
                CommandArg {
                    name: "action".to_string(),
                    description: "play, pause, play_pause, stop, next or previous".to_string(),
                    required: true,
                    value_type: ArgType::String,
                },
            ],
            examples: vec![
                "tab-bridge tabs action 12 pause".to_string(),
                "tab-bridge tabs action 12 play_pause".to_string(),
            ],
        }
    }
}
