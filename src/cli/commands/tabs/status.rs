use async_trait::async_trait;

use crate::cli::{
    Command, CommandResult, client::QueryClient, formatting::format_highlight,
    types::CommandMetadata,
};

/// Command to summarize playback across all tracked tabs
pub struct StatusCommand {
    client: QueryClient,
}

impl StatusCommand {
    /// Creates a new StatusCommand
    pub fn new(client: QueryClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Command for StatusCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        let status = self.client.status().await?;

        if status.tab_count == 0 {
            return Ok("No tabs with media".to_string());
        }

        let mut output = format!("Tracking {} tab(s)", status.tab_count);
        if status.playing {
            let ids: Vec<String> = status.playing_tabs.iter().map(ToString::to_string).collect();
            output.push_str(&format!(
                ", playing: {}",
                format_highlight(&ids.join(", "))
            ));
        } else {
            output.push_str(", nothing playing");
        }

        Ok(output)
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "status".to_string(),
            description: "Show whether any tab is playing".to_string(),
            category: "tabs".to_string(),
            args: vec![],
            examples: vec!["tab-bridge tabs status".to_string()],
        }
    }
}
