use async_trait::async_trait;

use crate::cli::{
    Command, CommandResult, client::QueryClient, formatting::format_status,
    types::CommandMetadata,
};

/// Command to list every tracked tab with its track and status
///
/// Tabs are shown in ascending id order.
pub struct ListCommand {
    client: QueryClient,
}

impl ListCommand {
    /// Creates a new ListCommand
    pub fn new(client: QueryClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, _args: &[String]) -> CommandResult {
        let tabs = self.client.list_tabs().await?;

        if tabs.is_empty() {
            return Ok("No tabs with media".to_string());
        }

        let mut rows: Vec<_> = tabs.iter().collect();
        rows.sort_by_key(|(id, _)| id.parse::<i64>().unwrap_or(i64::MAX));

        let mut output = format!("Found {} tab(s):\n\n", rows.len());
        for (id, tab) in rows {
            output.push_str(&format!(
                "{id:>8}  {:<12} {} by {}\n",
                format_status(&tab.status),
                tab.title,
                tab.artist
            ));
        }

        output.push_str("\nUse the tab id with 'tab-bridge tabs action'.");
        Ok(output)
    }

    fn metadata(&self) -> CommandMetadata {
        CommandMetadata {
            name: "list".to_string(),
            description: "List tracked tabs".to_string(),
            category: "tabs".to_string(),
            args: vec![],
            examples: vec!["tab-bridge tabs list".to_string()],
        }
    }
}
