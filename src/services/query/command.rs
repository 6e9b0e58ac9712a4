use serde_json::{Value, json};

use crate::services::players::{Registry, TabId};

/// One parsed query line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryCommand {
    /// `status`
    Status,

    /// `list_tabs`
    ListTabs,

    /// `tab_action <id> <action>`
    TabAction {
        /// Raw id token, parsed when the command runs
        tab_id: String,
        /// Raw action token
        action: String,
    },

    /// Anything else, including an empty line
    Unknown,
}

impl QueryCommand {
    /// Parse a request line; surrounding whitespace is ignored
    pub fn parse(line: &str) -> Self {
        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts.as_slice() {
            ["status", ..] => Self::Status,
            ["list_tabs", ..] => Self::ListTabs,
            ["tab_action", tab_id, action, ..] => Self::TabAction {
                tab_id: (*tab_id).to_string(),
                action: (*action).to_string(),
            },
            _ => Self::Unknown,
        }
    }

    /// Run the command against `registry` and build the JSON response.
    ///
    /// Each command is a single registry operation, so the lock is released
    /// by the time the response is returned.
    pub async fn execute(&self, registry: &Registry) -> Value {
        match self {
            Self::Status => to_response(&registry.status_snapshot().await),
            Self::ListTabs => to_response(&registry.list_snapshot().await),
            Self::TabAction { tab_id, action } => {
                let tab_id: TabId = match tab_id.parse() {
                    Ok(tab_id) => tab_id,
                    Err(e) => return error_response(format!("invalid tab id '{tab_id}': {e}")),
                };

                match registry.dispatch_action(tab_id, action).await {
                    Ok(_) => json!({ "ok": true }),
                    Err(e) => error_response(e.to_string()),
                }
            }
            Self::Unknown => error_response("unknown command"),
        }
    }
}

/// `{"error": <message>}`
pub fn error_response(message: impl Into<String>) -> Value {
    json!({ "error": message.into() })
}

fn to_response<T: serde::Serialize>(snapshot: &T) -> Value {
    serde_json::to_value(snapshot).unwrap_or_else(|e| error_response(e.to_string()))
}
