use serde::Deserialize;
use serde_json::Value;

use crate::services::players::{StateReport, TabId};

/// Messages the extension sends to the host
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum InboundMessage {
    /// Full media state of one tab
    #[serde(rename = "mediaState")]
    MediaState(MediaState),

    /// A tab with media was closed
    #[serde(rename = "tabClosed")]
    TabClosed(TabClosed),
}

/// Body of a `mediaState` message
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaState {
    /// Tab the state belongs to
    #[serde(rename = "tabId")]
    pub tab_id: TabId,

    /// Reported state
    #[serde(flatten)]
    pub report: StateReport,
}

/// Body of a `tabClosed` message
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TabClosed {
    /// Tab that was closed
    #[serde(rename = "tabId")]
    pub tab_id: TabId,
}

/// A parsed JSON payload, sorted into what the host can act on
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// A recognized message
    Message(InboundMessage),

    /// Valid JSON that matches no message shape
    Unrecognized {
        /// The `type` field, if it was a string
        kind: Option<String>,
        /// Why it did not match
        reason: String,
    },
}

/// Decode one frame payload.
///
/// # Errors
/// Returns the JSON error if the payload is not valid JSON at all. Valid
/// JSON that is not a known message decodes to [`Decoded::Unrecognized`].
pub fn decode(payload: &[u8]) -> Result<Decoded, serde_json::Error> {
    let value: Value = serde_json::from_slice(payload)?;

    match InboundMessage::deserialize(&value) {
        Ok(message) => Ok(Decoded::Message(message)),
        Err(e) => Ok(Decoded::Unrecognized {
            kind: value
                .get("type")
                .and_then(Value::as_str)
                .map(str::to_string),
            reason: e.to_string(),
        }),
    }
}
