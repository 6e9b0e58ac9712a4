use serde::Serialize;
use tokio::sync::mpsc;

use crate::services::players::{ControlAction, TabId};

/// Messages written back to the browser
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    /// Acknowledges one parsed inbound message
    Ack {
        /// Always `true`
        ok: bool,
    },

    /// Asks the extension to act on a tab
    Command {
        /// Operation to perform
        command: ControlAction,
        /// Tab to act on
        #[serde(rename = "tabId")]
        tab_id: TabId,
    },
}

impl OutboundMessage {
    /// The `{"ok": true}` acknowledgement
    pub fn ack() -> Self {
        Self::Ack { ok: true }
    }

    /// A control command envelope for `tab_id`
    pub fn command(command: ControlAction, tab_id: TabId) -> Self {
        Self::Command { command, tab_id }
    }
}

/// Receiving end drained by the frame writer task
pub type OutboundReceiver = mpsc::UnboundedReceiver<OutboundMessage>;

/// Cloneable handle for queueing frames to the browser.
///
/// Sending never blocks, so it is safe to use while the registry lock is
/// held. Frames are written in the order they were queued.
#[derive(Debug, Clone)]
pub struct OutboundSender {
    tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl OutboundSender {
    /// Queue a message for the writer.
    ///
    /// # Errors
    /// Returns the message back if the writer has shut down.
    pub fn send(&self, message: OutboundMessage) -> Result<(), OutboundMessage> {
        self.tx.send(message).map_err(|e| e.0)
    }
}

/// Create a connected outbound sender/receiver pair
pub fn outbound_channel() -> (OutboundSender, OutboundReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (OutboundSender { tx }, rx)
}
