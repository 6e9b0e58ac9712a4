use std::sync::Arc;

use tokio::io::AsyncRead;
use tracing::{debug, info, instrument, warn};

use super::{
    Decoded, FrameCodec, FrameError, InboundMessage, OutboundMessage, OutboundSender,
    ReadOutcome, decode,
};
use crate::services::players::Registry;

/// Reads frames from the browser and applies them to the registry.
///
/// Frames are handled strictly in arrival order. Every payload that parses
/// as JSON is acknowledged, whether or not it was actionable.
pub struct UpstreamHandler {
    codec: FrameCodec,
    registry: Arc<Registry>,
    outbound: OutboundSender,
}

impl UpstreamHandler {
    /// Create a handler feeding `registry` and acknowledging through `outbound`
    pub fn new(codec: FrameCodec, registry: Arc<Registry>, outbound: OutboundSender) -> Self {
        Self {
            codec,
            registry,
            outbound,
        }
    }

    /// Process frames until the stream ends.
    ///
    /// Short payloads and invalid JSON are logged and skipped. Returns the
    /// condition that terminated the stream: end of input, an oversized
    /// length prefix, or a read failure.
    #[instrument(skip_all)]
    pub async fn run<R>(&self, mut reader: R) -> FrameError
    where
        R: AsyncRead + Unpin,
    {
        loop {
            match self.codec.read_frame(&mut reader).await {
                Ok(ReadOutcome::Payload(payload)) => {
                    self.handle_payload(&payload).await;
                }
                Ok(ReadOutcome::Truncated { expected, received }) => {
                    warn!(expected, received, "Incomplete message, skipped");
                }
                Err(e) => return e,
            }
        }
    }

    /// Handle one complete payload.
    ///
    /// Returns whether the payload was acknowledged.
    pub async fn handle_payload(&self, payload: &[u8]) -> bool {
        let decoded = match decode(payload) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(error = %e, "Failed to parse message, skipped");
                return false;
            }
        };

        match decoded {
            Decoded::Message(InboundMessage::MediaState(state)) => {
                debug!(tab_id = %state.tab_id, "Media state received");
                self.registry.upsert(state.tab_id, &state.report).await;
            }
            Decoded::Message(InboundMessage::TabClosed(closed)) => {
                info!(tab_id = %closed.tab_id, "Tab closed");
                self.registry.remove(closed.tab_id).await;
            }
            Decoded::Unrecognized { kind, reason } => {
                warn!(kind = ?kind, %reason, "Unknown message type");
            }
        }

        if self.outbound.send(OutboundMessage::ack()).is_err() {
            debug!("Writer gone, acknowledgement dropped");
        }
        true
    }
}
