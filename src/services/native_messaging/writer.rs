use tokio::{io::AsyncWrite, sync::watch};
use tracing::{debug, error, instrument, warn};

use super::{FrameCodec, FrameError, OutboundMessage, OutboundReceiver};

/// Sole owner of the stream back to the browser.
///
/// Acknowledgements and player commands are queued on one channel and
/// written here in queue order, each frame flushed on its own.
pub struct FrameWriter<W> {
    codec: FrameCodec,
    writer: W,
}

impl<W> FrameWriter<W>
where
    W: AsyncWrite + Unpin,
{
    /// Wrap `writer` with the given codec
    pub fn new(codec: FrameCodec, writer: W) -> Self {
        Self { codec, writer }
    }

    /// Write queued messages until shutdown is signalled.
    ///
    /// On shutdown, messages already queued are still written. A write
    /// failure means the browser side is gone and stops the writer.
    #[instrument(skip_all)]
    pub async fn run(mut self, mut rx: OutboundReceiver, mut shutdown: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                biased;
                message = rx.recv() => {
                    let Some(message) = message else {
                        debug!("Outbound channel closed");
                        return;
                    };
                    if let Err(e) = self.write(&message).await {
                        error!(error = %e, "Failed to write frame, stopping writer");
                        return;
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        while let Ok(message) = rx.try_recv() {
            if let Err(e) = self.write(&message).await {
                warn!(error = %e, "Failed to write frame during shutdown");
                return;
            }
        }
        debug!("Frame writer stopped");
    }

    async fn write(&mut self, message: &OutboundMessage) -> Result<(), FrameError> {
        let payload = match serde_json::to_vec(message) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, ?message, "Failed to encode outbound message");
                return Ok(());
            }
        };

        match self.codec.write_frame(&mut self.writer, &payload).await {
            Err(FrameError::TooLarge { len, max }) => {
                warn!(len, max, "Outbound message exceeds frame limit, dropped");
                Ok(())
            }
            other => other,
        }
    }
}
