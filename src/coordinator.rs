use std::sync::Arc;

use tokio::{
    io::{AsyncRead, AsyncWrite},
    sync::watch,
};
use tracing::{error, info, instrument, warn};

use crate::{
    Result,
    config::Config,
    services::{
        native_messaging::{
            FrameCodec, FrameError, FrameWriter, OutboundReceiver, OutboundSender,
            UpstreamHandler, outbound_channel,
        },
        players::Registry,
        query::QueryServer,
    },
};

/// Owns the registry and the lifetimes of both protocol handlers.
///
/// The upstream handler runs on the caller's task and its termination ends
/// the run. The query server and the frame writer run as background tasks
/// and are stopped through a shared shutdown signal.
pub struct Coordinator {
    config: Config,
    codec: FrameCodec,
    registry: Arc<Registry>,
    outbound: OutboundSender,
    outbound_rx: OutboundReceiver,
}

impl Coordinator {
    /// Create a coordinator with an empty registry
    pub fn new(config: Config) -> Self {
        let (outbound, outbound_rx) = outbound_channel();
        let registry = Arc::new(Registry::new(outbound.clone(), config.bus.clone()));
        let codec = FrameCodec::new(&config.framing);

        Self {
            config,
            codec,
            registry,
            outbound,
            outbound_rx,
        }
    }

    /// Shared handle to the registry
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Serve the browser stream on `reader`/`writer` until it ends.
    ///
    /// The query socket is bound before any frame is read and removed before
    /// this returns. End of input is a normal shutdown.
    ///
    /// # Errors
    /// Returns error if the query socket cannot be bound, or if the upstream
    /// stream failed with an I/O error
    #[instrument(skip_all)]
    pub async fn run<R, W>(self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let Self {
            config,
            codec,
            registry,
            outbound,
            outbound_rx,
        } = self;

        let server = QueryServer::bind(&config.query)?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let server_task = tokio::spawn(server.run(registry.clone(), shutdown_rx.clone()));
        let writer_task = tokio::spawn(FrameWriter::new(codec, writer).run(outbound_rx, shutdown_rx));

        let handler = UpstreamHandler::new(codec, registry.clone(), outbound);
        let termination = handler.run(reader).await;
        drop(handler);

        let outcome = match termination {
            e if e.is_clean_eof() => {
                info!("Browser closed the stream");
                Ok(())
            }
            FrameError::Closed { received, expected } => {
                warn!(received, expected, "Stream ended inside a length prefix");
                Ok(())
            }
            FrameError::TooLarge { len, max } => {
                error!(len, max, "Malformed length prefix, stopping");
                Ok(())
            }
            FrameError::Io(e) => {
                error!(error = %e, "Failed to read from browser");
                Err(e.into())
            }
        };

        if shutdown_tx.send(true).is_err() {
            warn!("Background tasks already stopped");
        }
        if let Err(e) = server_task.await {
            error!(error = %e, "Query server task failed");
        }
        if let Err(e) = writer_task.await {
            error!(error = %e, "Frame writer task failed");
        }

        let tabs = registry.len().await;
        info!(tabs, "Bridge stopped");
        outcome
    }
}
