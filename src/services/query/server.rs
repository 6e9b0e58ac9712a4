use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{UnixListener, UnixStream},
    sync::watch,
};
use tracing::{debug, info, instrument, warn};

use super::{QueryCommand, error_response};
use crate::{BridgeError, Result, config::QueryConfig, services::players::Registry};

/// Local socket answering one query per connection.
///
/// The socket file is removed when the server is dropped.
pub struct QueryServer {
    listener: UnixListener,
    socket_path: PathBuf,
    read_buffer_bytes: usize,
}

impl QueryServer {
    /// Bind the query socket, replacing any stale socket file.
    ///
    /// # Errors
    /// Returns error if the stale file cannot be removed or binding fails
    pub fn bind(config: &QueryConfig) -> Result<Self> {
        let socket_path = config.socket_path.clone();
        remove_socket_file(&socket_path).map_err(|e| BridgeError::io_at(e, &socket_path))?;

        let listener =
            UnixListener::bind(&socket_path).map_err(|e| BridgeError::io_at(e, &socket_path))?;
        info!(socket = %socket_path.display(), "Query server listening");

        Ok(Self {
            listener,
            socket_path,
            read_buffer_bytes: config.read_buffer_bytes,
        })
    }

    /// Path the server is bound to
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Accept connections until shutdown is signalled.
    ///
    /// Each connection is served on its own task. Accept errors are logged
    /// and do not stop the listener.
    #[instrument(skip_all)]
    pub async fn run(self, registry: Arc<Registry>, mut shutdown: watch::Receiver<bool>) {
        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                accept = self.listener.accept() => {
                    match accept {
                        Ok((stream, _addr)) => {
                            let registry = registry.clone();
                            let read_buffer_bytes = self.read_buffer_bytes;
                            tokio::spawn(async move {
                                if let Err(e) =
                                    handle_connection(stream, &registry, read_buffer_bytes).await
                                {
                                    warn!(error = %e, "Query connection failed");
                                }
                            });
                        }
                        Err(e) => {
                            warn!(error = %e, "Query server accept error");
                        }
                    }
                }
            }
        }

        debug!("Query server stopped");
    }
}

impl Drop for QueryServer {
    fn drop(&mut self) {
        match remove_socket_file(&self.socket_path) {
            Ok(()) => debug!(socket = %self.socket_path.display(), "Removed query socket"),
            Err(e) => warn!(error = %e, "Failed to remove query socket"),
        }
    }
}

/// Serve one connection: read a request, reply once, close.
///
/// A connection that sends nothing is closed without a reply.
async fn handle_connection(
    mut stream: UnixStream,
    registry: &Registry,
    read_buffer_bytes: usize,
) -> io::Result<()> {
    let mut buffer = vec![0u8; read_buffer_bytes];
    let n = stream.read(&mut buffer).await?;
    if n == 0 {
        debug!("Empty query connection ignored");
        return Ok(());
    }

    let response = match std::str::from_utf8(&buffer[..n]) {
        Ok(line) => {
            let command = QueryCommand::parse(line);
            debug!(?command, "Query received");
            command.execute(registry).await
        }
        Err(e) => error_response(format!("request is not valid UTF-8: {e}")),
    };

    let body = serde_json::to_vec(&response)?;
    stream.write_all(&body).await?;
    stream.shutdown().await
}

/// Remove a socket file, treating a missing file as success
pub fn remove_socket_file(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
