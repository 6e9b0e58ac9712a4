use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::UnixStream,
    time::timeout,
};
use tracing::debug;

use super::CliError;
use crate::services::players::{ListSnapshot, StatusSnapshot, TabId};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Client for a running host's query socket.
///
/// Each request opens a fresh connection, writes one command line and reads
/// the whole JSON reply.
#[derive(Debug, Clone)]
pub struct QueryClient {
    socket_path: PathBuf,
    timeout: Duration,
}

impl QueryClient {
    /// Client for the socket at `socket_path` with the default timeout
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use `timeout` for connecting and for reading the reply
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Socket the client connects to
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Playback summary across all tabs
    ///
    /// # Errors
    /// Returns error if the host is unreachable or replies with an error
    pub async fn status(&self) -> Result<StatusSnapshot, CliError> {
        self.request_as("status").await
    }

    /// Per-tab summaries keyed by tab id
    ///
    /// # Errors
    /// Returns error if the host is unreachable or replies with an error
    pub async fn list_tabs(&self) -> Result<ListSnapshot, CliError> {
        self.request_as("list_tabs").await
    }

    /// Ask the host to send `action` to `tab_id`
    ///
    /// # Errors
    /// Returns error if the host is unreachable, the tab is not tracked, or
    /// the action is not recognized
    pub async fn tab_action(&self, tab_id: TabId, action: &str) -> Result<(), CliError> {
        self.request(&format!("tab_action {tab_id} {action}"))
            .await
            .map(|_| ())
    }

    /// Send one raw command line and return the reply.
    ///
    /// A reply of the form `{"error": ..}` becomes `CliError::ServiceError`.
    ///
    /// # Errors
    /// Returns error if connecting, writing or reading fails or times out,
    /// or if the reply is not JSON
    pub async fn request(&self, command: &str) -> Result<Value, CliError> {
        let mut stream = timeout(self.timeout, UnixStream::connect(&self.socket_path))
            .await
            .map_err(|_| self.connection_error("connection timed out"))?
            .map_err(|e| self.connection_error(e))?;

        stream.write_all(command.as_bytes()).await?;
        stream.shutdown().await?;

        let mut body = Vec::new();
        timeout(self.timeout, stream.read_to_end(&mut body))
            .await
            .map_err(|_| self.connection_error("timed out waiting for reply"))??;
        debug!(command, bytes = body.len(), "Query reply received");

        if body.is_empty() {
            return Err(CliError::ServiceError("empty response".to_string()));
        }

        let reply: Value = serde_json::from_slice(&body)
            .map_err(|e| CliError::ServiceError(format!("malformed response: {e}")))?;

        match reply.get("error").and_then(Value::as_str) {
            Some(message) => Err(CliError::ServiceError(message.to_string())),
            None => Ok(reply),
        }
    }

    async fn request_as<T: DeserializeOwned>(&self, command: &str) -> Result<T, CliError> {
        let reply = self.request(command).await?;
        serde_json::from_value(reply)
            .map_err(|e| CliError::ServiceError(format!("unexpected response: {e}")))
    }

    fn connection_error(&self, details: impl ToString) -> CliError {
        CliError::ConnectionError {
            socket: self.socket_path.display().to_string(),
            details: details.to_string(),
        }
    }
}
