use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Query socket configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct QueryConfig {
    /// Filesystem path of the Unix socket serving queries.
    pub socket_path: PathBuf,

    /// Maximum number of bytes read from a query connection.
    pub read_buffer_bytes: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from("/tmp/media_bridge.sock"),
            read_buffer_bytes: 1024,
        }
    }
}
