use std::{fs, path::Path};

use tracing::{debug, info};

use super::{Config, ConfigPaths};
use crate::{BridgeError, Result};

const DEFAULT_CONFIG_HEADER: &str = "# tab-bridge configuration file\n";

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// Creates an empty configuration file if none exists yet, so the user
    /// has a place to start editing.
    ///
    /// # Errors
    /// Returns error if the config directory cannot be determined, the file
    /// cannot be read or created, or its contents are invalid.
    pub fn load() -> Result<Config> {
        let path = ConfigPaths::main_config()?;
        Self::load_from(&path)
    }

    /// Loads and validates a configuration file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist and cannot be created
    /// - The file cannot be read
    /// - The TOML content is invalid
    /// - A value fails validation
    pub fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            create_default_config_file(path)?;
        }

        let content = fs::read_to_string(path).map_err(|e| BridgeError::io_at(e, path))?;
        let config: Config =
            toml::from_str(&content).map_err(|e| BridgeError::toml_parse(e, Some(path)))?;
        config.validate()?;

        debug!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Parses and validates a configuration from a TOML string.
    ///
    /// # Errors
    /// Returns error if the TOML is invalid or a value fails validation.
    pub fn from_toml_str(content: &str) -> Result<Config> {
        let config: Config =
            toml::from_str(content).map_err(|e| BridgeError::toml_parse(e, None))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot work at runtime.
    ///
    /// # Errors
    /// Returns `BridgeError::ConfigValidation` naming the offending section.
    pub fn validate(&self) -> Result<()> {
        if self.framing.max_frame_bytes == 0 {
            return Err(BridgeError::ConfigValidation {
                component: "framing".to_string(),
                details: "max_frame_bytes must be greater than zero".to_string(),
            });
        }

        if self.framing.max_frame_bytes as u64 > self.framing.length_width.max_len() {
            return Err(BridgeError::ConfigValidation {
                component: "framing".to_string(),
                details: format!(
                    "max_frame_bytes {} does not fit a {:?} length prefix",
                    self.framing.max_frame_bytes, self.framing.length_width
                ),
            });
        }

        if self.query.read_buffer_bytes == 0 {
            return Err(BridgeError::ConfigValidation {
                component: "query".to_string(),
                details: "read_buffer_bytes must be greater than zero".to_string(),
            });
        }

        if self.query.socket_path.as_os_str().is_empty() {
            return Err(BridgeError::ConfigValidation {
                component: "query".to_string(),
                details: "socket_path must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

fn create_default_config_file(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BridgeError::io_at(e, parent))?;
    }

    fs::write(path, DEFAULT_CONFIG_HEADER).map_err(|e| BridgeError::io_at(e, path))?;
    info!(path = %path.display(), "Created default configuration file");

    Ok(())
}
