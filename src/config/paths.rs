use std::{
    env, fs,
    io::{Error, ErrorKind},
    path::PathBuf,
};

const APP_DIR: &str = "tab-bridge";

/// Locations of the configuration file and log directory.
///
/// Follows the XDG base directory layout, falling back to the usual
/// locations under `$HOME`.
pub struct ConfigPaths;

impl ConfigPaths {
    /// `$XDG_CONFIG_HOME/tab-bridge`, or `$HOME/.config/tab-bridge`
    ///
    /// # Errors
    /// Returns an error if neither variable is set
    pub fn config_dir() -> Result<PathBuf, Error> {
        xdg_dir("XDG_CONFIG_HOME", ".config")
    }

    /// `$XDG_STATE_HOME/tab-bridge`, or `$HOME/.local/state/tab-bridge`
    ///
    /// # Errors
    /// Returns an error if neither variable is set
    pub fn state_dir() -> Result<PathBuf, Error> {
        xdg_dir("XDG_STATE_HOME", ".local/state")
    }

    /// Directory for rolling log files, created if missing
    ///
    /// # Errors
    /// Returns error if the state directory is unknown or cannot be created
    pub fn log_dir() -> Result<PathBuf, Error> {
        let log_dir = Self::state_dir()?.join("logs");
        fs::create_dir_all(&log_dir)?;
        Ok(log_dir)
    }

    /// Path of `config.toml` in the configuration directory
    ///
    /// # Errors
    /// Returns an error if the configuration directory cannot be determined
    pub fn main_config() -> Result<PathBuf, Error> {
        Ok(Self::config_dir()?.join("config.toml"))
    }
}

fn xdg_dir(var: &str, home_fallback: &str) -> Result<PathBuf, Error> {
    let base = match env::var_os(var) {
        Some(base) if !base.is_empty() => PathBuf::from(base),
        _ => env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(home_fallback))
            .ok_or_else(|| {
                Error::new(
                    ErrorKind::NotFound,
                    format!("Neither {var} nor HOME environment variable found"),
                )
            })?,
    };

    Ok(base.join(APP_DIR))
}
