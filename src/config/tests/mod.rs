//! Unit tests for config module
//!
//! Tests configuration types, defaults, validation and loading.

use std::{fs, path::PathBuf};

use tempfile::TempDir;

use crate::BridgeError;
use crate::config::{Config, LengthWidth, LogLevel};

#[test]
fn config_default() {
    let config = Config::default();

    assert_eq!(config.general.log_level, LogLevel::Info);
    assert!(config.general.log_to_file);
    assert!(config.bus.announce_names);
    assert_eq!(config.framing.length_width, LengthWidth::U32);
    assert_eq!(config.framing.max_frame_bytes, 1024 * 1024);
    assert_eq!(
        config.query.socket_path,
        PathBuf::from("/tmp/media_bridge.sock")
    );
    assert_eq!(config.query.read_buffer_bytes, 1024);
}

#[test]
fn config_serialize_toml() {
    let config = Config::default();

    let toml_str = toml::to_string(&config).unwrap();
    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[bus]"));
    assert!(toml_str.contains("[framing]"));
    assert!(toml_str.contains("[query]"));
    assert!(toml_str.contains("length_width = \"u32\""));
}

#[test]
fn config_deserialize_toml() {
    let toml_str = r#"
        [general]
        log_level = "debug"

        [framing]
        length_width = "u16"
        max_frame_bytes = 4096

        [query]
        socket_path = "/run/user/1000/tab-bridge.sock"
    "#;

    let config = Config::from_toml_str(toml_str).unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(config.framing.length_width, LengthWidth::U16);
    assert_eq!(config.framing.max_frame_bytes, 4096);
    assert_eq!(
        config.query.socket_path,
        PathBuf::from("/run/user/1000/tab-bridge.sock")
    );
    assert_eq!(config.query.read_buffer_bytes, 1024);
}

#[test]
fn config_empty_toml() {
    let config = Config::from_toml_str("").unwrap();

    assert_eq!(format!("{config:?}"), format!("{:?}", Config::default()));
}

#[test]
fn config_serialize_roundtrip() {
    let original = Config::default();

    let toml_str = toml::to_string(&original).unwrap();
    let deserialized = Config::from_toml_str(&toml_str).unwrap();

    assert_eq!(format!("{original:?}"), format!("{deserialized:?}"));
}

#[test]
fn config_rejects_zero_frame_size() {
    let result = Config::from_toml_str("[framing]\nmax_frame_bytes = 0\n");

    assert!(matches!(
        result,
        Err(BridgeError::ConfigValidation { component, .. }) if component == "framing"
    ));
}

#[test]
fn config_rejects_frame_size_wider_than_prefix() {
    let result = Config::from_toml_str(
        "[framing]\nlength_width = \"u16\"\nmax_frame_bytes = 70000\n",
    );

    assert!(matches!(result, Err(BridgeError::ConfigValidation { .. })));
}

#[test]
fn config_rejects_zero_read_buffer() {
    let result = Config::from_toml_str("[query]\nread_buffer_bytes = 0\n");

    assert!(matches!(
        result,
        Err(BridgeError::ConfigValidation { component, .. }) if component == "query"
    ));
}

#[test]
fn config_invalid_toml_reports_parse_error() {
    let result = Config::from_toml_str("[general\nlog_level = ");

    assert!(matches!(
        result,
        Err(BridgeError::TomlParseError { location, .. }) if location == "string"
    ));
}

#[test]
fn load_from_creates_missing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested/config.toml");

    let config = Config::load_from(&path).unwrap();

    assert!(path.exists());
    assert!(fs::read_to_string(&path).unwrap().starts_with('#'));
    assert_eq!(config.query.read_buffer_bytes, 1024);
}

#[test]
fn load_from_reads_existing_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.toml");
    fs::write(&path, "[bus]\nannounce_names = false\n").unwrap();

    let config = Config::load_from(&path).unwrap();

    assert!(!config.bus.announce_names);
}

#[test]
fn length_width_sizes() {
    assert_eq!(LengthWidth::U16.bytes(), 2);
    assert_eq!(LengthWidth::U32.bytes(), 4);
    assert_eq!(LengthWidth::U64.bytes(), 8);
    assert_eq!(LengthWidth::U16.max_len(), 65535);
}

#[test]
fn log_level_display_matches_serde_names() {
    for level in [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ] {
        let toml_str = toml::to_string(&crate::config::GeneralConfig {
            log_level: level,
            log_to_file: false,
        })
        .unwrap();
        assert!(toml_str.contains(&format!("log_level = \"{level}\"")));
    }
}
