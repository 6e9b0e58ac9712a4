//! Unit tests for CLI module
//!
//! Registry lookup and validation, help text, and the tab commands against
//! a live query server on a temporary socket.

use std::{sync::Arc, time::Duration};

use tempfile::TempDir;
use tokio::sync::watch;

use crate::cli::{CliError, CliService, CommandRegistry, QueryClient, formatting::format_status};
use crate::config::{BusConfig, Config};
use crate::services::{
    native_messaging::{OutboundMessage, OutboundReceiver, outbound_channel},
    players::{ControlAction, Registry, StateReport, TabId},
    query::QueryServer,
};

struct LiveHost {
    _dir: TempDir,
    config: Config,
    registry: Arc<Registry>,
    rx: OutboundReceiver,
    _shutdown: watch::Sender<bool>,
}

fn live_host() -> LiveHost {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.query.socket_path = dir.path().join("bridge.sock");

    let (tx, rx) = outbound_channel();
    let registry = Arc::new(Registry::new(tx, BusConfig::default()));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let server = QueryServer::bind(&config.query).unwrap();
    tokio::spawn(server.run(registry.clone(), shutdown_rx));

    LiveHost {
        _dir: dir,
        config,
        registry,
        rx,
        _shutdown: shutdown_tx,
    }
}

#[test]
fn commands_are_listed_by_category() {
    let service = CliService::new(Config::default());

    assert_eq!(
        service.list_all(),
        vec![
            ("config".to_string(), vec!["schema".to_string(), "show".to_string()]),
            (
                "tabs".to_string(),
                vec!["action".to_string(), "list".to_string(), "status".to_string()]
            ),
        ]
    );
}

#[test]
fn empty_registry_lists_nothing() {
    let registry = CommandRegistry::new(Arc::new(Config::default()));

    assert!(registry.list_commands().is_empty());
}

#[tokio::test]
async fn unknown_category_and_command() {
    let service = CliService::new(Config::default());

    let category = service.execute_command("media", "list", &[]).await;
    let command = service.execute_command("tabs", "seek", &[]).await;

    assert!(matches!(category, Err(CliError::CommandNotFound(_))));
    assert!(matches!(command, Err(CliError::CommandNotFound(_))));
}

#[tokio::test]
async fn argument_count_is_validated() {
    let service = CliService::new(Config::default());

    let missing = service
        .execute_command("tabs", "action", &["1".to_string()])
        .await;
    let extra = service
        .execute_command("tabs", "status", &["now".to_string()])
        .await;

    assert!(matches!(missing, Err(CliError::InvalidArguments(_))));
    assert!(matches!(extra, Err(CliError::InvalidArguments(_))));
}

#[tokio::test]
async fn help_mentions_every_command() {
    let service = CliService::new(Config::default());

    let help = service.execute_command("help", "", &[]).await.unwrap();

    for name in ["tabs", "config", "status", "list", "action", "show", "schema"] {
        assert!(help.contains(name), "help is missing {name}");
    }
}

#[tokio::test]
async fn config_show_renders_toml() {
    let service = CliService::new(Config::default());

    let output = service.execute_command("config", "show", &[]).await.unwrap();
    let parsed = Config::from_toml_str(&output).unwrap();

    assert_eq!(parsed.query.socket_path, Config::default().query.socket_path);
    assert!(output.contains("[framing]"));
}

#[tokio::test]
async fn config_schema_is_json() {
    let service = CliService::new(Config::default());

    let output = service.execute_command("config", "schema", &[]).await.unwrap();
    let schema: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert!(schema["properties"]["query"].is_object());
}

#[tokio::test]
async fn tabs_commands_against_live_host() {
    let mut host = live_host();
    host.registry
        .upsert(
            TabId(12),
            &StateReport {
                playing: Some(true),
                title: Some("Song A".to_string()),
                ..StateReport::default()
            },
        )
        .await;
    let service = CliService::new(host.config.clone());

    let status = service.execute_command("tabs", "status", &[]).await.unwrap();
    let list = service.execute_command("tabs", "list", &[]).await.unwrap();
    let action = service
        .execute_command("tabs", "action", &["12".to_string(), "pause".to_string()])
        .await
        .unwrap();

    assert!(status.contains("Tracking 1 tab(s)"));
    assert!(list.contains("Song A"));
    assert!(list.contains(&format_status("Playing")));
    assert_eq!(action, "Sent 'pause' to tab 12");
    assert_eq!(
        host.rx.try_recv().unwrap(),
        OutboundMessage::command(ControlAction::Pause, TabId(12))
    );
}

#[tokio::test]
async fn action_errors_from_host() {
    let host = live_host();
    let service = CliService::new(host.config.clone());

    let missing = service
        .execute_command("tabs", "action", &["3".to_string(), "play".to_string()])
        .await;
    let bad_id = service
        .execute_command("tabs", "action", &["x".to_string(), "play".to_string()])
        .await;

    assert!(matches!(missing, Err(CliError::ServiceError(ref m)) if m == "tab not found"));
    assert!(matches!(bad_id, Err(CliError::InvalidArguments(_))));
}

#[tokio::test]
async fn client_reports_missing_host() {
    let dir = TempDir::new().unwrap();
    let client = QueryClient::new(dir.path().join("absent.sock"))
        .with_timeout(Duration::from_millis(200));

    let result = client.status().await;

    assert!(matches!(result, Err(CliError::ConnectionError { .. })));
}

#[test]
fn status_labels() {
    assert_eq!(format_status("Paused"), "⏸ Paused");
    assert_eq!(format_status("Stopped"), "⏹ Stopped");
    assert_eq!(format_status("odd"), "odd");
}
