use std::{path::Path, sync::Arc, time::Duration};

use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::UnixStream,
    sync::watch,
    task::{JoinHandle, JoinSet},
};

use super::QueryServer;
use crate::{
    config::{BusConfig, QueryConfig},
    services::{
        native_messaging::{OutboundReceiver, outbound_channel},
        players::{Registry, StateReport, TabId},
    },
};

struct Harness {
    _dir: TempDir,
    config: QueryConfig,
    registry: Arc<Registry>,
    _rx: OutboundReceiver,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Harness {
    fn start() -> Self {
        let dir = TempDir::new().unwrap();
        let config = QueryConfig {
            socket_path: dir.path().join("bridge.sock"),
            ..QueryConfig::default()
        };
        let (tx, rx) = outbound_channel();
        let registry = Arc::new(Registry::new(tx, BusConfig::default()));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let server = QueryServer::bind(&config).unwrap();
        let task = tokio::spawn(server.run(registry.clone(), shutdown_rx));

        Self {
            _dir: dir,
            config,
            registry,
            _rx: rx,
            shutdown_tx,
            task,
        }
    }

    async fn stop(self) {
        self.shutdown_tx.send(true).unwrap();
        self.task.await.unwrap();
        assert!(!self.config.socket_path.exists());
    }
}

async fn ask(socket: &Path, request: &[u8]) -> Vec<u8> {
    let mut stream = UnixStream::connect(socket).await.unwrap();
    stream.write_all(request).await.unwrap();
    stream.shutdown().await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    response
}

async fn ask_json(socket: &Path, request: &str) -> Value {
    serde_json::from_slice(&ask(socket, request.as_bytes()).await).unwrap()
}

#[tokio::test]
async fn answers_each_command_and_closes() {
    let harness = Harness::start();
    let socket = harness.config.socket_path.clone();

    assert_eq!(
        ask_json(&socket, "status\n").await,
        json!({ "playing": false, "tab_count": 0, "playing_tabs": [] })
    );

    harness
        .registry
        .upsert(
            TabId(5),
            &StateReport {
                playing: Some(false),
                title: Some("Podcast".to_string()),
                ..StateReport::default()
            },
        )
        .await;

    assert_eq!(
        ask_json(&socket, "list_tabs").await,
        json!({ "5": { "playing": false, "title": "Podcast", "artist": "Unknown", "status": "Paused" } })
    );
    assert_eq!(
        ask_json(&socket, "tab_action 5 play").await,
        json!({ "ok": true })
    );
    assert_eq!(
        ask_json(&socket, "tab_action 6 play").await,
        json!({ "error": "tab not found" })
    );
    assert_eq!(
        ask_json(&socket, "hello").await,
        json!({ "error": "unknown command" })
    );

    harness.stop().await;
}

#[tokio::test]
async fn empty_connection_gets_no_reply() {
    let harness = Harness::start();

    let response = ask(&harness.config.socket_path, b"").await;

    assert!(response.is_empty());
    harness.stop().await;
}

#[tokio::test]
async fn invalid_utf8_gets_error() {
    let harness = Harness::start();

    let response: Value =
        serde_json::from_slice(&ask(&harness.config.socket_path, &[0xff, 0xfe]).await).unwrap();

    assert!(response["error"].is_string());
    harness.stop().await;
}

#[tokio::test]
async fn stale_socket_file_is_replaced() {
    let dir = TempDir::new().unwrap();
    let config = QueryConfig {
        socket_path: dir.path().join("stale.sock"),
        ..QueryConfig::default()
    };
    std::fs::write(&config.socket_path, b"left over").unwrap();

    let server = QueryServer::bind(&config).unwrap();
    assert_eq!(server.socket_path(), config.socket_path);

    drop(server);
    assert!(!config.socket_path.exists());
}

#[tokio::test]
async fn silent_client_does_not_block_others() {
    let harness = Harness::start();
    let socket = harness.config.socket_path.clone();

    let stalled = UnixStream::connect(&socket).await.unwrap();

    let reply = tokio::time::timeout(Duration::from_secs(2), ask_json(&socket, "status"))
        .await
        .expect("status reply while another client is silent");

    assert_eq!(
        reply,
        json!({ "playing": false, "tab_count": 0, "playing_tabs": [] })
    );
    drop(stalled);
    harness.stop().await;
}

#[tokio::test]
async fn concurrent_queries_each_get_a_reply() {
    let harness = Harness::start();
    harness
        .registry
        .upsert(
            TabId(9),
            &StateReport {
                playing: Some(true),
                ..StateReport::default()
            },
        )
        .await;

    let mut queries = JoinSet::new();
    for i in 0..16 {
        let socket = harness.config.socket_path.clone();
        let request = if i % 2 == 0 { "status" } else { "list_tabs" };
        queries.spawn(async move { (request, ask_json(&socket, request).await) });
    }

    let mut answered = 0;
    while let Some(result) = queries.join_next().await {
        let (request, reply) = result.unwrap();
        match request {
            "status" => assert_eq!(
                reply,
                json!({ "playing": true, "tab_count": 1, "playing_tabs": [9] })
            ),
            _ => assert_eq!(reply["9"]["status"], "Playing"),
        }
        answered += 1;
    }

    assert_eq!(answered, 16);
    harness.stop().await;
}
