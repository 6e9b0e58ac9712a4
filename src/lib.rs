//! tab-bridge - browser tab media bridge.
//!
//! A native-messaging host that tracks per-tab media playback reported by a
//! browser extension, answers local queries about it, and relays playback
//! commands back to the browser. The main pieces are:
//!
//! - A player registry keyed by tab id behind a single async lock
//! - The length-prefixed JSON protocol on stdin/stdout
//! - A Unix-socket query server for other local processes
//! - A CLI for querying a running host
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tab_bridge::{config::Config, coordinator::Coordinator};
//!
//! # async fn run() -> tab_bridge::Result<()> {
//! let config = Config::load()?;
//! Coordinator::new(config)
//!     .run(tokio::io::stdin(), tokio::io::stdout())
//!     .await
//! # }
//! ```

/// Configuration schema definitions and validation.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Command-line interface for querying a running host.
pub mod cli;

/// Registry, browser protocol and query socket.
pub mod services;

/// Wiring of the registry and both protocol handlers.
pub mod coordinator;

/// Logging setup for host and CLI modes.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use core::{BridgeError, Result};
