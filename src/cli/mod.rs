//! Command-line interface for inspecting and controlling a running host.
//!
//! Commands are organized by category and generate their help text from
//! metadata. The `tabs` commands talk to the host over its query socket;
//! the `config` commands only read the local configuration.

/// Query socket client
pub mod client;
mod commands;
pub mod formatting;
mod registry;
mod service;
mod types;

#[cfg(test)]
mod tests;

pub use client::QueryClient;
pub use registry::CommandRegistry;
pub use service::CliService;
pub use types::{ArgType, CliError, Command, CommandArg, CommandMetadata, CommandResult};
