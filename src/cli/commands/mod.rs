/// Configuration inspection commands
pub mod config;
/// Commands talking to a running host
pub mod tabs;
