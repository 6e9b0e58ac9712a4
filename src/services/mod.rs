/// Length-prefixed JSON stream to and from the browser extension
pub mod native_messaging;
/// Per-tab player registry
pub mod players;
/// Local query socket
pub mod query;
