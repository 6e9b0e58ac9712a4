//! Local query socket.
//!
//! Other processes on the machine connect, send one whitespace-separated
//! command line, and get one JSON object back before the socket is closed.
//!
//! ```text
//! status                      -> {"playing": bool, "tab_count": n, "playing_tabs": [..]}
//! list_tabs                   -> {"<id>": {"playing", "title", "artist", "status"}, ..}
//! tab_action <id> <action>    -> {"ok": true} | {"error": ".."}
//! ```

mod command;
mod server;

#[cfg(test)]
mod tests;

pub use command::{QueryCommand, error_response};
pub use server::{QueryServer, remove_socket_file};
