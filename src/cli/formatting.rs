//! Formatting utilities for CLI output.
//!
//! Consistent styling for help text, tab listings and errors.

/// Terminal styles used by the CLI, as ANSI escape sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Bold cyan
    Header,
    /// Bold green
    Command,
    /// Bold blue
    Category,
    /// Dimmed
    Muted,
    /// Yellow
    Highlight,
    /// Bold red
    Error,
}

const RESET: &str = "\x1b[0m";

impl Style {
    /// Escape sequence that switches the style on
    pub fn code(self) -> &'static str {
        match self {
            Style::Header => "\x1b[1;36m",
            Style::Command => "\x1b[1;32m",
            Style::Category => "\x1b[1;34m",
            Style::Muted => "\x1b[2m",
            Style::Highlight => "\x1b[33m",
            Style::Error => "\x1b[1;31m",
        }
    }

    /// `text` wrapped in this style and a reset
    pub fn paint(self, text: &str) -> String {
        format!("{}{text}{RESET}", self.code())
    }
}

/// Section header, e.g. the help title
pub fn format_header(text: &str) -> String {
    Style::Header.paint(text)
}

/// Command name in help output
pub fn format_command(text: &str) -> String {
    Style::Command.paint(text)
}

/// Category name in help output
pub fn format_category(text: &str) -> String {
    Style::Category.paint(text)
}

/// Descriptions and usage examples
pub fn format_description(text: &str) -> String {
    Style::Muted.paint(text)
}

/// Error line printed to stderr before a failing exit
pub fn format_error(text: &str) -> String {
    Style::Error.paint(text)
}

/// Emphasized value, such as the ids of playing tabs
pub fn format_highlight(text: &str) -> String {
    Style::Highlight.paint(text)
}

/// Symbol and label for a player status as reported by the host.
///
/// Unrecognized statuses are shown as-is.
///
/// ```
/// use tab_bridge::cli::formatting::format_status;
///
/// assert_eq!(format_status("Playing"), "▶ Playing");
/// assert_eq!(format_status("Buffering"), "Buffering");
/// ```
pub fn format_status(status: &str) -> String {
    let symbol = match status {
        "Playing" => "▶",
        "Paused" => "⏸",
        "Stopped" => "⏹",
        _ => return status.to_string(),
    };
    format!("{symbol} {status}")
}
