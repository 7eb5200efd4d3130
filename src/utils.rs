//! Supporting helpers shared by the binary and printers.

use owo_colors::OwoColorize;

fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Prefix for fatal messages on stderr.
pub fn error_prefix() -> String {
    if colors_enabled() {
        "✖ error:".red().bold().to_string()
    } else {
        "✖ error:".to_string()
    }
}

/// Prefix for friendly notes on stderr.
pub fn note_prefix() -> String {
    if colors_enabled() {
        "◆ note:".blue().bold().to_string()
    } else {
        "◆ note:".to_string()
    }
}

/// Prefix for non-fatal warnings on stderr.
pub fn warn_prefix() -> String {
    if colors_enabled() {
        "▲ warn:".yellow().bold().to_string()
    } else {
        "▲ warn:".to_string()
    }
}
