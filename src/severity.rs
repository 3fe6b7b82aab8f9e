//! Maps a log level to the attachment colour shown by the chat client.

use crate::entry::Level;

/// Violet, used for debug entries.
pub const DEBUG_COLOR: &str = "#9B30FF";
pub const GOOD: &str = "good";
pub const WARNING: &str = "warning";
pub const DANGER: &str = "danger";

pub fn color_for(level: Level) -> &'static str {
    match level {
        Level::Debug => DEBUG_COLOR,
        Level::Info => GOOD,
        Level::Error | Level::Fatal | Level::Panic => DANGER,
        _ => WARNING,
    }
}
