//! Defines the messages sent from the watcher worker to the presentation layer.

use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;

use crate::core::UpdateNotice;

/// Events sent from the watch loop to whoever consumes the log.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// The loop has started monitoring `root`.
    Started { root: PathBuf },
    /// A rule file or directory was created, or a write failed.
    Notice(UpdateNotice),
    /// At least one rule file was rewritten during a cycle.
    StructureUpdated { at: DateTime<Local> },
    /// A cycle failed; the loop keeps running.
    CycleFailed { message: String },
    /// The loop observed the stop request and exited.
    Stopped,
}

impl fmt::Display for WatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatchEvent::Started { root } => {
                write!(f, "🔍 Starting directory monitoring of {}...", root.display())
            }
            WatchEvent::Notice(notice) => write!(f, "{notice}"),
            WatchEvent::StructureUpdated { at } => {
                write!(f, "✅ Structure updated at {}", at.format("%H:%M:%S"))
            }
            WatchEvent::CycleFailed { message } => write!(f, "❌ Error: {message}"),
            WatchEvent::Stopped => write!(f, "👋 Monitoring finished"),
        }
    }
}

/// Formats an event as a timestamped log line, e.g. `[14:03:12] ✅ ...`.
pub fn log_line(event: &WatchEvent, now: DateTime<Local>) -> String {
    format!("[{}] {}", now.format("%H:%M:%S"), event)
}
