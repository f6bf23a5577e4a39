//! Defines the custom error type for the `core` module.

use std::path::{PathBuf, StripPrefixError};
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// This enum encapsulates all possible errors that can occur during
/// core operations like loading ignore rules, scanning and rule file updates.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Represents an I/O error, typically from file system operations.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    /// Represents a failure while serializing a structure to JSON.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Represents a failure while walking the directory tree.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// Represents a path that was expected to be a directory but was not.
    #[error("Path is not a valid directory: {0}")]
    NotADirectory(PathBuf),

    /// Represents a failure to strip a path prefix.
    #[error("Failed to strip prefix from path: {0}")]
    PathStrip(#[from] StripPrefixError),

    /// The polling interval must be at least one second.
    #[error("Interval must be at least 1 second (got {0})")]
    InvalidInterval(u64),

    /// A watcher was started while another one is still running.
    #[error("The watcher is already running")]
    AlreadyRunning,
}
