pub mod settings;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::{CoreError, RuleTarget};

/// Operator settings, persisted as JSON between runs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub use_cursor: bool,
    pub use_windsurf: bool,
    pub use_copilot: bool,
    pub interval_secs: u64,
    /// Project root to watch. `None` means the current working directory.
    pub root: Option<PathBuf>,
}

impl AppConfig {
    /// Targets whose flag is enabled, in a fixed order.
    pub fn enabled_targets(&self) -> Vec<RuleTarget> {
        RuleTarget::ALL
            .into_iter()
            .filter(|target| match target {
                RuleTarget::Cursor => self.use_cursor,
                RuleTarget::Windsurf => self.use_windsurf,
                RuleTarget::Copilot => self.use_copilot,
            })
            .collect()
    }

    /// Validates the settings into the immutable configuration of one run.
    ///
    /// `current_dir` is used when no root is configured.
    pub fn watch_config(&self, current_dir: &Path) -> Result<WatchConfig, CoreError> {
        let root = self
            .root
            .clone()
            .unwrap_or_else(|| current_dir.to_path_buf());
        WatchConfig::new(root, self.enabled_targets(), self.interval_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            use_cursor: true,
            use_windsurf: true,
            use_copilot: true,
            interval_secs: 30,
            root: None,
        }
    }
}

/// Validated configuration of a single watcher run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    root: PathBuf,
    targets: Vec<RuleTarget>,
    interval: Duration,
}

impl WatchConfig {
    /// Fails with [`CoreError::InvalidInterval`] when `interval_secs` is zero.
    pub fn new(
        root: impl Into<PathBuf>,
        targets: Vec<RuleTarget>,
        interval_secs: u64,
    ) -> Result<Self, CoreError> {
        if interval_secs < 1 {
            return Err(CoreError::InvalidInterval(interval_secs));
        }
        Ok(Self {
            root: root.into(),
            targets,
            interval: Duration::from_secs(interval_secs),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn targets(&self) -> &[RuleTarget] {
        &self.targets
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
