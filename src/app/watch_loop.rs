use chrono::Local;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::events::WatchEvent;
use super::proxy::EventProxy;
use crate::config::WatchConfig;
use crate::core::{CoreError, DirectoryScanner, IgnoreRuleSet};

/// How often the run flag is checked while waiting for the next cycle.
pub const SLEEP_SLICE: Duration = Duration::from_millis(100);

/// The polling loop: scan the project, update the enabled rule files, sleep.
pub struct DirectoryWatcher<P: EventProxy> {
    config: WatchConfig,
    proxy: P,
    running: Arc<AtomicBool>,
}

impl<P: EventProxy> DirectoryWatcher<P> {
    pub fn new(config: WatchConfig, proxy: P, running: Arc<AtomicBool>) -> Self {
        Self {
            config,
            proxy,
            running,
        }
    }

    /// Runs cycles until the run flag is cleared.
    ///
    /// Errors inside a cycle are reported and never end the loop. This call
    /// blocks; run it on a dedicated worker.
    pub fn run(&self) {
        tracing::info!("Watching {:?} every {:?}", self.config.root(), self.config.interval());
        self.proxy.send_event(WatchEvent::Started {
            root: self.config.root().to_path_buf(),
        });

        while self.running.load(Ordering::SeqCst) {
            match self.run_cycle() {
                Ok(true) => {
                    self.proxy
                        .send_event(WatchEvent::StructureUpdated { at: Local::now() });
                }
                Ok(false) => tracing::debug!("Cycle finished, nothing to update"),
                Err(e) => {
                    tracing::error!("Watch cycle failed: {}", e);
                    self.proxy.send_event(WatchEvent::CycleFailed {
                        message: e.to_string(),
                    });
                }
            }

            self.sleep_interval();
        }

        tracing::info!("Watcher for {:?} stopped", self.config.root());
        self.proxy.send_event(WatchEvent::Stopped);
    }

    /// Performs one scan and updates every enabled target.
    ///
    /// Returns `true` if any rule file was written.
    pub fn run_cycle(&self) -> Result<bool, CoreError> {
        let root = self.config.root();
        let rules = IgnoreRuleSet::load(root)?;
        let structure = DirectoryScanner::new(root).scan(&rules)?;

        let mut updated = false;
        for &target in self.config.targets() {
            updated |= target.update(&structure, root, |notice| {
                self.proxy.send_event(WatchEvent::Notice(notice))
            })?;
        }
        Ok(updated)
    }

    /// Requests the loop to exit after the current cycle or sleep slice.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Waits one interval. An interval too large to represent as a deadline
    /// waits until the loop is stopped.
    fn sleep_interval(&self) {
        let deadline = Instant::now().checked_add(self.config.interval());
        while self.running.load(Ordering::SeqCst) {
            let remaining = match deadline {
                Some(deadline) => deadline.saturating_duration_since(Instant::now()),
                None => SLEEP_SLICE,
            };
            if remaining.is_zero() {
                break;
            }
            thread::sleep(remaining.min(SLEEP_SLICE));
        }
    }
}
