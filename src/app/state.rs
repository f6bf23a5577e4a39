//! Defines the lifecycle state of the watcher worker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::proxy::EventProxy;
use super::watch_loop::DirectoryWatcher;
use crate::config::WatchConfig;
use crate::core::CoreError;

/// Owns the watcher worker and its cooperative run flag.
///
/// The state is `Idle` until [`WatcherState::start`] spawns the loop and
/// `Running` until the worker has observed [`WatcherState::stop`] and exited.
pub struct WatcherState {
    /// The configuration every run of this watcher uses.
    config: WatchConfig,
    /// A flag used to signal the loop to exit.
    running: Arc<AtomicBool>,
    /// A handle to the worker, if one was started.
    task: Option<JoinHandle<()>>,
}

impl WatcherState {
    pub fn new(config: WatchConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
            task: None,
        }
    }

    /// `true` while a worker exists that has not finished yet.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Spawns the watch loop on Tokio's blocking pool.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<P: EventProxy>(&mut self, proxy: P) -> Result<(), CoreError> {
        if self.is_running() {
            return Err(CoreError::AlreadyRunning);
        }

        let running = Arc::new(AtomicBool::new(true));
        self.running = running.clone();
        let watcher = DirectoryWatcher::new(self.config.clone(), proxy, running);

        tracing::info!("Spawning watcher for {:?}", self.config.root());
        self.task = Some(tokio::task::spawn_blocking(move || watcher.run()));
        Ok(())
    }

    /// Signals the loop to exit. The worker finishes its current step first.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Waits for the worker to exit.
    pub async fn join(&mut self) {
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Watcher task ended abnormally: {}", e);
            }
        }
    }
}

impl Drop for WatcherState {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::events::WatchEvent;
    use crate::core::RuleTarget;
    use std::time::Duration;
    use tempfile::tempdir;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn start_stop_join_walks_through_the_lifecycle() {
        let dir = tempdir().unwrap();
        let config = WatchConfig::new(dir.path(), vec![RuleTarget::Cursor], 30).unwrap();
        let mut state = WatcherState::new(config);
        let (tx, mut rx) = mpsc::unbounded_channel();

        assert!(!state.is_running());
        state.start(tx.clone()).unwrap();
        assert!(state.is_running());
        assert!(matches!(state.start(tx), Err(CoreError::AlreadyRunning)));

        let started = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(started, WatchEvent::Started { .. }));

        state.stop();
        tokio::time::timeout(Duration::from_secs(5), state.join())
            .await
            .expect("watcher did not stop in time");
        assert!(!state.is_running());

        let mut last = None;
        while let Ok(event) = rx.try_recv() {
            last = Some(event);
        }
        assert_eq!(last, Some(WatchEvent::Stopped));
    }
}
