//! Defines an abstraction over the log sink shared with the presentation layer.

use super::events::WatchEvent;
use tokio::sync::mpsc::UnboundedSender;

/// A trait that abstracts the sending of watcher events.
/// This is "fire-and-forget" and doesn't return a result, simplifying its use.
pub trait EventProxy: Send + Sync + Clone + 'static {
    fn send_event(&self, event: WatchEvent);
}

/// Implement the trait for an unbounded Tokio channel, which never blocks
/// the sending worker.
impl EventProxy for UnboundedSender<WatchEvent> {
    fn send_event(&self, event: WatchEvent) {
        // A closed receiver only means nobody is listening anymore.
        if let Err(e) = self.send(event) {
            tracing::warn!("Failed to deliver watcher event: {}", e);
        }
    }
}
