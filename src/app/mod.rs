pub mod events;
pub mod proxy;
pub mod state;
pub mod watch_loop;

pub use events::{log_line, WatchEvent};
pub use proxy::EventProxy;
pub use state::WatcherState;
pub use watch_loop::DirectoryWatcher;
