use std::fs;
use std::io;
use std::path::Path;
use std::sync::Once;

static LOGGING_INIT: Once = Once::new();

/// Initializes the tracing subscriber for tests.
///
/// This function is wrapped in a `Once` block to ensure that the global
/// subscriber is set exactly one time, even when tests are run in parallel.
pub fn setup_test_logging() {
    LOGGING_INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok(); // Ignore the error if it's already set by another crate.
    });
}

/// Creates a project layout below `root`.
///
/// `dirs` are created as (possibly empty) directories, `files` are written
/// with their own path as content, creating parents as needed.
pub fn write_project(root: &Path, files: &[&str], dirs: &[&str]) -> io::Result<()> {
    for dir in dirs {
        fs::create_dir_all(root.join(dir))?;
    }
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, file)?;
    }
    Ok(())
}

/// Returns true when the current process runs as root (UID 0).
/// We use this to skip permission-sensitive tests in Docker/act.
#[cfg(any(test, doctest))]
#[inline]
pub fn running_as_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: libc call has no side effects; used for testing only.
        unsafe { libc::geteuid() == 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
