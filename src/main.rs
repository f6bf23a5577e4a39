use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use structure_watcher::app::{self, WatchEvent, WatcherState};
use structure_watcher::config::{settings, AppConfig};

/// Keep AI assistant rule files in sync with the project's directory layout.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Project root to watch (defaults to the configured root or the current directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Seconds between two scans
    #[arg(long, short = 'i')]
    interval: Option<u64>,

    /// Do not update .cursorrules
    #[arg(long)]
    no_cursor: bool,

    /// Do not update .windsurfrules
    #[arg(long)]
    no_windsurf: bool,

    /// Do not update .github/copilot-instructions.md
    #[arg(long)]
    no_copilot: bool,

    /// Run a single scan-and-update cycle, then exit
    #[arg(long)]
    once: bool,

    /// Read settings from this file instead of the platform config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Persist the effective settings before starting
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    /// Applies command line overrides on top of the persisted settings.
    fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(root) = &self.root {
            config.root = Some(root.clone());
        }
        if let Some(interval) = self.interval {
            config.interval_secs = interval;
        }
        config.use_cursor &= !self.no_cursor;
        config.use_windsurf &= !self.no_windsurf;
        config.use_copilot &= !self.no_copilot;
        config
    }
}

fn print_event(event: &WatchEvent) {
    println!("{}", app::log_line(event, Local::now()));
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let stored = settings::load_config(cli.config.as_deref())?;
    let app_config = cli.apply(stored);

    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let watch_config = app_config
        .watch_config(&current_dir)
        .context("Invalid watcher configuration")?;

    if watch_config.targets().is_empty() {
        tracing::warn!("💡 Tip: every rule file is disabled, only scans will run.");
    }

    if cli.save_config {
        let path = settings::save_config(&app_config, cli.config.as_deref())?;
        println!("Settings saved to {}", path.display());
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<WatchEvent>();

    if cli.once {
        let watcher =
            app::DirectoryWatcher::new(watch_config, tx, Arc::new(AtomicBool::new(true)));
        let outcome = tokio::task::spawn_blocking(move || watcher.run_cycle())
            .await
            .context("Scan task failed")?;

        while let Ok(event) = rx.try_recv() {
            print_event(&event);
        }

        let updated = outcome?;
        if updated {
            print_event(&WatchEvent::StructureUpdated { at: Local::now() });
        } else {
            println!("Rule files are already up to date.");
        }
        return Ok(());
    }

    let mut state = WatcherState::new(watch_config);
    state.start(tx)?;
    println!("Watcher started (Ctrl+C to stop)");

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => {
                    print_event(&event);
                    if event == WatchEvent::Stopped {
                        break;
                    }
                }
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl+C received, stopping watcher");
                state.stop();
            }
        }
    }

    state.join().await;
    println!("Watcher stopped");
    Ok(())
}
