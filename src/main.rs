use clap::Parser;
use std::path::PathBuf;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use noisewatch::monitor::{run_monitor, MonitorEvent, MonitorManager, MonitorSnapshot};
use noisewatch::scope::DateScope;
use noisewatch::settings::Settings;
use noisewatch::store::{self, StoreWriter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Monitoring front-end for a remote noise-level sensor", long_about = None)]
struct Args {
    /// Path to a settings file (TOML or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run against a simulated store feed instead of a live client
    #[arg(short, long, default_value_t = false)]
    mock: bool,

    /// Day to scope records to (YYYY-MM-DD); defaults to today
    #[arg(short, long)]
    scope: Option<String>,

    /// Dump the effective configuration to a file and exit
    #[arg(long)]
    dump_config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let settings = match Settings::new(args.config) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Failed to load settings: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(path) = args.dump_config {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => "yaml",
            _ => "toml",
        };
        match settings.dump(format) {
            Ok(content) => {
                if let Err(e) = std::fs::write(&path, content) {
                    tracing::error!("Failed to write config to {:?}: {}", path, e);
                    std::process::exit(1);
                }
                tracing::info!("Configuration dumped to {:?}", path);
                return;
            }
            Err(e) => {
                tracing::error!("Failed to dump config: {}", e);
                std::process::exit(1);
            }
        }
    }

    let cancel = CancellationToken::new();
    let (event_tx, event_rx) = mpsc::channel(settings.monitor.channel_capacity);
    let (snapshot_tx, mut snapshot_rx) = watch::channel(MonitorSnapshot::default());

    let manager = MonitorManager::new(settings.calibration.window(), snapshot_tx);
    let monitor_handle = tokio::spawn(run_monitor(event_rx, manager, cancel.clone()));

    // Presentation surrogate: log every published snapshot.
    let log_cancel = cancel.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = log_cancel.cancelled() => break,
                changed = snapshot_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = snapshot_rx.borrow_and_update().clone();
                    tracing::info!(
                        "{} | power: {} | threshold: {} | {}",
                        snapshot.record_text,
                        snapshot.power_text,
                        snapshot.threshold,
                        snapshot.stats.format_lite()
                    );
                }
            }
        }
    });

    if let Some(day) = args.scope {
        let _ = event_tx.send(MonitorEvent::Scope(DateScope::Day(day))).await;
    }

    // Writer is held open for the lifetime of the process; in mock mode its
    // commands loop back through the feed as store value changes.
    let (write_tx, write_rx) = mpsc::channel(16);
    let _writer = StoreWriter::new(write_tx);

    if args.mock {
        tracing::info!("Starting simulated store feed");
        let feed = settings.feed.clone();
        let feed_tx = event_tx.clone();
        let feed_cancel = cancel.clone();
        tokio::spawn(async move {
            store::mock::run_feed(feed_tx, write_rx, feed, feed_cancel).await;
        });
    } else {
        tracing::warn!(
            "No live store client is wired in (database_url: {}); run with --mock for a simulated feed",
            settings.store.database_url
        );
        // Drain actuation writes so the seam stays observable in logs.
        tokio::spawn(async move {
            let mut write_rx = write_rx;
            while let Some(command) = write_rx.recv().await {
                tracing::info!("store write (no client attached): {:?}", command);
            }
        });
    }

    shutdown_signal().await;
    cancel.cancel();
    let _ = monitor_handle.await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
