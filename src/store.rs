use tokio::sync::mpsc;
use tracing::warn;

/// Node paths in the remote key-value store.
pub mod path {
    pub const POWER: &str = "power/";
    pub const RECORDS: &str = "records/";
    /// Threshold / calibration-adjustment node.
    pub const AUDIO: &str = "audio/";
}

/// Fire-and-forget write to one of the store's scalar nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteCommand {
    SetPower(i64),
    SetThreshold(f64),
}

/// Actuation seam for the surrounding UI: enqueues writes for the external
/// store client. No acknowledgement handling; a full or closed queue is
/// logged and the write dropped.
#[derive(Clone)]
pub struct StoreWriter {
    tx: mpsc::Sender<WriteCommand>,
}

impl StoreWriter {
    pub fn new(tx: mpsc::Sender<WriteCommand>) -> Self {
        Self { tx }
    }

    pub fn set_power(&self, on: bool) {
        self.send(WriteCommand::SetPower(if on { 1 } else { 0 }));
    }

    pub fn set_threshold(&self, value: f64) {
        self.send(WriteCommand::SetThreshold(value));
    }

    fn send(&self, command: WriteCommand) {
        if let Err(e) = self.tx.try_send(command) {
            warn!("store: dropping write, queue unavailable: {}", e);
        }
    }
}

pub mod mock {
    use chrono::Local;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio_util::sync::CancellationToken;
    use tracing::info;

    use super::WriteCommand;
    use crate::monitor::MonitorEvent;
    use crate::record::RawRecord;
    use crate::settings::FeedSettings;

    /// Simulated store feed: appends one random-level record per tick and
    /// re-sends the full collection snapshot, matching the store's
    /// snapshot-not-delta semantics. Writes loop back as the corresponding
    /// value-change events, the way the store echoes a write to its
    /// subscribers.
    pub async fn run_feed(
        events: mpsc::Sender<MonitorEvent>,
        mut writes: mpsc::Receiver<WriteCommand>,
        settings: FeedSettings,
        cancel: CancellationToken,
    ) {
        let mut rng = StdRng::from_entropy();
        let mut interval = tokio::time::interval(Duration::from_millis(settings.interval_ms));
        let mut collection: Vec<RawRecord> = Vec::new();
        let mut writes_open = true;

        info!(
            "mock store: feeding a record every {}ms, levels 1..={}",
            settings.interval_ms, settings.max_level
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    let level = rng.gen_range(1..=settings.max_level) as f64;
                    collection.push(RawRecord {
                        date: Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
                        level,
                    });
                    if events.send(MonitorEvent::Records(collection.clone())).await.is_err() {
                        break;
                    }
                }
                command = writes.recv(), if writes_open => {
                    let echoed = match command {
                        Some(WriteCommand::SetPower(value)) => MonitorEvent::Power(value),
                        Some(WriteCommand::SetThreshold(value)) => MonitorEvent::Threshold(value),
                        None => {
                            writes_open = false;
                            continue;
                        }
                    };
                    if events.send(echoed).await.is_err() {
                        break;
                    }
                }
            }
        }

        info!("mock store: stopped");
    }
}
