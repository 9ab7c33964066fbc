use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::calibration::CalibrationWindow;
use crate::record::{DecibelRecord, RawRecord};
use crate::scope::{date_part, filter_by_scope, DateScope};
use crate::stats::{aggregate, Statistics};

/// One event per independent external signal the monitor tracks.
///
/// Delivered on a single-consumer channel so no two recomputations can
/// interleave; there is no ordering between the variants beyond arrival.
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// Full snapshot of the remote record collection (never a delta).
    Records(Vec<RawRecord>),
    /// User picked a day to scope the view to.
    Scope(DateScope),
    /// The store's power flag changed (0/1).
    Power(i64),
    /// The store's threshold node changed.
    Threshold(f64),
}

/// Read-only state snapshot published after every event.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct MonitorSnapshot {
    pub records: Vec<DecibelRecord>,
    pub stats: Statistics,
    pub record_text: String,
    pub power_on: bool,
    pub power_text: String,
    pub threshold: f64,
}

/// Recompute orchestrator.
///
/// Exclusively owns the latest record snapshot and the active scope, and
/// re-derives the published output from those two alone on every records or
/// scope event. Power and threshold updates republish without touching the
/// record pipeline.
pub struct MonitorManager {
    window: CalibrationWindow,
    records: Vec<RawRecord>,
    scope: DateScope,
    view: Vec<DecibelRecord>,
    stats: Statistics,
    record_text: String,
    power_on: bool,
    threshold: f64,
    out: watch::Sender<MonitorSnapshot>,
}

impl MonitorManager {
    pub fn new(window: CalibrationWindow, out: watch::Sender<MonitorSnapshot>) -> Self {
        Self {
            window,
            records: Vec::new(),
            scope: DateScope::Today,
            view: Vec::new(),
            stats: Statistics::default(),
            record_text: String::new(),
            power_on: false,
            threshold: 0.0,
            out,
        }
    }

    pub fn handle_event(&mut self, event: MonitorEvent) {
        match event {
            MonitorEvent::Records(records) => {
                debug!("monitor: records snapshot with {} entries", records.len());
                self.records = records;
                self.recompute();
            }
            MonitorEvent::Scope(scope) => {
                debug!("monitor: scope changed to {:?}", scope);
                self.scope = scope;
                self.recompute();
            }
            MonitorEvent::Power(value) => {
                self.power_on = value != 0;
                self.publish();
            }
            MonitorEvent::Threshold(value) => {
                self.threshold = value;
                self.publish();
            }
        }
    }

    fn recompute(&mut self) {
        let matched = filter_by_scope(&self.records, &self.scope);
        self.stats = aggregate(&matched, &self.window);
        self.view = matched
            .iter()
            .map(|record| DecibelRecord::from_raw(record, &self.window))
            .collect();
        self.record_text = self.count_text(matched.len());
        self.publish();
    }

    /// Phrasing distinguishes a view of the current day (default or an
    /// explicit pick that happens to be today) from an explicit other day.
    fn count_text(&self, count: usize) -> String {
        let is_today = match &self.scope {
            DateScope::Today => true,
            DateScope::Day(day) => date_part(day) == DateScope::Today.resolve(),
        };
        if is_today {
            format!("Triggered {} times today", count)
        } else {
            format!("Triggered {} times", count)
        }
    }

    fn publish(&self) {
        let snapshot = MonitorSnapshot {
            records: self.view.clone(),
            stats: self.stats.clone(),
            record_text: self.record_text.clone(),
            power_on: self.power_on,
            power_text: if self.power_on { "On" } else { "Off" }.to_string(),
            threshold: self.threshold,
        };
        if self.out.send(snapshot).is_err() {
            warn!("monitor: snapshot dropped, presentation side is gone");
        }
    }
}

/// Single-consumer dispatch loop: each event is handled fully before the
/// next is received. Exits when the token is cancelled or all senders drop.
pub async fn run_monitor(
    mut events: mpsc::Receiver<MonitorEvent>,
    mut manager: MonitorManager,
    cancel: CancellationToken,
) {
    info!("monitor: started");
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("monitor: cancelled");
                break;
            }
            event = events.recv() => {
                match event {
                    Some(event) => manager.handle_event(event),
                    None => {
                        info!("monitor: event channel closed");
                        break;
                    }
                }
            }
        }
    }
}
