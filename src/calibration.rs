use serde::{Deserialize, Serialize};

/// Raw-unit range assumed to map onto the 0-5 V reference scale.
///
/// A reading at `min` corresponds to 0 V, a reading at `max` to 5 V.
/// Fixed per deployment; comes from the `[calibration]` settings section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationWindow {
    pub min: f64,
    pub max: f64,
}

/// Convert a raw analog level to a decibel value against a calibration window.
///
/// Total over all inputs: a zero-span window, a non-positive voltage, or any
/// other degenerate combination yields `0.0` rather than NaN or infinity.
pub fn convert(level: f64, window: &CalibrationWindow) -> f64 {
    let span = window.max - window.min;
    let voltage = (level - window.min) * (5.0 / span);
    let raw_db = 20.0 * voltage.log10();
    if raw_db.is_finite() && raw_db >= 0.0 {
        round1(raw_db)
    } else {
        0.0
    }
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
