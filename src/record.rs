use serde::{Deserialize, Serialize};

use crate::calibration::{convert, CalibrationWindow};

/// One reading as it appears in the remote record collection.
///
/// Records have no unique id; identity is structural and duplicates are
/// counted independently. The `date` string may be date-only or carry a
/// time component (`YYYY-MM-DDTHH:mm:ss`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub date: String,
    pub level: f64,
}

/// A reading with its calibrated decibel value, derived for display.
/// Never written back to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecibelRecord {
    pub date: String,
    pub level: f64,
    #[serde(rename = "dB")]
    pub db: f64,
}

impl DecibelRecord {
    pub fn from_raw(record: &RawRecord, window: &CalibrationWindow) -> Self {
        Self {
            date: record.date.clone(),
            level: record.level,
            db: convert(record.level, window),
        }
    }
}
