use serde::Serialize;

use crate::calibration::{convert, round2, CalibrationWindow};
use crate::record::RawRecord;

/// Aggregate statistics over one day's records, in raw and decibel domains.
///
/// Rebuilt from scratch on every recompute, never patched incrementally.
/// Serialized field names match the shape the presentation layer expects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
    #[serde(rename = "maxAnalog")]
    pub max_analog: f64,
    #[serde(rename = "minAnalog")]
    pub min_analog: f64,
    #[serde(rename = "rangeAnalog")]
    pub range_analog: f64,
    #[serde(rename = "meanAnalog")]
    pub mean_analog: f64,
    #[serde(rename = "maxdB")]
    pub max_db: f64,
    #[serde(rename = "mindB")]
    pub min_db: f64,
    #[serde(rename = "rangedB")]
    pub range_db: f64,
    #[serde(rename = "meandB")]
    pub mean_db: f64,
}

impl Statistics {
    pub fn format_lite(&self) -> String {
        format!(
            "max:{}|min:{}|range:{}|mean:{}|maxdB:{}|mindB:{}|rangedB:{}|meandB:{}",
            self.max_analog,
            self.min_analog,
            self.range_analog,
            self.mean_analog,
            self.max_db,
            self.min_db,
            self.range_db,
            self.mean_db
        )
    }
}

/// Reduce a record subset to its eight statistics.
///
/// The max scan is seeded at 0 and the min scan from the computed max, both
/// with strict comparators (first-seen value wins a tie). An empty input
/// yields all-zero analog fields, never NaN.
pub fn aggregate(records: &[RawRecord], window: &CalibrationWindow) -> Statistics {
    let mut max_analog = 0.0_f64;
    for record in records {
        if record.level > max_analog {
            max_analog = record.level;
        }
    }

    let mut min_analog = max_analog;
    for record in records {
        if record.level < min_analog {
            min_analog = record.level;
        }
    }

    let range_analog = max_analog - min_analog;

    let mean_analog = if records.is_empty() {
        0.0
    } else {
        let sum: f64 = records.iter().map(|record| record.level).sum();
        round2(sum / records.len() as f64)
    };

    Statistics {
        max_analog,
        min_analog,
        range_analog,
        mean_analog,
        max_db: convert(max_analog, window),
        min_db: convert(min_analog, window),
        range_db: convert(range_analog, window),
        mean_db: convert(mean_analog, window),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(level: f64) -> RawRecord {
        RawRecord { date: "2024-01-01".to_string(), level }
    }

    fn window() -> CalibrationWindow {
        CalibrationWindow { min: 2900.0, max: 3100.0 }
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let stats = aggregate(&[], &window());
        assert_eq!(stats.max_analog, 0.0);
        assert_eq!(stats.min_analog, 0.0);
        assert_eq!(stats.range_analog, 0.0);
        assert_eq!(stats.mean_analog, 0.0);
        assert_eq!(stats.max_db, convert(0.0, &window()));
    }

    #[test]
    fn test_min_scan_seeded_from_max() {
        // All levels above zero: min must come from the data, not from the
        // zero seed the max scan starts at.
        let stats = aggregate(&[record(3000.0), record(2950.0)], &window());
        assert_eq!(stats.max_analog, 3000.0);
        assert_eq!(stats.min_analog, 2950.0);
        assert_eq!(stats.range_analog, 50.0);
    }

    #[test]
    fn test_range_db_derived_from_raw_range() {
        let stats = aggregate(&[record(3000.0), record(2950.0)], &window());
        assert_eq!(stats.range_db, convert(stats.range_analog, &window()));
    }

    #[test]
    fn test_mean_rounds_to_two_decimals() {
        let stats = aggregate(&[record(10.0), record(10.0), record(11.0)], &window());
        assert_eq!(stats.mean_analog, 10.33);
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(Statistics::default()).unwrap();
        assert!(value.get("maxAnalog").is_some());
        assert!(value.get("rangedB").is_some());
    }
}
