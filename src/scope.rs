use chrono::Local;

use crate::record::RawRecord;

/// The calendar day the record collection is filtered to.
///
/// `Today` is the default when the user has not picked a day; it resolves to
/// the local wall-clock date at filter time, so a view left open over
/// midnight starts matching the new day on its next recompute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DateScope {
    #[default]
    Today,
    Day(String),
}

impl DateScope {
    /// Resolve to a concrete `YYYY-MM-DD` day string.
    pub fn resolve(&self) -> String {
        match self {
            DateScope::Today => Local::now().format("%Y-%m-%d").to_string(),
            DateScope::Day(day) => date_part(day).to_string(),
        }
    }
}

/// Date portion of a timestamp: everything before the time separator.
pub fn date_part(date: &str) -> &str {
    date.split('T').next().unwrap_or(date)
}

/// Select the records belonging to the scoped day, preserving order.
pub fn filter_by_scope(records: &[RawRecord], scope: &DateScope) -> Vec<RawRecord> {
    let day = scope.resolve();
    records
        .iter()
        .filter(|record| date_part(&record.date) == day)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str, level: f64) -> RawRecord {
        RawRecord { date: date.to_string(), level }
    }

    #[test]
    fn test_date_part_truncates_time() {
        assert_eq!(date_part("2024-01-01T10:00:00"), "2024-01-01");
        assert_eq!(date_part("2024-01-01"), "2024-01-01");
    }

    #[test]
    fn test_explicit_scope_accepts_time_suffix() {
        let scope = DateScope::Day("2024-01-01T23:59:00".to_string());
        assert_eq!(scope.resolve(), "2024-01-01");
    }

    #[test]
    fn test_today_resolves_zero_padded() {
        let day = DateScope::Today.resolve();
        assert_eq!(day.len(), 10);
        assert_eq!(&day[4..5], "-");
        assert_eq!(&day[7..8], "-");
    }

    #[test]
    fn test_filter_preserves_order_and_input() {
        let records = vec![
            record("2024-01-01T10:00:00", 10.0),
            record("2024-01-02T09:00:00", 50.0),
            record("2024-01-01T11:00:00", 30.0),
        ];
        let scope = DateScope::Day("2024-01-01".to_string());
        let matched = filter_by_scope(&records, &scope);
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].level, 10.0);
        assert_eq!(matched[1].level, 30.0);
        // input untouched
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_filter_no_matches_is_empty_not_error() {
        let records = vec![record("2024-01-01", 10.0)];
        let scope = DateScope::Day("2024-06-15".to_string());
        assert!(filter_by_scope(&records, &scope).is_empty());
    }
}
