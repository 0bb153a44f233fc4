//! Common wire types used across the backend

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Uniform JSON response envelope
///
/// Success responses carry `data` and a null `error`; failures carry
/// `error` and null `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>, error: ErrorBody) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(error),
        }
    }
}

/// Error payload of a failed response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Inclusive date range for queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Preset date windows for the timeline query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePreset {
    Last7Days,
    Last30Days,
    Last90Days,
    ThisYear,
    Custom,
}

impl RangePreset {
    /// Resolve the preset to an inclusive window ending today.
    ///
    /// `Custom` has no implied window; the caller supplies explicit bounds.
    pub fn window(&self, today: NaiveDate) -> Option<DateRange> {
        let start = match self {
            RangePreset::Last7Days => today.checked_sub_days(Days::new(6))?,
            RangePreset::Last30Days => today.checked_sub_days(Days::new(29))?,
            RangePreset::Last90Days => today.checked_sub_days(Days::new(89))?,
            RangePreset::ThisYear => NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
            RangePreset::Custom => return None,
        };
        Some(DateRange { start, end: today })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_last7days_window() {
        let range = RangePreset::Last7Days.window(date(2024, 3, 15)).unwrap();
        assert_eq!(range.start, date(2024, 3, 9));
        assert_eq!(range.end, date(2024, 3, 15));
        // Seven calendar days inclusive
        assert_eq!((range.end - range.start).num_days(), 6);
    }

    #[test]
    fn test_last30days_window() {
        let range = RangePreset::Last30Days.window(date(2024, 3, 15)).unwrap();
        assert_eq!((range.end - range.start).num_days(), 29);
        assert_eq!(range.end, date(2024, 3, 15));
    }

    #[test]
    fn test_last90days_window() {
        let range = RangePreset::Last90Days.window(date(2024, 3, 15)).unwrap();
        assert_eq!((range.end - range.start).num_days(), 89);
    }

    #[test]
    fn test_this_year_window() {
        let range = RangePreset::ThisYear.window(date(2024, 3, 15)).unwrap();
        assert_eq!(range.start, date(2024, 1, 1));
        assert_eq!(range.end, date(2024, 3, 15));
    }

    #[test]
    fn test_custom_has_no_implied_window() {
        assert!(RangePreset::Custom.window(date(2024, 3, 15)).is_none());
    }
}
