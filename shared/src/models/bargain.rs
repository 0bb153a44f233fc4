//! Bargain lifecycle: statuses, bill types, and status computation
//!
//! Orders (procurement side) and Bookings (sales side) share one lifecycle:
//! `created -> partial -> complete`, driven only by fulfillment events.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an order or booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BargainStatus {
    Created,
    Partial,
    Complete,
}

impl BargainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BargainStatus::Created => "created",
            BargainStatus::Partial => "partial",
            BargainStatus::Complete => "complete",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "created" => Some(BargainStatus::Created),
            "partial" => Some(BargainStatus::Partial),
            "complete" => Some(BargainStatus::Complete),
            _ => None,
        }
    }

    /// Terminal bargains accept no further fulfillment
    pub fn is_terminal(&self) -> bool {
        matches!(self, BargainStatus::Complete)
    }
}

/// How a bargain is invoiced; selects the warehouse stock bucket fed or
/// drawn by its fulfillment events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillType {
    VirtualBilled,
    Billed,
}

impl BillType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillType::VirtualBilled => "virtual_billed",
            BillType::Billed => "billed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "virtual_billed" => Some(BillType::VirtualBilled),
            "billed" => Some(BillType::Billed),
            _ => None,
        }
    }
}

/// Price column an order is negotiated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportCategory {
    Company,
    Rack,
    Depot,
    Plant,
}

impl TransportCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportCategory::Company => "company",
            TransportCategory::Rack => "rack",
            TransportCategory::Depot => "depot",
            TransportCategory::Plant => "plant",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "company" => Some(TransportCategory::Company),
            "rack" => Some(TransportCategory::Rack),
            "depot" => Some(TransportCategory::Depot),
            "plant" => Some(TransportCategory::Plant),
            _ => None,
        }
    }
}

/// Fulfillment progress of a single bargain line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineProgress {
    pub ordered: Decimal,
    pub fulfilled: Decimal,
}

impl LineProgress {
    pub fn new(ordered: Decimal, fulfilled: Decimal) -> Self {
        Self { ordered, fulfilled }
    }

    pub fn is_full(&self) -> bool {
        self.fulfilled >= self.ordered
    }

    pub fn remaining(&self) -> Decimal {
        self.ordered - self.fulfilled
    }
}

/// Compute a bargain's status from its line fulfillment.
///
/// `complete` iff there is at least one line and every line is fully
/// fulfilled; `created` iff nothing has been fulfilled; `partial` otherwise.
pub fn compute_status(lines: &[LineProgress]) -> BargainStatus {
    if lines.is_empty() {
        return BargainStatus::Created;
    }
    if lines.iter().all(LineProgress::is_full) {
        BargainStatus::Complete
    } else if lines.iter().any(|l| l.fulfilled > Decimal::ZERO) {
        BargainStatus::Partial
    } else {
        BargainStatus::Created
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(ordered: i64, fulfilled: i64) -> LineProgress {
        LineProgress::new(Decimal::from(ordered), Decimal::from(fulfilled))
    }

    #[test]
    fn test_status_created() {
        assert_eq!(
            compute_status(&[line(10, 0), line(5, 0)]),
            BargainStatus::Created
        );
    }

    #[test]
    fn test_status_partial_one_line_full() {
        assert_eq!(
            compute_status(&[line(10, 10), line(5, 0)]),
            BargainStatus::Partial
        );
    }

    #[test]
    fn test_status_partial_some_fulfilled() {
        assert_eq!(
            compute_status(&[line(100, 60)]),
            BargainStatus::Partial
        );
    }

    #[test]
    fn test_status_complete() {
        assert_eq!(
            compute_status(&[line(10, 10), line(5, 5)]),
            BargainStatus::Complete
        );
    }

    #[test]
    fn test_status_empty_lines_is_created() {
        assert_eq!(compute_status(&[]), BargainStatus::Created);
    }

    #[test]
    fn test_complete_is_terminal() {
        assert!(BargainStatus::Complete.is_terminal());
        assert!(!BargainStatus::Partial.is_terminal());
        assert!(!BargainStatus::Created.is_terminal());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            BargainStatus::Created,
            BargainStatus::Partial,
            BargainStatus::Complete,
        ] {
            assert_eq!(BargainStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BargainStatus::parse("billed"), None);
    }
}
