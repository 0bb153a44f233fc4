//! Warehouse price history tests
//!
//! Tests for the append-only price log:
//! - submissions append, never overwrite
//! - the as-of query picks the latest row at or before the cutoff

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
}

/// One appended price row, reduced to what the as-of query looks at
#[derive(Debug, Clone, Copy, PartialEq)]
struct PriceRow {
    company_price: Decimal,
    effective_at: DateTime<Utc>,
}

/// In-memory equivalent of the as-of selection: latest row with
/// `effective_at <= cutoff`
fn price_as_of(history: &[PriceRow], cutoff: DateTime<Utc>) -> Option<PriceRow> {
    history
        .iter()
        .filter(|row| row.effective_at <= cutoff)
        .max_by_key(|row| row.effective_at)
        .copied()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Submissions append; the history keeps every row
    #[test]
    fn test_submissions_append() {
        let mut history = Vec::new();
        history.push(PriceRow {
            company_price: dec("100"),
            effective_at: at(9),
        });
        history.push(PriceRow {
            company_price: dec("110"),
            effective_at: at(12),
        });

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].company_price, dec("100"));
    }

    /// Querying between two rows returns the earlier one
    #[test]
    fn test_as_of_between_rows() {
        let history = [
            PriceRow { company_price: dec("100"), effective_at: at(9) },
            PriceRow { company_price: dec("110"), effective_at: at(12) },
        ];

        let picked = price_as_of(&history, at(10)).unwrap();
        assert_eq!(picked.company_price, dec("100"));
    }

    /// Querying at or after the newest row returns it
    #[test]
    fn test_as_of_at_and_after_latest() {
        let history = [
            PriceRow { company_price: dec("100"), effective_at: at(9) },
            PriceRow { company_price: dec("110"), effective_at: at(12) },
        ];

        assert_eq!(price_as_of(&history, at(12)).unwrap().company_price, dec("110"));
        assert_eq!(price_as_of(&history, at(18)).unwrap().company_price, dec("110"));
    }

    /// Querying before the first row finds nothing
    #[test]
    fn test_as_of_before_first_row() {
        let history = [
            PriceRow { company_price: dec("100"), effective_at: at(9) },
        ];

        assert!(price_as_of(&history, at(8)).is_none());
    }

    /// A correction is a newer row, not an edit; the old value stays
    /// queryable at its own time
    #[test]
    fn test_correction_preserves_history() {
        let history = [
            PriceRow { company_price: dec("100"), effective_at: at(9) },
            // Same-day correction
            PriceRow { company_price: dec("95"), effective_at: at(10) },
        ];

        assert_eq!(price_as_of(&history, at(9)).unwrap().company_price, dec("100"));
        assert_eq!(price_as_of(&history, at(11)).unwrap().company_price, dec("95"));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn history_strategy() -> impl Strategy<Value = Vec<PriceRow>> {
        prop::collection::vec((price_strategy(), 0u32..=23), 1..15).prop_map(|rows| {
            rows.into_iter()
                .map(|(price, hour)| PriceRow {
                    company_price: price,
                    effective_at: at(hour),
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// The as-of result is never from after the cutoff
        #[test]
        fn prop_as_of_respects_cutoff(
            history in history_strategy(),
            cutoff_hour in 0u32..=23
        ) {
            let cutoff = at(cutoff_hour);
            if let Some(picked) = price_as_of(&history, cutoff) {
                prop_assert!(picked.effective_at <= cutoff);
            } else {
                // Nothing picked means nothing qualified
                prop_assert!(history.iter().all(|r| r.effective_at > cutoff));
            }
        }

        /// Among qualifying rows, the picked one is the newest
        #[test]
        fn prop_as_of_picks_latest(
            history in history_strategy(),
            cutoff_hour in 0u32..=23
        ) {
            let cutoff = at(cutoff_hour);
            if let Some(picked) = price_as_of(&history, cutoff) {
                for row in history.iter().filter(|r| r.effective_at <= cutoff) {
                    prop_assert!(row.effective_at <= picked.effective_at);
                }
            }
        }

        /// Appending a row never changes answers for cutoffs before it
        #[test]
        fn prop_append_is_non_destructive(
            history in history_strategy(),
            new_price in price_strategy()
        ) {
            let mut extended = history.clone();
            extended.push(PriceRow {
                company_price: new_price,
                effective_at: at(23),
            });

            for cutoff_hour in 0..23u32 {
                let cutoff = at(cutoff_hour);
                prop_assert_eq!(price_as_of(&history, cutoff), price_as_of(&extended, cutoff));
            }
        }
    }
}
