//! Bargain lifecycle tests
//!
//! Tests for the order/booking fulfillment machine:
//! - status computation from line progress
//! - fulfillment bounds (received/dispatched never exceed the bargain)
//! - bill-type bucket selection

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{compute_status, BargainStatus, BillType, LineProgress};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn line(ordered: &str, fulfilled: &str) -> LineProgress {
    LineProgress {
        ordered: dec(ordered),
        fulfilled: dec(fulfilled),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A bargain with no lines stays in created
    #[test]
    fn test_empty_bargain_is_created() {
        assert_eq!(compute_status(&[]), BargainStatus::Created);
    }

    /// Nothing fulfilled yet keeps the bargain in created
    #[test]
    fn test_untouched_lines_are_created() {
        let lines = [line("100", "0"), line("50", "0")];
        assert_eq!(compute_status(&lines), BargainStatus::Created);
    }

    /// Any progress at all moves the bargain to partial
    #[test]
    fn test_any_progress_is_partial() {
        let lines = [line("100", "0.001"), line("50", "0")];
        assert_eq!(compute_status(&lines), BargainStatus::Partial);
    }

    /// One full line among open ones is still partial
    #[test]
    fn test_one_full_line_is_still_partial() {
        let lines = [line("100", "100"), line("50", "0")];
        assert_eq!(compute_status(&lines), BargainStatus::Partial);
    }

    /// All lines full means complete
    #[test]
    fn test_all_lines_full_is_complete() {
        let lines = [line("100", "100"), line("50", "50")];
        assert_eq!(compute_status(&lines), BargainStatus::Complete);
        assert!(BargainStatus::Complete.is_terminal());
    }

    /// Status strings round-trip through the wire vocabulary
    #[test]
    fn test_status_vocabulary() {
        for status in [
            BargainStatus::Created,
            BargainStatus::Partial,
            BargainStatus::Complete,
        ] {
            assert_eq!(BargainStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BargainStatus::parse("cancelled"), None);
    }

    /// Remaining quantity on a line
    #[test]
    fn test_line_remaining() {
        let l = line("100", "30");
        assert_eq!(l.remaining(), dec("70"));
        assert!(!l.is_full());
        assert!(line("100", "100").is_full());
    }

    /// A purchase against a virtual-billed order credits the virtual bucket
    #[test]
    fn test_bill_type_selects_bucket() {
        let (v, b) = bucket_deltas(BillType::VirtualBilled, dec("40"));
        assert_eq!((v, b), (dec("40"), Decimal::ZERO));

        let (v, b) = bucket_deltas(BillType::Billed, dec("40"));
        assert_eq!((v, b), (Decimal::ZERO, dec("40")));
    }

    /// Booking sold buckets are bounded by the booked quantity as a sum
    #[test]
    fn test_booking_bucket_sum_bound() {
        let quantity = dec("100");
        let virtual_sold = dec("60");
        let billed_sold = dec("30");

        // 15 more would push the sum past the booked quantity
        assert!(!advance_allowed(quantity, virtual_sold + billed_sold, dec("15")));
        assert!(advance_allowed(quantity, virtual_sold + billed_sold, dec("10")));
    }
}

/// Stock deltas a purchase applies for a given bill type
fn bucket_deltas(bill_type: BillType, quantity: Decimal) -> (Decimal, Decimal) {
    match bill_type {
        BillType::VirtualBilled => (quantity, Decimal::ZERO),
        BillType::Billed => (Decimal::ZERO, quantity),
    }
}

/// Guard applied before advancing a line: sold-so-far plus the new quantity
/// must stay within the bargained quantity
fn advance_allowed(bargained: Decimal, fulfilled: Decimal, quantity: Decimal) -> bool {
    quantity > Decimal::ZERO && fulfilled + quantity <= bargained
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating positive quantities
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100_000i64).prop_map(|n| Decimal::new(n, 2)) // 0.01 to 1000.00
    }

    fn bill_type_strategy() -> impl Strategy<Value = BillType> {
        prop_oneof![Just(BillType::VirtualBilled), Just(BillType::Billed)]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Fulfilled quantity never exceeds the ordered quantity no matter
        /// how receipts are sequenced
        #[test]
        fn prop_fulfillment_never_overshoots(
            ordered in quantity_strategy(),
            receipts in prop::collection::vec(quantity_strategy(), 1..20)
        ) {
            let mut fulfilled = Decimal::ZERO;
            for receipt in receipts {
                if advance_allowed(ordered, fulfilled, receipt) {
                    fulfilled += receipt;
                }
                prop_assert!(fulfilled <= ordered);
            }
        }

        /// Status is created iff nothing happened, complete iff everything
        /// did, partial otherwise
        #[test]
        fn prop_status_matches_progress(
            lines in prop::collection::vec(
                (quantity_strategy(), quantity_strategy()),
                1..10
            )
        ) {
            let progress: Vec<LineProgress> = lines
                .iter()
                .map(|(ordered, fulfilled)| LineProgress {
                    ordered: *ordered,
                    // Clamp so the invariant the database enforces holds here too
                    fulfilled: (*fulfilled).min(*ordered),
                })
                .collect();

            let status = compute_status(&progress);
            let any_progress = progress.iter().any(|l| l.fulfilled > Decimal::ZERO);
            let all_full = progress.iter().all(|l| l.is_full());

            match status {
                BargainStatus::Created => prop_assert!(!any_progress),
                BargainStatus::Partial => prop_assert!(any_progress && !all_full),
                BargainStatus::Complete => prop_assert!(all_full),
            }
        }

        /// Status never moves backwards as receipts accumulate
        #[test]
        fn prop_status_is_monotone(
            ordered in quantity_strategy(),
            receipts in prop::collection::vec(quantity_strategy(), 1..20)
        ) {
            let rank = |s: BargainStatus| match s {
                BargainStatus::Created => 0,
                BargainStatus::Partial => 1,
                BargainStatus::Complete => 2,
            };

            let mut fulfilled = Decimal::ZERO;
            let mut last = rank(compute_status(&[LineProgress { ordered, fulfilled }]));
            for receipt in receipts {
                if advance_allowed(ordered, fulfilled, receipt) {
                    fulfilled += receipt;
                }
                let current = rank(compute_status(&[LineProgress { ordered, fulfilled }]));
                prop_assert!(current >= last);
                last = current;
            }
        }

        /// A purchase credits exactly one bucket and by exactly its quantity
        #[test]
        fn prop_purchase_credits_one_bucket(
            bill_type in bill_type_strategy(),
            quantity in quantity_strategy()
        ) {
            let (virtual_delta, billed_delta) = bucket_deltas(bill_type, quantity);
            prop_assert_eq!(virtual_delta + billed_delta, quantity);
            prop_assert!(virtual_delta == Decimal::ZERO || billed_delta == Decimal::ZERO);
        }
    }
}

// ============================================================================
// Simulation Helpers (mirror the transactional flows without a database)
// ============================================================================

#[cfg(test)]
mod simulation {
    use super::*;

    /// One warehouse stock row
    #[derive(Debug, Clone, Copy, Default)]
    struct Stock {
        virtual_quantity: Decimal,
        billed_quantity: Decimal,
    }

    /// Simulate a sale debit against the bucket a bill type selects
    fn simulate_sale_debit(
        stock: Stock,
        bill_type: BillType,
        quantity: Decimal,
    ) -> Result<Stock, &'static str> {
        if quantity <= Decimal::ZERO {
            return Err("Quantity must be positive");
        }
        let mut next = stock;
        match bill_type {
            BillType::VirtualBilled => {
                if stock.virtual_quantity < quantity {
                    return Err("Insufficient inventory");
                }
                next.virtual_quantity -= quantity;
            }
            BillType::Billed => {
                if stock.billed_quantity < quantity {
                    return Err("Insufficient inventory");
                }
                next.billed_quantity -= quantity;
            }
        }
        Ok(next)
    }

    /// Sales only touch the bucket matching the booking's bill type
    #[test]
    fn test_sale_debits_matching_bucket() {
        let stock = Stock {
            virtual_quantity: dec("10"),
            billed_quantity: dec("5"),
        };

        let after = simulate_sale_debit(stock, BillType::VirtualBilled, dec("4")).unwrap();
        assert_eq!(after.virtual_quantity, dec("6"));
        assert_eq!(after.billed_quantity, dec("5"));
    }

    /// A sale bigger than the selected bucket is rejected even when the
    /// other bucket could cover it
    #[test]
    fn test_sale_rejected_when_bucket_short() {
        let stock = Stock {
            virtual_quantity: dec("10"),
            billed_quantity: dec("2"),
        };

        let result = simulate_sale_debit(stock, BillType::Billed, dec("5"));
        assert_eq!(result.unwrap_err(), "Insufficient inventory");
    }

    /// Full cycle: order, receive in two purchases, sell out
    #[test]
    fn test_full_lifecycle() {
        let ordered = dec("100");
        let mut fulfilled = Decimal::ZERO;
        let mut stock = Stock::default();

        // First receipt
        assert!(advance_allowed(ordered, fulfilled, dec("60")));
        fulfilled += dec("60");
        stock.billed_quantity += dec("60");
        assert_eq!(
            compute_status(&[LineProgress { ordered, fulfilled }]),
            BargainStatus::Partial
        );

        // Second receipt completes the order
        assert!(advance_allowed(ordered, fulfilled, dec("40")));
        fulfilled += dec("40");
        stock.billed_quantity += dec("40");
        assert_eq!(
            compute_status(&[LineProgress { ordered, fulfilled }]),
            BargainStatus::Complete
        );

        // A third receipt would overshoot
        assert!(!advance_allowed(ordered, fulfilled, dec("0.01")));

        // Sell everything back out of the billed bucket
        stock = simulate_sale_debit(stock, BillType::Billed, dec("100")).unwrap();
        assert_eq!(stock.billed_quantity, Decimal::ZERO);
    }
}
