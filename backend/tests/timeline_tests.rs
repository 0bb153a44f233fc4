//! Timeline tests
//!
//! Tests for the movement timeline view:
//! - preset date windows resolve correctly
//! - grouping partitions movements exactly by route

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::{
    group_movements, DestinationType, InventoryMovement, InventoryType, RangePreset, SourceType,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn movement(
    quantity: i64,
    source_type: SourceType,
    destination_type: DestinationType,
) -> InventoryMovement {
    InventoryMovement {
        id: Uuid::new_v4(),
        organization_id: Uuid::nil(),
        item_id: Uuid::nil(),
        quantity: Decimal::new(quantity, 0),
        inventory_type: InventoryType::Billed,
        source_type,
        source_id: Uuid::new_v4(),
        destination_type,
        destination_id: Uuid::new_v4(),
        recorded_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Each preset resolves to an inclusive window ending today
    #[test]
    fn test_preset_windows_end_today() {
        let today = date(2024, 6, 15);
        for preset in [
            RangePreset::Last7Days,
            RangePreset::Last30Days,
            RangePreset::Last90Days,
            RangePreset::ThisYear,
        ] {
            let window = preset.window(today).unwrap();
            assert_eq!(window.end, today);
            assert!(window.start <= window.end);
        }
    }

    /// Window lengths count calendar days inclusively
    #[test]
    fn test_preset_window_lengths() {
        let today = date(2024, 6, 15);
        let days = |preset: RangePreset| {
            let w = preset.window(today).unwrap();
            (w.end - w.start).num_days() + 1
        };

        assert_eq!(days(RangePreset::Last7Days), 7);
        assert_eq!(days(RangePreset::Last30Days), 30);
        assert_eq!(days(RangePreset::Last90Days), 90);
    }

    /// This-year starts on January 1st of the query year
    #[test]
    fn test_this_year_starts_january_first() {
        let window = RangePreset::ThisYear.window(date(2024, 6, 15)).unwrap();
        assert_eq!(window.start, date(2024, 1, 1));
    }

    /// The custom preset carries no implied window
    #[test]
    fn test_custom_preset_has_no_window() {
        assert!(RangePreset::Custom.window(date(2024, 6, 15)).is_none());
    }

    /// Movements sharing a route land in one group with a summed total
    #[test]
    fn test_grouping_sums_totals() {
        let movements = vec![
            movement(10, SourceType::Manufacturer, DestinationType::Warehouse),
            movement(5, SourceType::Warehouse, DestinationType::Buyer),
            movement(20, SourceType::Manufacturer, DestinationType::Warehouse),
        ];

        let groups = group_movements(movements);
        assert_eq!(groups.len(), 2);

        let inbound = &groups[0];
        assert_eq!(inbound.source_type, SourceType::Manufacturer);
        assert_eq!(inbound.total_quantity, Decimal::new(30, 0));
        assert_eq!(inbound.movements.len(), 2);

        let outbound = &groups[1];
        assert_eq!(outbound.destination_type, DestinationType::Buyer);
        assert_eq!(outbound.total_quantity, Decimal::new(5, 0));
    }

    /// Groups appear in first-seen order
    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let movements = vec![
            movement(1, SourceType::Warehouse, DestinationType::Booking),
            movement(2, SourceType::Order, DestinationType::Warehouse),
            movement(3, SourceType::Warehouse, DestinationType::Booking),
        ];

        let groups = group_movements(movements);
        assert_eq!(groups[0].destination_type, DestinationType::Booking);
        assert_eq!(groups[1].source_type, SourceType::Order);
    }

    /// No movements, no groups
    #[test]
    fn test_grouping_empty_input() {
        assert!(group_movements(Vec::new()).is_empty());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn source_strategy() -> impl Strategy<Value = SourceType> {
        prop_oneof![
            Just(SourceType::Manufacturer),
            Just(SourceType::Order),
            Just(SourceType::Warehouse),
        ]
    }

    fn destination_strategy() -> impl Strategy<Value = DestinationType> {
        prop_oneof![
            Just(DestinationType::Warehouse),
            Just(DestinationType::Buyer),
            Just(DestinationType::Booking),
        ]
    }

    fn movements_strategy() -> impl Strategy<Value = Vec<InventoryMovement>> {
        prop::collection::vec(
            (1i64..=1000, source_strategy(), destination_strategy()),
            0..30,
        )
        .prop_map(|specs| {
            specs
                .into_iter()
                .map(|(quantity, source, destination)| movement(quantity, source, destination))
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Grouping partitions the input: every movement lands in exactly
        /// one group, and that group matches its route
        #[test]
        fn prop_grouping_partitions_movements(movements in movements_strategy()) {
            let total = movements.len();
            let groups = group_movements(movements);

            let mut grouped = 0;
            for group in &groups {
                for m in &group.movements {
                    prop_assert_eq!(m.source_type, group.source_type);
                    prop_assert_eq!(m.destination_type, group.destination_type);
                }
                grouped += group.movements.len();
            }
            prop_assert_eq!(grouped, total);

            // Routes are unique across groups
            for (i, a) in groups.iter().enumerate() {
                for b in groups.iter().skip(i + 1) {
                    prop_assert!(
                        (a.source_type, a.destination_type) != (b.source_type, b.destination_type)
                    );
                }
            }
        }

        /// Group totals equal the sum of their members
        #[test]
        fn prop_group_totals_are_sums(movements in movements_strategy()) {
            let groups = group_movements(movements);
            for group in groups {
                let sum: Decimal = group.movements.iter().map(|m| m.quantity).sum();
                prop_assert_eq!(group.total_quantity, sum);
            }
        }

        /// Preset windows always contain today and start no earlier than
        /// their nominal length
        #[test]
        fn prop_preset_windows_contain_today(
            year in 2020i32..=2030,
            month in 1u32..=12,
            day in 1u32..=28
        ) {
            let today = date(year, month, day);
            for preset in [
                RangePreset::Last7Days,
                RangePreset::Last30Days,
                RangePreset::Last90Days,
                RangePreset::ThisYear,
            ] {
                let window = preset.window(today).unwrap();
                prop_assert!(window.start <= today);
                prop_assert_eq!(window.end, today);
            }
        }
    }
}
