//! Master data validation tests
//!
//! Tests for the Indian business identifier checks shared by buyers,
//! manufacturers and transports: GSTIN structure and checksum, phone
//! numbers, pincodes.

use proptest::prelude::*;

use shared::{
    gstin_check_char, validate_gstin, validate_indian_phone, validate_pincode,
    validate_positive_quantity,
};

/// Build a structurally valid GSTIN from a first-14 prefix by computing
/// its check character
fn with_checksum(first14: &str) -> String {
    let check = gstin_check_char(first14).unwrap();
    format!("{first14}{check}")
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;
    use rust_decimal::Decimal;

    /// A known-good GSTIN passes
    #[test]
    fn test_valid_gstin() {
        assert!(validate_gstin("22AAAAA0000A1ZC").is_ok());
    }

    /// Wrong length fails before any checksum work
    #[test]
    fn test_gstin_length() {
        assert!(validate_gstin("22AAAAA0000A1Z").is_err());
        assert!(validate_gstin("22AAAAA0000A1ZCC").is_err());
    }

    /// The 14th character must be the literal 'Z'
    #[test]
    fn test_gstin_z_position() {
        assert!(validate_gstin("22AAAAA0000A1YC").is_err());
    }

    /// State code must be numeric, PAN letters must be letters
    #[test]
    fn test_gstin_structure() {
        assert!(validate_gstin("2AAAAAA0000A1ZC").is_err());
        assert!(validate_gstin("22AAAA00000A1ZC").is_err());
    }

    /// A single corrupted character breaks the checksum
    #[test]
    fn test_gstin_checksum_detects_corruption() {
        let valid = "22AAAAA0000A1ZC";
        assert!(validate_gstin(valid).is_ok());

        // Flip the first digit; structure stays valid, checksum does not
        let corrupted = format!("12{}", &valid[2..]);
        assert!(validate_gstin(&corrupted).is_err());
    }

    /// Plain 10-digit mobile numbers starting 6-9 pass
    #[test]
    fn test_valid_phone_numbers() {
        assert!(validate_indian_phone("9876543210").is_ok());
        assert!(validate_indian_phone("6000000001").is_ok());
    }

    /// Country-code and trunk prefixes are accepted
    #[test]
    fn test_phone_prefixes() {
        assert!(validate_indian_phone("+919876543210").is_ok());
        assert!(validate_indian_phone("919876543210").is_ok());
        assert!(validate_indian_phone("09876543210").is_ok());
    }

    /// Landline-style and short numbers fail
    #[test]
    fn test_invalid_phone_numbers() {
        assert!(validate_indian_phone("1234567890").is_err());
        assert!(validate_indian_phone("98765").is_err());
        assert!(validate_indian_phone("abcdefghij").is_err());
    }

    /// Pincode is six digits and never starts with zero
    #[test]
    fn test_pincodes() {
        assert!(validate_pincode("560001").is_ok());
        assert!(validate_pincode("110001").is_ok());
        assert!(validate_pincode("060001").is_err());
        assert!(validate_pincode("5600").is_err());
        assert!(validate_pincode("56000A").is_err());
    }

    /// Quantities must be strictly positive
    #[test]
    fn test_positive_quantity() {
        assert!(validate_positive_quantity(Decimal::new(1, 3)).is_ok());
        assert!(validate_positive_quantity(Decimal::ZERO).is_err());
        assert!(validate_positive_quantity(Decimal::new(-5, 0)).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for a structurally valid GSTIN prefix (first 14 characters)
    fn gstin_prefix_strategy() -> impl Strategy<Value = String> {
        (
            10u32..=37,
            prop::collection::vec(prop::char::range('A', 'Z'), 5),
            0u32..=9999,
            prop::char::range('A', 'Z'),
            prop::char::range('1', '9'),
        )
            .prop_map(|(state, pan_letters, pan_digits, pan_tail, entity)| {
                let letters: String = pan_letters.into_iter().collect();
                format!("{state:02}{letters}{pan_digits:04}{pan_tail}{entity}Z")
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any structurally valid prefix plus its computed check character
        /// validates
        #[test]
        fn prop_computed_checksum_validates(prefix in gstin_prefix_strategy()) {
            let gstin = with_checksum(&prefix);
            prop_assert!(validate_gstin(&gstin).is_ok());
        }

        /// Replacing the check character with any other charset member fails
        #[test]
        fn prop_wrong_check_char_fails(
            prefix in gstin_prefix_strategy(),
            offset in 1usize..36
        ) {
            const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
            let valid = with_checksum(&prefix);
            let check = valid.as_bytes()[14];
            let position = CHARSET.iter().position(|&c| c == check).unwrap();
            let wrong = CHARSET[(position + offset) % 36] as char;

            let corrupted = format!("{prefix}{wrong}");
            prop_assert!(validate_gstin(&corrupted).is_err());
        }

        /// Ten digits starting 6-9 always pass, any other first digit fails
        #[test]
        fn prop_phone_first_digit_rule(
            first in 0u32..=9,
            rest in 0u64..=999_999_999
        ) {
            let phone = format!("{first}{rest:09}");
            if first >= 6 {
                prop_assert!(validate_indian_phone(&phone).is_ok());
            } else {
                prop_assert!(validate_indian_phone(&phone).is_err());
            }
        }
    }
}
