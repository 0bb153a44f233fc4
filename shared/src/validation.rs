//! Validation utilities for the BargainWale trading operations backend
//!
//! Includes India-specific validations for party tax identifiers and
//! addresses, plus the quantity/price checks used by the workflow services.

use rust_decimal::Decimal;

// ============================================================================
// Quantity and Price Validations
// ============================================================================

/// Validate a fulfillment or stock quantity is strictly positive
pub fn validate_positive_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a price is not negative
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

/// Validate a GST rate is a percentage in [0, 100]
pub fn validate_gst_rate(rate: Decimal) -> Result<(), &'static str> {
    if rate < Decimal::ZERO || rate > Decimal::from(100) {
        return Err("GST rate must be between 0 and 100%");
    }
    Ok(())
}

// ============================================================================
// India-Specific Validations
// ============================================================================

/// Charset used by the GSTIN checksum (values 0-35)
const GSTIN_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Compute the GSTIN check character for the first 14 characters.
///
/// Standard mod-36 algorithm: alternating factors 1 and 2, each product
/// contributes quotient plus remainder of division by 36.
pub fn gstin_check_char(first14: &str) -> Option<char> {
    if first14.len() != 14 {
        return None;
    }
    let mut sum: u32 = 0;
    for (i, c) in first14.chars().enumerate() {
        let value = GSTIN_CHARSET
            .iter()
            .position(|&b| b as char == c)? as u32;
        let factor = if i % 2 == 0 { 1 } else { 2 };
        let product = value * factor;
        sum += product / 36 + product % 36;
    }
    let check = (36 - sum % 36) % 36;
    Some(GSTIN_CHARSET[check as usize] as char)
}

/// Validate a GSTIN (Goods and Services Tax Identification Number)
///
/// 15 characters: 2-digit state code, 10-character PAN, entity code,
/// the literal 'Z', and a mod-36 check character.
pub fn validate_gstin(gstin: &str) -> Result<(), &'static str> {
    if gstin.len() != 15 {
        return Err("GSTIN must be 15 characters");
    }
    let chars: Vec<char> = gstin.chars().collect();

    // State code
    if !chars[0].is_ascii_digit() || !chars[1].is_ascii_digit() {
        return Err("GSTIN must start with a 2-digit state code");
    }
    // PAN: 5 letters, 4 digits, 1 letter
    if !chars[2..7].iter().all(|c| c.is_ascii_uppercase()) {
        return Err("Invalid PAN in GSTIN");
    }
    if !chars[7..11].iter().all(|c| c.is_ascii_digit()) {
        return Err("Invalid PAN in GSTIN");
    }
    if !chars[11].is_ascii_uppercase() {
        return Err("Invalid PAN in GSTIN");
    }
    // Entity code, then the literal 'Z'
    if !chars[12].is_ascii_alphanumeric() {
        return Err("Invalid entity code in GSTIN");
    }
    if chars[13] != 'Z' {
        return Err("GSTIN 14th character must be 'Z'");
    }

    match gstin_check_char(&gstin[..14]) {
        Some(expected) if expected == chars[14] => Ok(()),
        _ => Err("Invalid GSTIN checksum"),
    }
}

/// Validate an Indian mobile phone number
/// Accepts: 9876543210, 09876543210, +919876543210, 919876543210
pub fn validate_indian_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    let local = if digits.len() == 10 {
        digits.as_str()
    } else if digits.len() == 11 && digits.starts_with('0') {
        &digits[1..]
    } else if digits.len() == 12 && digits.starts_with("91") {
        &digits[2..]
    } else {
        return Err("Invalid Indian phone number format");
    };

    // Indian mobile numbers start with 6-9
    match local.chars().next() {
        Some(c) if ('6'..='9').contains(&c) => Ok(()),
        _ => Err("Invalid Indian phone number format"),
    }
}

/// Validate an Indian PIN code: 6 digits, first digit 1-9
pub fn validate_pincode(pincode: &str) -> Result<(), &'static str> {
    if pincode.len() != 6 || !pincode.chars().all(|c| c.is_ascii_digit()) {
        return Err("PIN code must be 6 digits");
    }
    if pincode.starts_with('0') {
        return Err("PIN code cannot start with 0");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Quantity and Price Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_positive_quantity() {
        assert!(validate_positive_quantity(Decimal::from(1)).is_ok());
        assert!(validate_positive_quantity(Decimal::ZERO).is_err());
        assert!(validate_positive_quantity(Decimal::from(-5)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(Decimal::from(250)).is_ok());
        assert!(validate_price(Decimal::from(-5)).is_err());
    }

    #[test]
    fn test_validate_gst_rate() {
        assert!(validate_gst_rate(Decimal::from(18)).is_ok());
        assert!(validate_gst_rate(Decimal::ZERO).is_ok());
        assert!(validate_gst_rate(Decimal::from(100)).is_ok());
        assert!(validate_gst_rate(Decimal::from(-1)).is_err());
        assert!(validate_gst_rate(Decimal::from(101)).is_err());
    }

    // ========================================================================
    // GSTIN Tests
    // ========================================================================

    #[test]
    fn test_gstin_check_char() {
        assert_eq!(gstin_check_char("22AAAAA0000A1Z"), Some('C'));
        // Wrong length
        assert_eq!(gstin_check_char("22AAAAA0000A1"), None);
        // Character outside the charset
        assert_eq!(gstin_check_char("22aaaaa0000A1Z"), None);
    }

    #[test]
    fn test_validate_gstin_valid() {
        assert!(validate_gstin("22AAAAA0000A1ZC").is_ok());
    }

    #[test]
    fn test_validate_gstin_constructed_checksum() {
        let first14 = "27ABCDE1234F1Z";
        let check = gstin_check_char(first14).unwrap();
        let gstin = format!("{}{}", first14, check);
        assert!(validate_gstin(&gstin).is_ok());
    }

    #[test]
    fn test_validate_gstin_bad_checksum() {
        let first14 = "27ABCDE1234F1Z";
        let check = gstin_check_char(first14).unwrap();
        // Any other check character must fail
        let wrong = if check == '0' { '1' } else { '0' };
        let gstin = format!("{}{}", first14, wrong);
        assert!(validate_gstin(&gstin).is_err());
    }

    #[test]
    fn test_validate_gstin_structure() {
        // Too short
        assert!(validate_gstin("22AAAAA0000A1Z").is_err());
        // State code not numeric
        assert!(validate_gstin("2AAAAAA0000A1ZC").is_err());
        // PAN digits where letters expected
        assert!(validate_gstin("22111110000A1ZC").is_err());
        // Missing the literal 'Z'
        assert!(validate_gstin("22AAAAA0000A1XC").is_err());
    }

    // ========================================================================
    // Phone and PIN Code Tests
    // ========================================================================

    #[test]
    fn test_validate_indian_phone_valid() {
        assert!(validate_indian_phone("9876543210").is_ok());
        assert!(validate_indian_phone("09876543210").is_ok());
        assert!(validate_indian_phone("+919876543210").is_ok());
        assert!(validate_indian_phone("919876543210").is_ok());
        assert!(validate_indian_phone("98765-43210").is_ok());
    }

    #[test]
    fn test_validate_indian_phone_invalid() {
        assert!(validate_indian_phone("12345").is_err());
        // Mobile numbers start with 6-9
        assert!(validate_indian_phone("5876543210").is_err());
        assert!(validate_indian_phone("abcdefghij").is_err());
        assert!(validate_indian_phone("98765432101234").is_err());
    }

    #[test]
    fn test_validate_pincode_valid() {
        assert!(validate_pincode("400001").is_ok());
        assert!(validate_pincode("110001").is_ok());
    }

    #[test]
    fn test_validate_pincode_invalid() {
        assert!(validate_pincode("0400001").is_err());
        assert!(validate_pincode("040001").is_err());
        assert!(validate_pincode("4000").is_err());
        assert!(validate_pincode("40000a").is_err());
    }

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.co.in").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@domain").is_err());
        assert!(validate_email("@.").is_err());
    }
}
