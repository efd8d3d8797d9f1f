//! # Validation Module
//!
//! Input shape checks run by [`ItemDraft`](crate::item::ItemDraft) before any
//! arithmetic happens.
//!
//! ## Usage
//! ```rust
//! use invoicer_core::validation::{validate_item_name, validate_item_type};
//!
//! validate_item_name("Egg").unwrap();
//! validate_item_type("food").unwrap();
//! assert!(validate_item_name("   ").is_err());
//! ```
//!
//! ## Numeric Bounds
//! ```text
//! |unit amount| ≤ 10^9     |quantity| ≤ 10^6     lines ≤ 10^4
//!        line sum ≤ 10^15          invoice total ≤ 10^19
//! ```
//! At [`DecimalPlaces::MAX`](crate::money::DecimalPlaces::MAX) a total of
//! 10^19 still fits the 96-bit decimal mantissa, so sums never overflow.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::MAX_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted item name.
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted item type.
pub const MAX_ITEM_TYPE_LEN: usize = 100;

/// Largest accepted unit amount (net, gross, or tax), in either sign.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty or whitespace only
/// - Must be at most 200 characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates an item type.
///
/// Item types are free-form categories (`food`, `discount`, ...); only the
/// length is bounded.
pub fn validate_item_type(item_type: &str) -> ValidationResult<()> {
    if item_type.chars().count() > MAX_ITEM_TYPE_LEN {
        return Err(ValidationError::TooLong {
            field: "item_type".to_string(),
            max: MAX_ITEM_TYPE_LEN,
        });
    }

    Ok(())
}

/// Validates a unit amount.
///
/// ## Rules
/// - Must be within `-MAX_AMOUNT..=MAX_AMOUNT`
pub fn validate_amount(field: &str, amount: Decimal) -> ValidationResult<()> {
    if amount.abs() > MAX_AMOUNT {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            limit: MAX_AMOUNT,
        });
    }

    Ok(())
}

/// Validates a line quantity.
///
/// ## Rules
/// - Must be within `-MAX_QUANTITY..=MAX_QUANTITY` (zero and negative
///   quantities are allowed)
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity.unsigned_abs() > MAX_QUANTITY.unsigned_abs() {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            limit: Decimal::from(MAX_QUANTITY),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Egg").is_ok());
        assert!(validate_item_name("Discount on food").is_ok());

        assert!(validate_item_name("").is_err());
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"A".repeat(201)).is_err());
        assert!(validate_item_name(&"A".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_item_type() {
        assert!(validate_item_type("food").is_ok());
        assert!(validate_item_type("").is_ok());
        assert!(validate_item_type(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount("net_amount", Decimal::new(1050, 2)).is_ok());
        assert!(validate_amount("net_amount", MAX_AMOUNT).is_ok());
        assert!(validate_amount("net_amount", -MAX_AMOUNT).is_ok());
        assert!(validate_amount("net_amount", MAX_AMOUNT + Decimal::new(1, 2)).is_err());
        assert!(validate_amount("gross_amount", Decimal::MIN).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(0).is_ok());
        assert!(validate_quantity(-3).is_ok());
        assert!(validate_quantity(MAX_QUANTITY).is_ok());
        assert!(validate_quantity(-MAX_QUANTITY).is_ok());
        assert!(validate_quantity(MAX_QUANTITY + 1).is_err());
        assert!(validate_quantity(i64::MIN).is_err());
    }
}
