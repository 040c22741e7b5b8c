// Validation utilities module
// Provides custom validation functions for domain-specific rules

use rust_decimal::Decimal;
use validator::ValidationError;

/// Validates that a price is non-negative (for required Decimal fields)
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        Err(ValidationError::new("price_must_be_non_negative"))
    } else {
        Ok(())
    }
}

/// Validates that an optional price is non-negative (for Option<Decimal> fields)
pub fn validate_optional_price(price: &Decimal) -> Result<(), ValidationError> {
    validate_price(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_price_is_valid() {
        assert!(validate_price(&Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_positive_price_is_valid() {
        assert!(validate_price(&dec!(4.50)).is_ok());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        assert!(validate_price(&dec!(-0.01)).is_err());
    }
}
