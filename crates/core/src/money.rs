//! Amount validation helpers.

use crate::types::Amount;

/// Number of decimal places the store keeps for every amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Validate a strictly positive amount with at most two decimal places.
pub fn validate_positive_amount(amount: Amount) -> Result<(), String> {
    if amount <= Amount::ZERO {
        return Err(format!("Amount must be positive, got {amount}"));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(format!(
            "Amount must have at most {AMOUNT_SCALE} decimal places, got {amount}"
        ));
    }
    Ok(())
}

/// Validate an amount that may be zero (e.g. a configured reward that is disabled).
pub fn validate_non_negative_amount(amount: Amount) -> Result<(), String> {
    if amount.is_zero() {
        return Ok(());
    }
    validate_positive_amount(amount)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn positive_amounts_accepted() {
        assert!(validate_positive_amount(dec!(3.00)).is_ok());
        assert!(validate_positive_amount(dec!(0.01)).is_ok());
        assert!(validate_positive_amount(dec!(1.500)).is_ok());
    }

    #[test]
    fn zero_and_negative_rejected() {
        assert!(validate_positive_amount(dec!(0)).is_err());
        assert!(validate_positive_amount(dec!(-1.00))
            .unwrap_err()
            .contains("positive"));
    }

    #[test]
    fn sub_cent_amounts_rejected() {
        assert!(validate_positive_amount(dec!(0.001))
            .unwrap_err()
            .contains("decimal places"));
    }

    #[test]
    fn zero_allowed_when_non_negative() {
        assert!(validate_non_negative_amount(dec!(0)).is_ok());
        assert!(validate_non_negative_amount(dec!(-0.01)).is_err());
    }
}
