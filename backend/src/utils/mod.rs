//! # Utilities Module
//!
//! Helper functions used across the backend service.
//!
//! Amount conversion uses `rust_decimal::Decimal` so a human-readable
//! amount maps to base units without binary floating-point rounding.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur converting an amount to base units.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScalingError {
    /// The amount is zero or negative.
    #[error("Amount must be positive, got {0}")]
    NonPositive(String),

    /// `10^decimals` or the product does not fit.
    #[error("Overflow: {0}")]
    Overflow(String),

    /// The amount is smaller than one base unit.
    #[error("Amount {0} is below one base unit")]
    ZeroAmount(String),
}

/// Convert a human-readable amount to base units.
///
/// `base_units = trunc(amount * 10^decimals)`
///
/// Digits beyond `decimals` are truncated, matching how an integer amount
/// is built from a scaled number.
///
/// ## Examples
///
/// ```rust,ignore
/// assert_eq!(to_base_units(Decimal::from_str("1.5")?, 9)?, 1_500_000_000);
/// assert_eq!(to_base_units(Decimal::from_str("0.1")?, 9)?, 100_000_000);
/// ```
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<u64, ScalingError> {
    if amount <= Decimal::ZERO {
        return Err(ScalingError::NonPositive(amount.to_string()));
    }

    let multiplier = 10u64
        .checked_pow(decimals as u32)
        .map(Decimal::from)
        .ok_or_else(|| ScalingError::Overflow(format!("10^{}", decimals)))?;

    let scaled = amount
        .checked_mul(multiplier)
        .ok_or_else(|| ScalingError::Overflow(format!("{} * 10^{}", amount, decimals)))?
        .trunc();

    let units = scaled
        .to_u64()
        .ok_or_else(|| ScalingError::Overflow(format!("{} does not fit in u64", scaled)))?;

    if units == 0 {
        return Err(ScalingError::ZeroAmount(amount.to_string()));
    }

    Ok(units)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_whole_amounts() {
        assert_eq!(to_base_units(dec("2"), 9).unwrap(), 2_000_000_000);
        assert_eq!(to_base_units(dec("100"), 6).unwrap(), 100_000_000);
    }

    #[test]
    fn test_fractional_amounts_are_exact() {
        // Inputs with no exact binary representation.
        assert_eq!(to_base_units(dec("0.1"), 9).unwrap(), 100_000_000);
        assert_eq!(to_base_units(dec("1.5"), 9).unwrap(), 1_500_000_000);
        assert_eq!(to_base_units(dec("1.000000001"), 9).unwrap(), 1_000_000_001);
        assert_eq!(to_base_units(dec("0.29"), 6).unwrap(), 290_000);
    }

    #[test]
    fn test_excess_precision_truncates() {
        assert_eq!(to_base_units(dec("1.0000000019"), 9).unwrap(), 1_000_000_001);
        assert_eq!(to_base_units(dec("0.0000019"), 6).unwrap(), 1);
    }

    #[test]
    fn test_below_one_unit_rejected() {
        assert!(matches!(
            to_base_units(dec("0.0000000001"), 9),
            Err(ScalingError::ZeroAmount(_))
        ));
    }

    #[test]
    fn test_non_positive_rejected() {
        assert!(matches!(to_base_units(Decimal::ZERO, 9), Err(ScalingError::NonPositive(_))));
        assert!(matches!(to_base_units(dec("-1"), 9), Err(ScalingError::NonPositive(_))));
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(matches!(
            to_base_units(dec("99999999999999999999"), 9),
            Err(ScalingError::Overflow(_))
        ));
        assert!(matches!(to_base_units(dec("1"), 20), Err(ScalingError::Overflow(_))));
    }
}
