//! Common utility functions for quote calculations.
//!
//! This module provides the rounding and saturating arithmetic shared by
//! every derived amount.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use quote_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(17.605)), dec!(17.61));
/// assert_eq!(round_half_up(dec!(17.604)), dec!(17.60));
/// assert_eq!(round_half_up(dec!(-17.605)), dec!(-17.61)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Sums values, saturating at the representable bounds instead of panicking.
pub fn sum<I>(values: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, value| acc.saturating_add(value))
}

/// `amount x percentage / 100`, rounded to cents.
pub fn percentage_of(
    amount: Decimal,
    percentage: Decimal,
) -> Decimal {
    round_half_up(amount.saturating_mul(percentage) / Decimal::ONE_HUNDRED)
}
