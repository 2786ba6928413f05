//! Rounding and amount-entry helpers shared by the calculators and their
//! front ends.
//!
//! Calculators never round their own results. Rounding is applied only where
//! a figure is presented or stored as a whole-naira amount.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};

// Literal pattern; cannot fail to compile.
static NON_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9]").unwrap());

/// Reads a typed amount the way the input boxes do: every non-digit is
/// dropped, so `"₦2,500,000"` is 2500000. Empty input, input with no digits
/// and digit runs too long for a [`Decimal`] are all zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use narrate_core::calculations::common::sanitize_amount;
///
/// assert_eq!(sanitize_amount("₦2,500,000"), dec!(2500000));
/// assert_eq!(sanitize_amount("n/a"), dec!(0));
/// ```
pub fn sanitize_amount(input: &str) -> Decimal {
    let digits = NON_DIGITS.replace_all(input, "");
    if digits.is_empty() {
        return Decimal::ZERO;
    }
    digits.parse().unwrap_or_else(|e| {
        tracing::warn!(input, "amount out of range: {}", e);
        Decimal::ZERO
    })
}

/// Rounds to whole naira, halves away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use narrate_core::calculations::common::round_naira;
///
/// assert_eq!(round_naira(dec!(16499.5)), dec!(16500));
/// assert_eq!(round_naira(dec!(16499.49)), dec!(16499));
/// ```
pub fn round_naira(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to two decimal places, halves away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use narrate_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(52.0581)), dec!(52.06));
/// assert_eq!(round_half_up(dec!(-1.005)), dec!(-1.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `part / whole`, or zero when `whole` is not positive.
pub fn ratio_or_zero(
    part: Decimal,
    whole: Decimal,
) -> Decimal {
    if whole > Decimal::ZERO {
        part / whole
    } else {
        Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // sanitize_amount tests
    // =========================================================================

    #[test]
    fn sanitize_keeps_digits_only() {
        assert_eq!(sanitize_amount("₦2,500,000"), dec!(2500000));
        assert_eq!(sanitize_amount(" 1 000 "), dec!(1000));
    }

    #[test]
    fn sanitize_drops_decimal_point_and_sign() {
        assert_eq!(sanitize_amount("1234.56"), dec!(123456));
        assert_eq!(sanitize_amount("-500"), dec!(500));
    }

    #[test]
    fn sanitize_empty_or_garbage_is_zero() {
        assert_eq!(sanitize_amount(""), Decimal::ZERO);
        assert_eq!(sanitize_amount("abc"), Decimal::ZERO);
        assert_eq!(sanitize_amount("-"), Decimal::ZERO);
    }

    #[test]
    fn sanitize_overlong_digit_run_is_zero() {
        let forty_digits = "9".repeat(40);
        assert_eq!(sanitize_amount(&forty_digits), Decimal::ZERO);
        assert_eq!(sanitize_amount(&format!("₦{forty_digits}")), Decimal::ZERO);
    }

    // =========================================================================
    // round_naira tests
    // =========================================================================

    #[test]
    fn round_naira_rounds_up_at_midpoint() {
        assert_eq!(round_naira(dec!(34416.5)), dec!(34417));
    }

    #[test]
    fn round_naira_rounds_down_below_midpoint() {
        assert_eq!(round_naira(dec!(34416.4999)), dec!(34416));
    }

    #[test]
    fn round_naira_preserves_whole_values() {
        assert_eq!(round_naira(dec!(413000)), dec!(413000));
    }

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
    }

    // =========================================================================
    // ratio_or_zero tests
    // =========================================================================

    #[test]
    fn ratio_or_zero_divides_positive_whole() {
        assert_eq!(ratio_or_zero(dec!(198000), dec!(2500000)), dec!(0.0792));
    }

    #[test]
    fn ratio_or_zero_guards_zero_whole() {
        assert_eq!(ratio_or_zero(dec!(5), dec!(0)), dec!(0));
        assert_eq!(ratio_or_zero(dec!(5), dec!(-1)), dec!(0));
    }
}
