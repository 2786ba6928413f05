use narrate_core::calculations::common::{round_half_up, round_naira};
use rust_decimal::Decimal;

pub use narrate_core::calculations::common::sanitize_amount;

/// Whole-naira display with thousands separators, e.g. `₦1,234,567`.
pub fn format_naira(amount: Decimal) -> String {
    let rounded = round_naira(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}₦{grouped}")
}

/// Renders a fraction as a percentage to two places: `0.0792` is `7.92%`.
pub fn format_rate(fraction: Decimal) -> String {
    format!("{}%", round_half_up(fraction * Decimal::ONE_HUNDRED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn sanitize_reads_typed_amounts() {
        assert_eq!(sanitize_amount("₦2,500,000"), dec!(2500000));
        assert_eq!(sanitize_amount(""), Decimal::ZERO);
    }

    #[test]
    fn format_groups_thousands() {
        assert_eq!(format_naira(dec!(1234567)), "₦1,234,567");
        assert_eq!(format_naira(dec!(198000)), "₦198,000");
        assert_eq!(format_naira(dec!(999)), "₦999");
        assert_eq!(format_naira(dec!(0)), "₦0");
    }

    #[test]
    fn format_rounds_to_whole_naira() {
        assert_eq!(format_naira(dec!(38966.67)), "₦38,967");
        assert_eq!(format_naira(dec!(1499.5)), "₦1,500");
    }

    #[test]
    fn format_negative_amounts() {
        assert_eq!(format_naira(dec!(-12000)), "-₦12,000");
    }

    #[test]
    fn rate_is_shown_as_percentage() {
        assert_eq!(format_rate(dec!(0.0792)), "7.92%");
        assert_eq!(format_rate(dec!(0)), "0%");
    }
}
