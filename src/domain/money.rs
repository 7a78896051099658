//! Money helpers.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Format an amount as US dollars, e.g. `$1,234.56` or `-$0.50`.
pub fn usd(amount: &Decimal) -> String {
    let rounded = amount
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{rounded:.2}");
    let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{cents}")
}

/// Parse a non-negative decimal amount. Returns `None` for anything else.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let value = Decimal::from_str(raw.trim()).ok()?;
    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }
    Some(value.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn usd_small_amounts() {
        assert_eq!(usd(&dec!(0)), "$0.00");
        assert_eq!(usd(&dec!(5)), "$5.00");
        assert_eq!(usd(&dec!(99.9)), "$99.90");
    }

    #[test]
    fn usd_groups_thousands() {
        assert_eq!(usd(&dec!(1000)), "$1,000.00");
        assert_eq!(usd(&dec!(10000)), "$10,000.00");
        assert_eq!(usd(&dec!(1234567.891)), "$1,234,567.89");
    }

    #[test]
    fn usd_rounds_half_away_from_zero() {
        assert_eq!(usd(&dec!(0.005)), "$0.01");
        assert_eq!(usd(&dec!(2.344)), "$2.34");
    }

    #[test]
    fn usd_negative() {
        assert_eq!(usd(&dec!(-1500.5)), "-$1,500.50");
        assert_eq!(usd(&dec!(-0.001)), "$0.00");
    }

    #[test]
    fn parse_amount_accepts_non_negative() {
        assert_eq!(parse_amount("10000"), Some(dec!(10000)));
        assert_eq!(parse_amount(" 12.50 "), Some(dec!(12.5)));
        assert_eq!(parse_amount("0"), Some(dec!(0)));
    }

    #[test]
    fn parse_amount_rejects_negative_and_garbage() {
        assert_eq!(parse_amount("-1"), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }
}
