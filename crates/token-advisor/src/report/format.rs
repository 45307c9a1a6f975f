//! Display formatting for report values.
//!
//! Undefined or non-finite inputs render as [`NOT_AVAILABLE`].

use rust_decimal::{Decimal, RoundingStrategy};

pub const NOT_AVAILABLE: &str = "N/A";

/// Insert `,` separators into the integer part of a plain number string
fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// `1234567.891` at 2 dp → `1,234,567.89`
pub fn decimal(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", dp as usize, rounded);
    // Rounding can leave "-0.00"
    let text = if rounded.is_zero() {
        text.trim_start_matches('-').to_string()
    } else {
        text
    };
    group_thousands(&text)
}

/// `$1,234.56`, or `-$5.00` for losses
pub fn usd(value: Decimal, dp: u32) -> String {
    let text = decimal(value, dp);
    match text.strip_prefix('-') {
        Some(abs) => format!("-${abs}"),
        None => format!("${text}"),
    }
}

pub fn usd_opt(value: Option<Decimal>, dp: u32) -> String {
    value.map_or_else(|| NOT_AVAILABLE.into(), |v| usd(v, dp))
}

/// `f64` at `dp` decimals with separators; non-finite → `N/A`
pub fn float(value: f64, dp: usize) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.into();
    }
    let text = format!("{value:.dp$}");
    // Rounding can leave "-0.00"
    let text = match text.strip_prefix('-') {
        Some(abs) if abs.chars().all(|c| c == '0' || c == '.') => abs.to_string(),
        _ => text,
    };
    group_thousands(&text)
}

/// `$1.28B`
pub fn usd_billions(value: f64) -> String {
    let text = float(value / 1e9, 2);
    if text == NOT_AVAILABLE {
        return text;
    }
    match text.strip_prefix('-') {
        Some(abs) => format!("-${abs}B"),
        None => format!("${text}B"),
    }
}

/// `19.70M`
pub fn millions(value: f64) -> String {
    let text = float(value / 1e6, 2);
    if text == NOT_AVAILABLE { text } else { format!("{text}M") }
}

/// A value already expressed in percent, e.g. `60` → `60.00%`
pub fn percent(value: Option<f64>) -> String {
    match value.map(|v| float(v, 2)) {
        Some(text) if text != NOT_AVAILABLE => format!("{text}%"),
        _ => NOT_AVAILABLE.into(),
    }
}

/// Plain ratio with two decimals
pub fn ratio(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.into(), |v| float(v, 2))
}

/// A fractional rate, e.g. `0.4512` → `45.12%`
pub fn rate(value: f64) -> String {
    percent(Some(value * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0.5"), "0.5");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("-1234567.89"), "-1,234,567.89");
    }

    #[test]
    fn test_usd() {
        assert_eq!(usd(dec!(65000.5), 6), "$65,000.500000");
        assert_eq!(usd(dec!(0.000022), 6), "$0.000022");
        assert_eq!(usd(dec!(83.3333), 2), "$83.33");
        assert_eq!(usd(dec!(-5), 2), "-$5.00");
        assert_eq!(usd(dec!(-0.001), 2), "$0.00");
        assert_eq!(usd(dec!(2.345), 2), "$2.35");
    }

    #[test]
    fn test_scaled_units() {
        assert_eq!(usd_billions(1_280_000_000_000.0), "$1,280.00B");
        assert_eq!(usd_billions(2_000_000.0), "$0.00B");
        assert_eq!(millions(19_700_000.0), "19.70M");
        assert!(millions(1e29).ends_with(".00M"));
        assert_eq!(millions(f64::INFINITY), NOT_AVAILABLE);
    }

    #[test]
    fn test_optional_values() {
        assert_eq!(percent(Some(60.0)), "60.00%");
        assert_eq!(percent(None), NOT_AVAILABLE);
        assert_eq!(percent(Some(f64::NAN)), NOT_AVAILABLE);
        assert_eq!(ratio(Some(1.6666)), "1.67");
        assert_eq!(ratio(None), NOT_AVAILABLE);
        assert_eq!(usd_opt(None, 2), NOT_AVAILABLE);
    }

    #[test]
    fn test_float_drops_negative_zero() {
        assert_eq!(float(-0.001, 2), "0.00");
        assert_eq!(float(-1234.5, 1), "-1,234.5");
    }

    #[test]
    fn test_rate() {
        assert_eq!(rate(0.4512), "45.12%");
        assert_eq!(rate(-0.25), "-25.00%");
        assert_eq!(rate(123.0), "12,300.00%");
        assert_eq!(rate(f64::INFINITY), NOT_AVAILABLE);
        assert_eq!(rate(f64::NAN), NOT_AVAILABLE);
    }
}
