//! Utility functions and helpers

use rust_decimal::{Decimal, RoundingStrategy};
use std::time::{SystemTime, UNIX_EPOCH};

/// Group the digits of an integer string with a thousands separator.
///
/// A leading minus sign is kept in front of the grouped digits.
pub fn format_number<T: ToString>(n: T, separator: &str) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };

    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push_str(&separator.chars().rev().collect::<String>());
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    format!("{}{}", sign, result.chars().rev().collect::<String>())
}

/// Format a monetary amount with a fixed number of decimals and
/// configurable separators, e.g. `1234.5` -> `"1,234.50"`.
///
/// Halves round away from zero.
pub fn format_amount(value: Decimal, decimals: u32, thousands_sep: &str, decimal_sep: &str) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let fixed = format!("{:.*}", decimals as usize, rounded.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    // -0.00 renders as 0.00
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let grouped = format_number(int_part, thousands_sep);

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push_str(decimal_sep);
        out.push_str(frac);
    }
    out
}

/// Extract the number written at the start of a text, ignoring whatever
/// follows it, e.g. `" 12.50 €"` -> `"12.50"`.
///
/// Leading whitespace and an optional sign are accepted; an exponent is
/// only taken when at least one digit follows it. The literal is returned
/// in a form both `f64` and `Decimal` parse: a bare `.5` becomes `0.5`,
/// `7.` becomes `7` and a `+` sign is dropped.
pub fn leading_number(text: &str) -> Option<String> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &s[int_start..pos];

    let mut frac_digits = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_digits = &s[frac_start..end];
        if !int_digits.is_empty() || !frac_digits.is_empty() {
            pos = end;
        }
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut literal = String::new();
    if negative {
        literal.push('-');
    }
    literal.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        literal.push('.');
        literal.push_str(frac_digits);
    }

    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut end = pos + 1;
        if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
            end += 1;
        }
        let exp_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > exp_start {
            literal.push('e');
            literal.push_str(&s[pos + 1..end]);
        }
    }

    Some(literal)
}

/// Generate an id for a new record from the current time.
pub fn generate_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{:x}", nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567, ","), "1,234,567");
        assert_eq!(format_number(123, ","), "123");
        assert_eq!(format_number(-1234, "."), "-1.234");
        assert_eq!(format_number("1000", " "), "1 000");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec("1234.5"), 2, ",", "."), "1,234.50");
        assert_eq!(format_amount(Decimal::ZERO, 2, ",", "."), "0.00");
        assert_eq!(format_amount(dec("-50"), 2, ",", "."), "-50.00");
        assert_eq!(format_amount(dec("1234567.891"), 2, ".", ","), "1.234.567,89");
        assert_eq!(format_amount(dec("42"), 0, ",", "."), "42");
    }

    #[test]
    fn test_format_amount_rounds_half_away_from_zero() {
        assert_eq!(format_amount(dec("2.675"), 2, ",", "."), "2.68");
        assert_eq!(format_amount(dec("-2.675"), 2, ",", "."), "-2.68");
    }

    #[test]
    fn test_format_amount_negative_zero() {
        assert_eq!(format_amount(dec("-0.001"), 2, ",", "."), "0.00");
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("42").as_deref(), Some("42"));
        assert_eq!(leading_number(" 12.50 €").as_deref(), Some("12.50"));
        assert_eq!(leading_number("-3.25").as_deref(), Some("-3.25"));
        assert_eq!(leading_number("+3").as_deref(), Some("3"));
        assert_eq!(leading_number(".5").as_deref(), Some("0.5"));
        assert_eq!(leading_number("-.5").as_deref(), Some("-0.5"));
        assert_eq!(leading_number("7.").as_deref(), Some("7"));
        assert_eq!(leading_number("1e3x").as_deref(), Some("1e3"));
        assert_eq!(leading_number("2.5E-1").as_deref(), Some("2.5e-1"));
        assert_eq!(leading_number("2e").as_deref(), Some("2"));
    }

    #[test]
    fn test_leading_number_rejects_non_numbers() {
        assert_eq!(leading_number("abc"), None);
        assert_eq!(leading_number("."), None);
        assert_eq!(leading_number("-"), None);
        assert_eq!(leading_number("€12"), None);
        assert_eq!(leading_number("   "), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn test_generate_id_not_empty() {
        let id = generate_id();
        assert!(!id.is_empty());
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
