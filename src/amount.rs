//! Parsing and formatting of human-entered monetary amounts.
//!
//! Two conventions are in play: VND (`.` groups thousands, no fractional
//! part, `1.000.000`) and USD (`,` groups thousands, `.` separates decimals,
//! `1,000.50`). Input may arrive in either, with currency glyphs and spaces
//! mixed in.

use crate::models::Currency;

/// Parse a free-form amount string into a non-negative value.
///
/// Returns `None` when the input has no interpretable numeric content or is
/// negative. Separator disambiguation:
/// - both `.` and `,` present: the one occurring last is the decimal
///   separator, every occurrence of the other is grouping and is removed;
/// - only one kind of separator: repeated occurrences are grouping; a single
///   occurrence with digits before it and exactly three digits after it
///   reads as grouping (`1.000` is one thousand), anything else reads as a
///   decimal separator (`0.5`, `1.07`).
pub fn parse_amount(input: &str) -> Option<f64> {
    let cleaned: String = input
        .chars()
        .filter(|&c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) => {
            let (decimal, grouping) = if dot > comma { ('.', ',') } else { (',', '.') };
            cleaned
                .chars()
                .filter(|&c| c != grouping)
                .map(|c| if c == decimal { '.' } else { c })
                .collect()
        }
        (Some(_), None) => normalize_single_separator(&cleaned, '.'),
        (None, Some(_)) => normalize_single_separator(&cleaned, ','),
        (None, None) => cleaned,
    };

    let value: f64 = normalized.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value)
}

/// Resolve a string that uses only one separator kind. Grouping separators
/// are removed, a decimal separator becomes `.`.
fn normalize_single_separator(s: &str, sep: char) -> String {
    let occurrences = s.matches(sep).count();
    let is_grouping = occurrences > 1
        || match s.split_once(sep) {
            Some((head, tail)) => {
                head.chars().any(|c| c.is_ascii_digit())
                    && tail.len() == 3
                    && tail.chars().all(|c| c.is_ascii_digit())
            }
            None => false,
        };

    if is_grouping {
        s.chars().filter(|&c| c != sep).collect()
    } else {
        s.chars().map(|c| if c == sep { '.' } else { c }).collect()
    }
}

/// Format an amount with the currency glyph attached: `₫` suffixed for VND,
/// `$` prefixed for USD.
pub fn format_amount(amount: f64, currency: Currency) -> String {
    match currency {
        Currency::Vnd => format!("{} {}", format_number(amount, currency), currency.symbol()),
        Currency::Usd => format!("{}{}", currency.symbol(), format_number(amount, currency)),
    }
}

/// Format an amount without a glyph, for input echo fields.
///
/// Rounds half-up at the currency's minimum unit: whole dong for VND, cents
/// for USD. Rounding happens on integer minor units, not on a reformatted
/// float.
pub fn format_number(amount: f64, currency: Currency) -> String {
    match currency {
        Currency::Vnd => group_thousands(amount.round() as i64, '.'),
        Currency::Usd => {
            let cents = (amount * 100.0).round() as i64;
            format!("{}.{:02}", group_thousands(cents / 100, ','), cents % 100)
        }
    }
}

fn group_thousands(value: i64, sep: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_usd_convention() {
        assert_eq!(parse_amount("1,000.50"), Some(1000.50));
        assert_eq!(parse_amount("1,234,567.89"), Some(1_234_567.89));
        assert_eq!(parse_amount("$ 1,000.50"), Some(1000.50));
        assert_eq!(parse_amount("0.5"), Some(0.5));
        assert_eq!(parse_amount("42"), Some(42.0));
    }

    #[test]
    fn test_parse_vnd_convention() {
        assert_eq!(parse_amount("1.000.000"), Some(1_000_000.0));
        assert_eq!(parse_amount("1.000.000 ₫"), Some(1_000_000.0));
        assert_eq!(parse_amount("1.234.567,89"), Some(1_234_567.89));
    }

    #[test]
    fn test_parse_single_separator_disambiguation() {
        // a lone separator with exactly three digits behind it reads as
        // grouping, in either convention
        assert_eq!(parse_amount("1.000"), Some(1000.0));
        assert_eq!(parse_amount("25.000"), Some(25_000.0));
        assert_eq!(parse_amount("1,000"), Some(1000.0));
        // anything else reads as a decimal separator
        assert_eq!(parse_amount("1.07"), Some(1.07));
        assert_eq!(parse_amount("1.0005"), Some(1.0005));
        assert_eq!(parse_amount(".500"), Some(0.5));
        assert_eq!(parse_amount("1,5"), Some(1.5));
        assert_eq!(parse_amount("5."), Some(5.0));
    }

    #[test]
    fn test_parse_rejects_garbage_and_negatives() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("₫"), None);
        assert_eq!(parse_amount("..."), None);
        assert_eq!(parse_amount("1-2"), None);
        assert_eq!(parse_amount("-5"), None);
        assert_eq!(parse_amount("-0.01"), None);
        assert_eq!(parse_amount("-1.000"), None);
    }

    #[test]
    fn test_format_vnd() {
        assert_eq!(format_amount(1_000_000.0, Currency::Vnd), "1.000.000 ₫");
        assert_eq!(format_amount(500.0, Currency::Vnd), "500 ₫");
        assert_eq!(format_amount(0.0, Currency::Vnd), "0 ₫");
        // half-up at the whole-dong unit
        assert_eq!(format_amount(24_000.49, Currency::Vnd), "24.000 ₫");
        assert_eq!(format_amount(24_000.5, Currency::Vnd), "24.001 ₫");
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_amount(1000.5, Currency::Usd), "$1,000.50");
        assert_eq!(format_amount(0.0, Currency::Usd), "$0.00");
        assert_eq!(format_amount(1_234_567.891, Currency::Usd), "$1,234,567.89");
        assert_eq!(format_amount(2.346, Currency::Usd), "$2.35");
        // cent carry into the integer part
        assert_eq!(format_amount(19.999, Currency::Usd), "$20.00");
    }

    #[test]
    fn test_format_number_bare() {
        assert_eq!(format_number(1234.5, Currency::Usd), "1,234.50");
        assert_eq!(format_number(1234.0, Currency::Vnd), "1.234");
    }

    #[test]
    fn test_parse_format_round_trip() {
        for x in [0.0, 0.5, 1.0, 999.99, 1000.0, 1234.56, 1_000_000.25] {
            let rendered = format_amount(x, Currency::Usd);
            let parsed = parse_amount(&rendered).unwrap();
            assert_relative_eq!(parsed, x, epsilon = 1e-9);
        }
        for x in [0.0, 1.0, 999.0, 1000.0, 25_000.0, 1_000_000.0] {
            let rendered = format_amount(x, Currency::Vnd);
            let parsed = parse_amount(&rendered).unwrap();
            assert_relative_eq!(parsed, x, epsilon = 1e-9);
        }
    }
}
