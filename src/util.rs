// Utility helpers for parsing and formatting spreadsheet values.
//
// Sheet cells arrive as loosely formatted strings ("1,000", "₩12,000", "")
// so everything numeric goes through here before it reaches the reports.
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use regex::Regex;

pub const CURRENCY_GLYPH: char = '₩';

static YEAR_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("static regex"));

/// Parse a cell into `f64` while being forgiving about the formatting that
/// spreadsheet exports and our own currency rendering produce.
///
/// - Trims whitespace and a leading currency glyph (`₩` or `$`).
/// - Drops a trailing Hangul unit such as `원`, `권` or `부`.
/// - Rejects values that still contain alphabetic characters.
/// - Strips thousands separators before parsing.
/// - Returns `None` for blanks and anything that is not a finite number.
pub fn parse_number(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    let s = s
        .strip_prefix(CURRENCY_GLYPH)
        .or_else(|| s.strip_prefix('$'))
        .unwrap_or(s)
        .trim_start()
        .trim_end_matches(is_hangul_syllable)
        .trim_end();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// Blank and unparseable cells count as zero in aggregates.
pub fn number_or_zero(s: Option<&str>) -> f64 {
    parse_number(s).unwrap_or(0.0)
}

/// First run of four digits, read as a year. Loose on purpose: it accepts
/// `2023-01-15`, `2023/01/15` and raw `Date(2023,0,15)` alike.
pub fn extract_year(s: &str) -> Option<i32> {
    YEAR_RUN.find(s).and_then(|m| m.as_str().parse().ok())
}

pub fn average(v: &[f64]) -> f64 {
    // Returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Format with `decimals` fractional digits and ko-KR thousands separators.
/// Non-finite values render as `inf`/`NaN` rather than a made-up number.
pub fn format_number(n: f64, decimals: usize) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (s.as_str(), None),
    };
    let mut res = match int_part.parse::<u128>() {
        Ok(v) => v.to_formatted_string(&Locale::ko),
        Err(_) => group_digits(int_part, Locale::ko.separator()),
    };
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

// Magnitudes past u128 still print every digit.
fn group_digits(digits: &str, separator: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}

/// Grouped number with at most three fractional digits and no trailing
/// zeros, e.g. `12000` → `12,000` and `1234.5` → `1,234.5`.
pub fn format_grouped(n: f64) -> String {
    let s = format_number(n, 3);
    match s.split_once('.') {
        Some((int_part, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                int_part.to_string()
            } else {
                format!("{}.{}", int_part, frac)
            }
        }
        None => s,
    }
}

pub fn format_currency(n: f64) -> String {
    format!("{}{}", CURRENCY_GLYPH, format_grouped(n))
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::ko)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grouped_and_currency_values() {
        assert_eq!(parse_number(Some("1,000")), Some(1000.0));
        assert_eq!(parse_number(Some(" ₩12,500 ")), Some(12500.0));
        assert_eq!(parse_number(Some("$3.5")), Some(3.5));
        assert_eq!(parse_number(Some("-2,000")), Some(-2000.0));
    }

    #[test]
    fn unit_suffix_is_ignored() {
        assert_eq!(parse_number(Some("12,000원")), Some(12000.0));
        assert_eq!(parse_number(Some("1,500 권")), Some(1500.0));
        assert_eq!(parse_number(Some("₩3,000원")), Some(3000.0));
        assert_eq!(parse_number(Some("약 3,000원")), None);
        assert_eq!(parse_number(Some("12kg")), None);
    }

    #[test]
    fn rejects_text_and_blanks() {
        assert_eq!(parse_number(None), None);
        assert_eq!(parse_number(Some("")), None);
        assert_eq!(parse_number(Some("₩")), None);
        assert_eq!(parse_number(Some("미정")), None);
        assert_eq!(parse_number(Some("inf")), None);
        assert_eq!(parse_number(Some("1e3")), None);
        assert_eq!(number_or_zero(Some("n/a")), 0.0);
    }

    #[test]
    fn year_is_first_four_digit_run() {
        assert_eq!(extract_year("2023-01-15"), Some(2023));
        assert_eq!(extract_year("계약 2024/03/02"), Some(2024));
        assert_eq!(extract_year("Date(2022,11,31)"), Some(2022));
        assert_eq!(extract_year("23-01-15"), None);
        assert_eq!(extract_year(""), None);
    }

    #[test]
    fn currency_uses_korean_grouping() {
        assert_eq!(format_currency(12000.0), "₩12,000");
        assert_eq!(format_currency(1234.5), "₩1,234.5");
        assert_eq!(format_currency(0.0), "₩0");
        assert_eq!(format_currency(-3500.0), "₩-3,500");
        assert_eq!(format_int(1234567_u64), "1,234,567");
    }

    #[test]
    fn large_and_non_finite_values_keep_their_magnitude() {
        assert_eq!(format_currency(1e19), "₩10,000,000,000,000,000,000");
        assert_eq!(format_currency(1e20), "₩100,000,000,000,000,000,000");
        assert_eq!(
            format_grouped(1e40),
            "10,000,000,000,000,000,303,786,028,427,003,666,890,752"
        );
        assert_eq!(format_currency(f64::INFINITY), "₩inf");
        assert_eq!(format_number(f64::NAN, 0), "NaN");
    }

    #[test]
    fn average_of_empty_slice_is_zero() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[1.0, 2.0, 6.0]), 3.0);
    }
}
