//! Locale-aware numeric normalization.
//!
//! Financial exports mix `1.234,56` (dot thousands, comma decimal) with `7.15` (plain decimal).
//! [`clean_number`] maps one raw cell to an `f64` using a single rule set:
//!
//! - both `.` and `,` present: `.` is the thousands separator and `,` the decimal separator
//! - only `,` present: `,` is the decimal separator
//! - only `.` present, or neither: the text is already canonical
//!
//! Anything that still fails to parse becomes `0.0`. The functions here never return an error.
//!
//! ```rust
//! use dollar_suite::normalize::clean_number_str;
//!
//! assert_eq!(clean_number_str("1.234,56"), 1234.56);
//! assert_eq!(clean_number_str("1234,56"), 1234.56);
//! assert_eq!(clean_number_str("7.15"), 7.15);
//! assert_eq!(clean_number_str("abc"), 0.0);
//! ```

use crate::types::Value;

/// Separator convention detected in a piece of numeric text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorStyle {
    /// `.` groups thousands, `,` marks decimals (`1.234,56`).
    DotThousandsCommaDecimal,
    /// `,` marks decimals, no grouping (`1234,56`).
    CommaDecimal,
    /// `.` marks decimals, or there is no separator at all (`7.15`, `42`).
    Canonical,
}

impl SeparatorStyle {
    /// Classify `text` by which separators it contains.
    pub fn detect(text: &str) -> Self {
        match (text.contains('.'), text.contains(',')) {
            (true, true) => Self::DotThousandsCommaDecimal,
            (false, true) => Self::CommaDecimal,
            _ => Self::Canonical,
        }
    }
}

/// Normalize one cell to a finite `f64`.
///
/// `Null` maps to `0.0`; numbers are rendered to text and go through the same rules as strings.
pub fn clean_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Utf8(s) => clean_number_str(s),
        // Render first so numeric cells and their text form always agree.
        other => clean_number_str(&other.to_string()),
    }
}

/// Normalize locale-formatted numeric text to a finite `f64`.
pub fn clean_number_str(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let canonical = match SeparatorStyle::detect(trimmed) {
        SeparatorStyle::DotThousandsCommaDecimal => trimmed.replace('.', "").replace(',', "."),
        SeparatorStyle::CommaDecimal => trimmed.replace(',', "."),
        SeparatorStyle::Canonical => trimmed.to_owned(),
    };

    let digits: String = canonical
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    match digits.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_empty_are_zero() {
        assert_eq!(clean_number(&Value::Null), 0.0);
        assert_eq!(clean_number_str(""), 0.0);
        assert_eq!(clean_number_str("   "), 0.0);
    }

    #[test]
    fn plain_decimal_is_preserved() {
        assert_eq!(clean_number_str("7.15"), 7.15);
        assert_eq!(clean_number_str(" 7.15 "), 7.15);
    }

    #[test]
    fn dot_thousands_comma_decimal() {
        assert_eq!(clean_number_str("1.234,56"), 1234.56);
        assert_eq!(clean_number_str("600.822.115,84"), 600822115.84);
    }

    #[test]
    fn comma_only_is_decimal() {
        assert_eq!(clean_number_str("1234,56"), 1234.56);
        assert_eq!(clean_number_str("-0,5"), -0.5);
    }

    #[test]
    fn garbage_is_zero() {
        assert_eq!(clean_number_str("abc"), 0.0);
        assert_eq!(clean_number_str("--5"), 0.0);
        assert_eq!(clean_number_str("1-2"), 0.0);
        assert_eq!(clean_number_str("-"), 0.0);
    }

    #[test]
    fn currency_symbols_and_spaces_are_stripped() {
        assert_eq!(clean_number_str("$ 1.234,50"), 1234.5);
        assert_eq!(clean_number_str("12,5 %"), 12.5);
        assert_eq!(clean_number_str("USD 7.15"), 7.15);
    }

    #[test]
    fn dotted_thousands_without_decimal_part_is_zero() {
        // Only dots present: left as-is, which does not parse.
        assert_eq!(clean_number_str("1.234.567"), 0.0);
    }

    #[test]
    fn exponent_letters_are_stripped_not_interpreted() {
        assert_eq!(clean_number_str("1e5"), 15.0);
    }

    #[test]
    fn numeric_cells_go_through_their_text_form() {
        assert_eq!(clean_number(&Value::Float64(7.15)), 7.15);
        assert_eq!(clean_number(&Value::Int64(1234)), 1234.0);
        assert_eq!(clean_number(&Value::Float64(-2.5)), -2.5);
        assert_eq!(clean_number(&Value::Float64(f64::NAN)), 0.0);
        assert_eq!(clean_number(&Value::Float64(f64::INFINITY)), 0.0);
    }

    #[test]
    fn rerendered_grouping_is_not_idempotent() {
        let once = clean_number_str("1.234,5");
        assert_eq!(once, 1234.5);
        // The same value written with dot grouping and a dot decimal no longer parses.
        assert_eq!(clean_number_str("1.234.5"), 0.0);
    }

    #[test]
    fn separator_detection() {
        assert_eq!(SeparatorStyle::detect("1.234,56"), SeparatorStyle::DotThousandsCommaDecimal);
        assert_eq!(SeparatorStyle::detect("1234,56"), SeparatorStyle::CommaDecimal);
        assert_eq!(SeparatorStyle::detect("7.15"), SeparatorStyle::Canonical);
        assert_eq!(SeparatorStyle::detect("42"), SeparatorStyle::Canonical);
    }
}
