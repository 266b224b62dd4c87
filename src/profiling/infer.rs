//! Column type inference.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::DataType;

/// Literal date shapes a value must contain to count as a date: `YYYY-MM-DD`, `MM/DD/YYYY` or
/// `MM-DD-YYYY`.
static DATE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{4}-\d{2}-\d{2}|\d{2}/\d{2}/\d{4}|\d{2}-\d{2}-\d{4}")
        .expect("date shape regex is valid")
});

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m-%d-%Y"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Detect the primitive type of a column from its raw values.
///
/// Only non-empty values (after trimming) take part. Classification is unanimous: a single
/// value that does not fit a category moves the whole column to the next, more general one.
///
/// 1. no non-empty values: [`DataType::Text`]
/// 2. all numeric: [`DataType::Numeric`] if any value contains `.`, else [`DataType::Integer`]
/// 3. all dates: [`DataType::Date`]
/// 4. all `true`/`false`/`1`/`0`/`yes`/`no` (case-insensitive): [`DataType::Boolean`]
/// 5. otherwise [`DataType::Text`]
///
/// ```
/// use rust_csv_metadata::profiling::detect_data_type;
/// use rust_csv_metadata::types::DataType;
///
/// assert_eq!(detect_data_type(&["1", "2", "3"]), DataType::Integer);
/// assert_eq!(detect_data_type(&["1", "2", "abc"]), DataType::Text);
/// ```
pub fn detect_data_type(values: &[&str]) -> DataType {
    let non_empty: Vec<&str> = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect();

    if non_empty.is_empty() {
        return DataType::Text;
    }

    if non_empty.iter().all(|v| parse_number(v).is_some()) {
        return if non_empty.iter().any(|v| v.contains('.')) {
            DataType::Numeric
        } else {
            DataType::Integer
        };
    }

    if non_empty.iter().all(|v| is_date(v)) {
        return DataType::Date;
    }

    if non_empty.iter().all(|v| is_boolean(v)) {
        return DataType::Boolean;
    }

    DataType::Text
}

/// Parse a trimmed value as a number.
///
/// Accepts the usual decimal forms (`12`, `-3.5`, `.5`, `1e3`, `+7`), signed `Infinity`, and
/// unsigned `0x`/`0o`/`0b` integer literals. `NaN` and other spellings such as `inf` are
/// rejected.
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(n) = parse_prefixed_integer(trimmed) {
        return Some(n);
    }

    let unsigned = trimmed.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(trimmed);
    if unsigned == "Infinity" {
        return Some(if trimmed.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    // `str::parse::<f64>` also takes `inf`, `nan` and `infinity` in any case.
    if !unsigned
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn parse_prefixed_integer(value: &str) -> Option<f64> {
    let radix = match value.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &value[2..];
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

fn is_date(value: &str) -> bool {
    DATE_SHAPE.is_match(value) && parses_as_calendar_date(value)
}

fn parses_as_calendar_date(value: &str) -> bool {
    DATE_FORMATS
        .iter()
        .any(|fmt| NaiveDate::parse_from_str(value, fmt).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(value, fmt).is_ok())
        || DateTime::parse_from_rfc3339(value).is_ok()
}

fn is_boolean(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "false" | "1" | "0" | "yes" | "no"
    )
}
