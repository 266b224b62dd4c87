//! Per-column summary statistics.

use crate::types::{ColumnStats, DataType};

use super::infer::parse_number;

/// Compute summary statistics for a column's raw values given its detected type.
///
/// - `Integer` / `Numeric`: numeric `min_value` / `max_value` (as shortest decimal strings),
///   arithmetic mean and population standard deviation (divisor = count).
/// - `Text`: lexicographically first and last value; no mean or deviation.
/// - `Date` / `Boolean`: nothing.
///
/// Columns without any non-empty value get no statistics at all.
///
/// ```
/// use rust_csv_metadata::profiling::calculate_column_stats;
/// use rust_csv_metadata::types::DataType;
///
/// let stats = calculate_column_stats(&["10", "20", "30"], DataType::Integer);
/// assert_eq!(stats.min_value.as_deref(), Some("10"));
/// assert_eq!(stats.mean_value, Some(20.0));
/// ```
pub fn calculate_column_stats(values: &[&str], data_type: DataType) -> ColumnStats {
    let non_empty = values.iter().copied().filter(|v| !v.trim().is_empty());

    match data_type {
        DataType::Integer | DataType::Numeric => {
            let numbers: Vec<f64> = non_empty.filter_map(parse_number).collect();
            numeric_stats(&numbers)
        }
        DataType::Text => {
            let mut values = non_empty.peekable();
            if values.peek().is_none() {
                return ColumnStats::default();
            }
            let (min, max) = values.fold((None::<&str>, None::<&str>), |(min, max), v| {
                (
                    Some(min.map_or(v, |m| m.min(v))),
                    Some(max.map_or(v, |m| m.max(v))),
                )
            });
            ColumnStats {
                min_value: min.map(str::to_string),
                max_value: max.map(str::to_string),
                ..ColumnStats::default()
            }
        }
        DataType::Date | DataType::Boolean => ColumnStats::default(),
    }
}

fn numeric_stats(numbers: &[f64]) -> ColumnStats {
    if numbers.is_empty() {
        return ColumnStats::default();
    }

    let count = numbers.len() as f64;
    let min = numbers.iter().copied().fold(f64::INFINITY, f64::min);
    let max = numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = numbers.iter().sum::<f64>() / count;
    let variance = numbers.iter().map(|n| (n - mean).powi(2)).sum::<f64>() / count;

    ColumnStats {
        min_value: Some(format_number(min)),
        max_value: Some(format_number(max)),
        mean_value: Some(mean),
        std_dev: Some(variance.sqrt()),
    }
}

/// Shortest decimal rendering: `10.0` becomes `"10"`, `2.5` stays `"2.5"`, infinities print as
/// `Infinity` / `-Infinity`.
fn format_number(n: f64) -> String {
    if n.is_infinite() {
        return (if n > 0.0 { "Infinity" } else { "-Infinity" }).to_string();
    }
    if n == 0.0 {
        // Avoid "-0".
        return "0".to_string();
    }
    n.to_string()
}
