//! Core data model types for CSV metadata extraction.
//!
//! The parser produces a [`Grid`] (row 0 is the header) and the extractor turns it into a
//! [`DatasetMetadata`] with one [`ColumnMetadata`] per header cell.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Ragged sequence of rows of string cells. Row 0 is conventionally the header.
pub type Grid = Vec<Vec<String>>;

/// Maximum number of distinct sample values kept per column.
pub const MAX_SAMPLE_VALUES: usize = 5;

/// Primitive type detected for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Whole numbers (every value numeric, none containing a decimal point).
    Integer,
    /// Numbers where at least one value contains a decimal point.
    Numeric,
    /// Calendar dates (`YYYY-MM-DD`, `MM/DD/YYYY`, `MM-DD-YYYY`).
    Date,
    /// `true`/`false`/`1`/`0`/`yes`/`no`, case-insensitive.
    Boolean,
    /// Anything else, and columns without any non-empty value.
    Text,
}

impl DataType {
    /// Lowercase name as stored alongside the dataset.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Numeric => "numeric",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Text => "text",
        }
    }

    /// Returns true for `Integer` and `Numeric`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Numeric)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary statistics for one column.
///
/// Numeric columns fill every field; text columns only carry lexicographic `min_value` /
/// `max_value`; date and boolean columns carry nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
}

/// Per-column type and statistics summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    /// Header cell, trimmed.
    pub column_name: String,
    /// Result of type inference over the non-empty values.
    pub data_type_detected: DataType,
    /// Up to [`MAX_SAMPLE_VALUES`] distinct non-empty values in first-seen order.
    pub sample_values: Vec<String>,
    /// Number of data rows whose cell is missing or blank.
    pub null_count: usize,
    /// Number of distinct non-empty values.
    pub unique_count: usize,
    #[serde(flatten)]
    pub stats: ColumnStats,
}

impl ColumnMetadata {
    /// Number of non-empty values, i.e. `total_rows - null_count`.
    pub fn non_empty_count(&self, total_rows: usize) -> usize {
        total_rows.saturating_sub(self.null_count)
    }
}

/// Locally computed (non-AI) dataset summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    /// Data rows, header excluded.
    pub total_rows: usize,
    /// Header cell count.
    pub total_columns: usize,
    /// One entry per header cell, in header order.
    pub columns: Vec<ColumnMetadata>,
    /// Size of the source in bytes. Set by the caller; extraction leaves it at 0.
    pub file_size: u64,
    /// Wall-clock duration of the extraction call.
    #[serde(with = "duration_millis")]
    pub processing_time: Duration,
}

impl DatasetMetadata {
    /// An all-zero record (no rows, no columns).
    pub fn empty(processing_time: Duration) -> Self {
        Self {
            total_rows: 0,
            total_columns: 0,
            columns: Vec::new(),
            file_size: 0,
            processing_time,
        }
    }

    /// Set `file_size` and return `self`.
    pub fn with_file_size(mut self, file_size: u64) -> Self {
        self.file_size = file_size;
        self
    }

    /// Returns the column with the given name, if present.
    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns.iter().find(|c| c.column_name == name)
    }

    /// Compares two records ignoring `processing_time`.
    pub fn same_content(&self, other: &Self) -> bool {
        self.total_rows == other.total_rows
            && self.total_columns == other.total_columns
            && self.file_size == other.file_size
            && self.columns == other.columns
    }
}

/// Serializes a [`Duration`] as whole milliseconds, the unit the stored blob uses.
mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis().min(u64::MAX as u128) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_column() -> ColumnMetadata {
        ColumnMetadata {
            column_name: "score".to_string(),
            data_type_detected: DataType::Integer,
            sample_values: vec!["10".to_string(), "20".to_string()],
            null_count: 1,
            unique_count: 2,
            stats: ColumnStats {
                min_value: Some("10".to_string()),
                max_value: Some("20".to_string()),
                mean_value: Some(15.0),
                std_dev: Some(5.0),
            },
        }
    }

    #[test]
    fn data_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DataType::Numeric).unwrap(), "\"numeric\"");
        assert_eq!(DataType::Boolean.to_string(), "boolean");
        assert!(DataType::Integer.is_numeric());
        assert!(!DataType::Date.is_numeric());
    }

    #[test]
    fn column_stats_are_flattened_and_omitted_when_absent() {
        let v = serde_json::to_value(sample_column()).unwrap();
        assert_eq!(v["min_value"], "10");
        assert_eq!(v["mean_value"], 15.0);
        assert_eq!(v["data_type_detected"], "integer");

        let mut text = sample_column();
        text.stats = ColumnStats::default();
        let v = serde_json::to_value(text).unwrap();
        assert!(v.get("min_value").is_none());
        assert!(v.get("std_dev").is_none());
    }

    #[test]
    fn processing_time_round_trips_as_millis() {
        let md = DatasetMetadata {
            total_rows: 3,
            total_columns: 1,
            columns: vec![sample_column()],
            file_size: 42,
            processing_time: Duration::from_millis(7),
        };
        let v = serde_json::to_value(&md).unwrap();
        assert_eq!(v["processing_time"], 7);

        let back: DatasetMetadata = serde_json::from_value(v).unwrap();
        assert_eq!(back, md);
    }

    #[test]
    fn same_content_ignores_processing_time() {
        let a = DatasetMetadata::empty(Duration::from_millis(1));
        let b = DatasetMetadata::empty(Duration::from_millis(99));
        assert!(a.same_content(&b));
        assert!(!a.same_content(&b.clone().with_file_size(10)));
    }
}
