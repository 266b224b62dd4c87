//! Full dataset metadata extraction.

use std::collections::HashSet;
use std::time::Instant;

use tracing::debug;

use crate::ingestion::csv::trim_cell;
use crate::types::{ColumnMetadata, DatasetMetadata, MAX_SAMPLE_VALUES};

use super::infer::detect_data_type;
use super::stats::calculate_column_stats;

/// Extract per-column metadata from a parsed grid.
///
/// Row 0 is the header (each cell trimmed); every later row is a data row. Columns are
/// projected by header index, and a row that is too short contributes an empty value, so
/// ragged input never panics. Cells beyond the header width are ignored.
///
/// `file_size` is left at 0 for the caller to fill in (see [`DatasetMetadata::with_file_size`]);
/// `processing_time` covers the whole call.
///
/// ```
/// use rust_csv_metadata::{extract_basic_metadata, parse_csv};
/// use rust_csv_metadata::types::DataType;
///
/// let md = extract_basic_metadata(&parse_csv("id,city\n1,Oslo\n2,\n3,Oslo\n"));
/// assert_eq!(md.total_rows, 3);
/// assert_eq!(md.columns[0].data_type_detected, DataType::Integer);
/// assert_eq!(md.columns[1].null_count, 1);
/// assert_eq!(md.columns[1].unique_count, 1);
/// ```
pub fn extract_basic_metadata(grid: &[Vec<String>]) -> DatasetMetadata {
    let start = Instant::now();

    let Some((headers, data_rows)) = grid.split_first() else {
        return DatasetMetadata::empty(start.elapsed());
    };

    let columns: Vec<ColumnMetadata> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| column_metadata(header, idx, data_rows))
        .collect();

    let out = DatasetMetadata {
        total_rows: data_rows.len(),
        total_columns: headers.len(),
        columns,
        file_size: 0,
        processing_time: start.elapsed(),
    };

    debug!(
        rows = out.total_rows,
        columns = out.total_columns,
        elapsed_us = out.processing_time.as_micros() as u64,
        "extracted basic metadata"
    );
    out
}

fn column_metadata(header: &str, idx: usize, data_rows: &[Vec<String>]) -> ColumnMetadata {
    let values: Vec<&str> = data_rows
        .iter()
        .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
        .collect();

    let mut seen: HashSet<&str> = HashSet::new();
    let mut distinct: Vec<&str> = Vec::new();
    let mut non_empty = 0usize;
    for &v in &values {
        if v.trim().is_empty() {
            continue;
        }
        non_empty += 1;
        if seen.insert(v) {
            distinct.push(v);
        }
    }

    let data_type = detect_data_type(&values);
    let stats = calculate_column_stats(&values, data_type);

    ColumnMetadata {
        column_name: trim_cell(header).to_string(),
        data_type_detected: data_type,
        sample_values: distinct
            .iter()
            .take(MAX_SAMPLE_VALUES)
            .map(|s| s.to_string())
            .collect(),
        null_count: values.len() - non_empty,
        unique_count: distinct.len(),
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::extract_basic_metadata;
    use crate::ingestion::csv::parse_csv;
    use crate::types::DataType;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn empty_grid_yields_zeroed_metadata() {
        let md = extract_basic_metadata(&[]);
        assert_eq!(md.total_rows, 0);
        assert_eq!(md.total_columns, 0);
        assert!(md.columns.is_empty());
        assert_eq!(md.file_size, 0);
    }

    #[test]
    fn header_only_grid_has_text_columns_without_values() {
        let md = extract_basic_metadata(&grid(&[&[" a ", "b"]]));
        assert_eq!(md.total_rows, 0);
        assert_eq!(md.total_columns, 2);
        assert_eq!(md.columns[0].column_name, "a");
        assert_eq!(md.columns[0].data_type_detected, DataType::Text);
        assert_eq!(md.columns[0].null_count, 0);
        assert_eq!(md.columns[0].unique_count, 0);
        assert!(md.columns[0].sample_values.is_empty());
    }

    #[test]
    fn samples_are_first_distinct_values_capped_at_five() {
        let md = extract_basic_metadata(&grid(&[
            &["v"],
            &["x"],
            &["y"],
            &["x"],
            &["z"],
            &["y"],
            &["w"],
            &["x"],
        ]));
        let col = &md.columns[0];
        assert_eq!(col.unique_count, 4);
        assert_eq!(col.sample_values, vec!["x", "y", "z", "w"]);

        let many: Vec<Vec<String>> = std::iter::once(vec!["n".to_string()])
            .chain((0..20).map(|i| vec![format!("item{i}")]))
            .collect();
        let md = extract_basic_metadata(&many);
        assert_eq!(md.columns[0].unique_count, 20);
        assert_eq!(
            md.columns[0].sample_values,
            vec!["item0", "item1", "item2", "item3", "item4"]
        );
    }

    #[test]
    fn short_rows_count_as_nulls_and_long_rows_are_ignored() {
        let md = extract_basic_metadata(&grid(&[
            &["a", "b"],
            &["1"],
            &["2", "x", "extra"],
            &["3", ""],
        ]));
        assert_eq!(md.total_columns, 2);
        assert_eq!(md.columns.len(), 2);
        assert_eq!(md.columns[1].null_count, 2);
        assert_eq!(md.columns[1].unique_count, 1);
        assert_eq!(md.columns[0].null_count, 0);
    }

    #[test]
    fn numeric_column_carries_stats_and_text_column_carries_bounds() {
        let md = extract_basic_metadata(&parse_csv("n,t\n10,b\n20,a\n30,c\n"));
        let n = &md.columns[0];
        assert_eq!(n.data_type_detected, DataType::Integer);
        assert_eq!(n.stats.min_value.as_deref(), Some("10"));
        assert_eq!(n.stats.max_value.as_deref(), Some("30"));
        assert_eq!(n.stats.mean_value, Some(20.0));

        let t = &md.columns[1];
        assert_eq!(t.data_type_detected, DataType::Text);
        assert_eq!(t.stats.min_value.as_deref(), Some("a"));
        assert_eq!(t.stats.max_value.as_deref(), Some("c"));
        assert_eq!(t.stats.mean_value, None);
    }

    #[test]
    fn whitespace_only_cells_are_nulls() {
        let md = extract_basic_metadata(&grid(&[&["a"], &["  "], &["1"]]));
        assert_eq!(md.columns[0].null_count, 1);
        assert_eq!(md.columns[0].data_type_detected, DataType::Integer);
    }

    #[test]
    fn extraction_is_idempotent_apart_from_timing() {
        let g = parse_csv("id,when,flag\n1,2023-01-01,yes\n2,2023-02-01,no\n");
        let a = extract_basic_metadata(&g);
        let b = extract_basic_metadata(&g);
        assert!(a.same_content(&b));
        assert_eq!(a.columns[1].data_type_detected, DataType::Date);
        assert_eq!(a.columns[2].data_type_detected, DataType::Boolean);
    }
}
