//! CSV export of column metadata.
//!
//! One row per column, with a fixed header:
//!
//! `column_name,data_type,null_count,unique_count,min_value,max_value,mean_value,std_dev,sample_values`
//!
//! Absent statistics are written as empty cells and sample values are joined with `|`.

use std::io;

use crate::error::ProfilingResult;
use crate::types::DatasetMetadata;

/// Separator between sample values inside the `sample_values` cell.
pub const SAMPLE_SEPARATOR: &str = "|";

const HEADER: [&str; 9] = [
    "column_name",
    "data_type",
    "null_count",
    "unique_count",
    "min_value",
    "max_value",
    "mean_value",
    "std_dev",
    "sample_values",
];

/// Write one CSV row per column of `metadata` to `writer`.
pub fn write_columns_csv<W: io::Write>(writer: W, metadata: &DatasetMetadata) -> ProfilingResult<()> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(HEADER)?;

    for col in &metadata.columns {
        let stats = &col.stats;
        w.write_record([
            col.column_name.clone(),
            col.data_type_detected.to_string(),
            col.null_count.to_string(),
            col.unique_count.to_string(),
            stats.min_value.clone().unwrap_or_default(),
            stats.max_value.clone().unwrap_or_default(),
            stats.mean_value.map(|v| v.to_string()).unwrap_or_default(),
            stats.std_dev.map(|v| v.to_string()).unwrap_or_default(),
            col.sample_values.join(SAMPLE_SEPARATOR),
        ])?;
    }

    w.flush()?;
    Ok(())
}

/// [`write_columns_csv`] into a `String`.
pub fn columns_csv_string(metadata: &DatasetMetadata) -> ProfilingResult<String> {
    let mut buf = Vec::new();
    write_columns_csv(&mut buf, metadata)?;
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}
