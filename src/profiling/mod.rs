//! Column type inference and statistics.
//!
//! The profiling layer operates on the [`crate::types::Grid`] produced by
//! [`crate::ingestion::csv::parse_csv`]. Every function here is pure and synchronous: no I/O,
//! no shared state, and no failure mode. Malformed values simply fall through to a more
//! general column type.
//!
//! - [`detect_data_type()`]: unanimous type ladder (integer/numeric, date, boolean, text)
//! - [`calculate_column_stats()`]: min/max/mean/std-dev for numbers, lexicographic bounds for text
//! - [`extract_basic_metadata()`]: the whole grid into a [`crate::types::DatasetMetadata`]
//!
//! ## Example
//!
//! ```rust
//! use rust_csv_metadata::ingestion::csv::parse_csv;
//! use rust_csv_metadata::profiling::extract_basic_metadata;
//! use rust_csv_metadata::types::DataType;
//!
//! let text = "id,price,joined,active\n1,9.99,2024-01-05,yes\n2,12.50,2024-02-11,no\n";
//! let md = extract_basic_metadata(&parse_csv(text)).with_file_size(text.len() as u64);
//!
//! assert_eq!(md.total_rows, 2);
//! assert_eq!(md.column("price").unwrap().data_type_detected, DataType::Numeric);
//! assert_eq!(md.column("joined").unwrap().data_type_detected, DataType::Date);
//! assert_eq!(md.column("active").unwrap().data_type_detected, DataType::Boolean);
//! ```

pub mod extract;
pub mod infer;
pub mod stats;

pub use extract::extract_basic_metadata;
pub use infer::detect_data_type;
pub use stats::calculate_column_stats;
