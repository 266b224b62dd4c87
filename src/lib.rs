//! `rust-csv-metadata` parses uploaded CSV text and profiles it: per-column type inference,
//! null and distinct counts, sample values, and descriptive statistics.
//!
//! The two core operations are pure and never fail:
//!
//! - [`parse_csv`]: raw text into a ragged grid of string cells (row 0 is the header)
//! - [`extract_basic_metadata`]: a grid into a [`types::DatasetMetadata`]
//!
//! ## Detected column types
//!
//! Detection is unanimous over the non-empty values of a column, tried in this order:
//!
//! - [`types::DataType::Integer`] / [`types::DataType::Numeric`] (numeric if any value has a `.`)
//! - [`types::DataType::Date`] (`YYYY-MM-DD`, `MM/DD/YYYY`, `MM-DD-YYYY`)
//! - [`types::DataType::Boolean`] (`true/false/1/0/yes/no`, case-insensitive)
//! - [`types::DataType::Text`] otherwise, and for columns with no values at all
//!
//! ## Quick example
//!
//! ```rust
//! use rust_csv_metadata::{extract_basic_metadata, parse_csv};
//!
//! let grid = parse_csv("id,name,score\n1,\"Smith, J\",10\n2,Lee,20\n3,,30\n");
//! let md = extract_basic_metadata(&grid);
//!
//! assert_eq!(md.total_rows, 3);
//! let name = md.column("name").unwrap();
//! assert_eq!(name.null_count, 1);
//! assert_eq!(name.sample_values, vec!["Smith, J", "Lee"]);
//! assert_eq!(md.column("score").unwrap().stats.mean_value, Some(20.0));
//! ```
//!
//! ## Files and batches
//!
//! [`ingestion::profile_from_path`] reads a file, profiles it, fills in `file_size`, and reports
//! to an optional [`ingestion::ProfilingObserver`]. For many files, use
//! [`execution::ExecutionEngine`]:
//!
//! ```no_run
//! use rust_csv_metadata::execution::{ExecutionEngine, ExecutionOptions};
//! use rust_csv_metadata::ingestion::{discover_csv_files, ProfileOptions};
//!
//! # fn main() -> Result<(), rust_csv_metadata::ProfilingError> {
//! let paths = discover_csv_files("uploads")?;
//! let engine = ExecutionEngine::new(ExecutionOptions::default())?;
//! for outcome in engine.profile_paths(&paths, &ProfileOptions::default()) {
//!     match outcome.result {
//!         Ok(md) => println!("{}: {} rows", outcome.path.display(), md.total_rows),
//!         Err(e) => eprintln!("{}: {e}", outcome.path.display()),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## AI analysis and reports
//!
//! - [`analysis`]: prompt samples, cleaning model output, normalizing stored analyses, and
//!   parsing analysis suggestions
//! - [`report`]: column metadata as a CSV report

pub mod analysis;
pub mod error;
pub mod execution;
pub mod ingestion;
pub mod profiling;
pub mod report;
pub mod types;

pub use error::{ProfilingError, ProfilingResult};
pub use ingestion::csv::parse_csv;
pub use profiling::extract_basic_metadata;
