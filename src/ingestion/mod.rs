//! Reading and parsing CSV input.
//!
//! Most callers should use [`profile_from_path`] (from [`unified`]) which:
//!
//! - reads the file (optionally capped by [`ProfileOptions::max_file_size`])
//! - parses it with [`csv::parse_csv`] and extracts [`crate::types::DatasetMetadata`]
//! - optionally reports success/failure/alerts to a [`ProfilingObserver`]
//!
//! Also available:
//! - [`csv`]: the text parser itself
//! - [`discovery`]: finding CSV files by directory walk or glob pattern

pub mod csv;
pub mod discovery;
pub mod observability;
pub mod unified;

pub use discovery::{discover_csv_files, glob_csv_files};
pub use observability::{
    severity_for_error, CompositeObserver, FileObserver, ProfilingContext, ProfilingObserver,
    ProfilingSeverity, ProfilingStats, StdErrObserver, TracingObserver,
};
pub use unified::{profile_from_path, profile_from_str, ProfileOptions, ProfileRequest};
