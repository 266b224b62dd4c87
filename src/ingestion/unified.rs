//! Path-based profiling entrypoint.
//!
//! Most callers should use [`profile_from_path`], which reads a CSV file, parses it, extracts
//! its [`crate::types::DatasetMetadata`] and fills in `file_size`.
//!
//! - If [`ProfileOptions::max_file_size`] is set, larger files are rejected before they are
//!   read.
//! - If a [`super::observability::ProfilingObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::{ProfilingError, ProfilingResult};
use crate::profiling::extract_basic_metadata;
use crate::types::DatasetMetadata;

use super::csv::{parse_csv, read_csv_text};
use super::observability::{
    severity_for_error, ProfilingContext, ProfilingObserver, ProfilingSeverity, ProfilingStats,
};

/// Options controlling path-based profiling.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ProfileOptions {
    /// Reject inputs larger than this many bytes. `None` means no cap.
    pub max_file_size: Option<u64>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ProfilingObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ProfilingSeverity,
}

impl fmt::Debug for ProfileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileOptions")
            .field("max_file_size", &self.max_file_size)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ProfileOptions {
    fn default() -> Self {
        Self {
            max_file_size: None,
            observer: None,
            alert_at_or_above: ProfilingSeverity::Critical,
        }
    }
}

/// Profile an in-memory CSV document.
///
/// `file_size` is set to the byte length of `text`. Never fails.
pub fn profile_from_str(text: &str) -> DatasetMetadata {
    extract_basic_metadata(&parse_csv(text)).with_file_size(text.len() as u64)
}

/// Profile a CSV file on disk.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column/size stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use rust_csv_metadata::ingestion::{profile_from_path, ProfileOptions, StdErrObserver};
///
/// # fn main() -> Result<(), rust_csv_metadata::ProfilingError> {
/// let opts = ProfileOptions {
///     max_file_size: Some(50 * 1024 * 1024),
///     observer: Some(Arc::new(StdErrObserver::default())),
///     ..Default::default()
/// };
/// let md = profile_from_path("sales.csv", &opts)?;
/// println!("rows={} columns={}", md.total_rows, md.total_columns);
/// # Ok(())
/// # }
/// ```
pub fn profile_from_path(
    path: impl AsRef<Path>,
    options: &ProfileOptions,
) -> ProfilingResult<DatasetMetadata> {
    let path = path.as_ref();
    let ctx = ProfilingContext {
        path: path.to_path_buf(),
    };

    let result = profile_file(path, options.max_file_size);

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(md) => obs.on_success(
                &ctx,
                ProfilingStats {
                    rows: md.total_rows,
                    columns: md.total_columns,
                    file_size: md.file_size,
                    processing_time: md.processing_time,
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn profile_file(path: &Path, max_file_size: Option<u64>) -> ProfilingResult<DatasetMetadata> {
    let size = fs::metadata(path)?.len();
    if let Some(limit) = max_file_size {
        if size > limit {
            return Err(ProfilingError::FileTooLarge { size, limit });
        }
    }

    let text = read_csv_text(path)?;
    debug!(path = %path.display(), bytes = size, "read csv");

    Ok(extract_basic_metadata(&parse_csv(&text)).with_file_size(size))
}

/// Owned profiling job, e.g. for a work queue.
#[derive(Clone)]
pub struct ProfileRequest {
    /// Path to the input file.
    pub path: PathBuf,
    /// Options controlling profiling.
    pub options: ProfileOptions,
}

impl fmt::Debug for ProfileRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileRequest")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish()
    }
}

impl ProfileRequest {
    /// Create a request with default options.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: ProfileOptions::default(),
        }
    }

    /// Execute the request by calling [`profile_from_path`].
    pub fn run(&self) -> ProfilingResult<DatasetMetadata> {
        profile_from_path(&self.path, &self.options)
    }
}
