use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::ProfilingError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProfilingSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (operation failed).
    Error,
    /// Critical error (typically I/O or other infrastructure failures).
    Critical,
}

/// Context about a profiling attempt.
#[derive(Debug, Clone)]
pub struct ProfilingContext {
    /// The input path being profiled.
    pub path: PathBuf,
}

/// Stats reported on successful profiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfilingStats {
    /// Data rows (header excluded).
    pub rows: usize,
    /// Header columns.
    pub columns: usize,
    /// Source size in bytes.
    pub file_size: u64,
    /// Time spent in metadata extraction.
    pub processing_time: Duration,
}

/// Observer interface for profiling outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts.
pub trait ProfilingObserver: Send + Sync {
    /// Called when profiling succeeds.
    fn on_success(&self, _ctx: &ProfilingContext, _stats: ProfilingStats) {}

    /// Called when profiling fails.
    fn on_failure(&self, _ctx: &ProfilingContext, _severity: ProfilingSeverity, _error: &ProfilingError) {}

    /// Called when a profiling failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &ProfilingContext, severity: ProfilingSeverity, error: &ProfilingError) {
        self.on_failure(ctx, severity, error)
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ProfilingObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ProfilingObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ProfilingObserver for CompositeObserver {
    fn on_success(&self, ctx: &ProfilingContext, stats: ProfilingStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &ProfilingContext, severity: ProfilingSeverity, error: &ProfilingError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ProfilingContext, severity: ProfilingSeverity, error: &ProfilingError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Logs profiling events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ProfilingObserver for StdErrObserver {
    fn on_success(&self, ctx: &ProfilingContext, stats: ProfilingStats) {
        eprintln!(
            "[profile][ok] path={} rows={} columns={} bytes={} elapsed={:?}",
            ctx.path.display(),
            stats.rows,
            stats.columns,
            stats.file_size,
            stats.processing_time
        );
    }

    fn on_failure(&self, ctx: &ProfilingContext, severity: ProfilingSeverity, error: &ProfilingError) {
        eprintln!("[profile][{:?}] path={} err={}", severity, ctx.path.display(), error);
    }

    fn on_alert(&self, ctx: &ProfilingContext, severity: ProfilingSeverity, error: &ProfilingError) {
        eprintln!(
            "[ALERT][profile][{:?}] path={} err={}",
            severity,
            ctx.path.display(),
            error
        );
    }
}

/// Forwards profiling events to `tracing`.
///
/// Successes are `info`, failures `warn` (or `error` at [`ProfilingSeverity::Critical`]), and
/// alerts always `error`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ProfilingObserver for TracingObserver {
    fn on_success(&self, ctx: &ProfilingContext, stats: ProfilingStats) {
        tracing::info!(
            path = %ctx.path.display(),
            rows = stats.rows,
            columns = stats.columns,
            bytes = stats.file_size,
            elapsed_ms = stats.processing_time.as_millis() as u64,
            "profiled csv"
        );
    }

    fn on_failure(&self, ctx: &ProfilingContext, severity: ProfilingSeverity, error: &ProfilingError) {
        if severity >= ProfilingSeverity::Critical {
            tracing::error!(path = %ctx.path.display(), ?severity, %error, "profiling failed");
        } else {
            tracing::warn!(path = %ctx.path.display(), ?severity, %error, "profiling failed");
        }
    }

    fn on_alert(&self, ctx: &ProfilingContext, severity: ProfilingSeverity, error: &ProfilingError) {
        tracing::error!(path = %ctx.path.display(), ?severity, %error, alert = true, "profiling alert");
    }
}

/// Appends profiling events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ProfilingObserver for FileObserver {
    fn on_success(&self, ctx: &ProfilingContext, stats: ProfilingStats) {
        self.append_line(&format!(
            "{} ok path={} rows={} columns={} bytes={}",
            unix_ts(),
            ctx.path.display(),
            stats.rows,
            stats.columns,
            stats.file_size
        ));
    }

    fn on_failure(&self, ctx: &ProfilingContext, severity: ProfilingSeverity, error: &ProfilingError) {
        self.append_line(&format!(
            "{} fail severity={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.path.display(),
            error
        ));
    }

    fn on_alert(&self, ctx: &ProfilingContext, severity: ProfilingSeverity, error: &ProfilingError) {
        self.append_line(&format!(
            "{} ALERT severity={:?} path={} err={}",
            unix_ts(),
            severity,
            ctx.path.display(),
            error
        ));
    }
}

/// Severity used when reporting `error` to observers.
///
/// I/O failures are infrastructure problems and rank `Critical`; everything else is `Error`.
pub fn severity_for_error(error: &ProfilingError) -> ProfilingSeverity {
    match error {
        ProfilingError::Io(_) => ProfilingSeverity::Critical,
        ProfilingError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => ProfilingSeverity::Critical,
            _ => ProfilingSeverity::Error,
        },
        ProfilingError::Json(err) if err.is_io() => ProfilingSeverity::Critical,
        ProfilingError::Json(_)
        | ProfilingError::FileTooLarge { .. }
        | ProfilingError::InvalidInput { .. }
        | ProfilingError::AnalysisParse { .. } => ProfilingSeverity::Error,
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::{severity_for_error, ProfilingSeverity};
    use crate::error::ProfilingError;

    #[test]
    fn io_errors_are_critical() {
        let err = ProfilingError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(severity_for_error(&err), ProfilingSeverity::Critical);
    }

    #[test]
    fn size_cap_is_a_plain_error() {
        let err = ProfilingError::FileTooLarge { size: 10, limit: 5 };
        assert_eq!(severity_for_error(&err), ProfilingSeverity::Error);
    }

    #[test]
    fn severities_are_ordered() {
        assert!(ProfilingSeverity::Info < ProfilingSeverity::Warning);
        assert!(ProfilingSeverity::Error < ProfilingSeverity::Critical);
    }
}
