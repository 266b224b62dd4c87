use thiserror::Error;

/// Convenience result type for the fallible edges of the crate.
pub type ProfilingResult<T> = Result<T, ProfilingError>;

/// Error type returned by file entrypoints, report export and AI-output parsing.
///
/// [`crate::parse_csv`] and [`crate::extract_basic_metadata`] never fail; malformed input
/// degrades into a more general column type instead of an error.
#[derive(Debug, Error)]
pub enum ProfilingError {
    /// Underlying I/O error (e.g. file not found, permission denied, invalid UTF-8).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV report writing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input exceeds the configured size cap.
    #[error("file too large: {size} bytes exceeds limit of {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },

    /// Invalid caller input (bad glob pattern, unreadable directory entry, ...).
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The AI model output could not be parsed as a JSON analysis object.
    #[error("failed to parse AI analysis response: {message}")]
    AnalysisParse { message: String, raw: String },
}
