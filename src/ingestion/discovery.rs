//! Finding CSV files to profile.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ProfilingError, ProfilingResult};

/// Recursively list `.csv` files (extension matched case-insensitively) under `dir`.
///
/// Results are sorted so batch output is stable across runs.
pub fn discover_csv_files(dir: impl AsRef<Path>) -> ProfilingResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir.as_ref()).follow_links(false) {
        let entry = entry.map_err(|e| ProfilingError::InvalidInput {
            message: format!("failed to walk {}: {e}", dir.as_ref().display()),
        })?;
        if entry.file_type().is_file() && has_csv_extension(entry.path()) {
            out.push(entry.into_path());
        }
    }
    out.sort();
    Ok(out)
}

/// List files matching a glob pattern such as `uploads/**/*.csv`.
///
/// Only regular files are returned; the pattern decides which extensions qualify.
pub fn glob_csv_files(pattern: &str) -> ProfilingResult<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|e| ProfilingError::InvalidInput {
        message: format!("invalid glob pattern '{pattern}': {e}"),
    })?;

    let mut out = Vec::new();
    for p in paths {
        let p = p.map_err(|e| ProfilingError::InvalidInput {
            message: format!("failed to read glob match: {e}"),
        })?;
        if p.is_file() {
            out.push(p);
        }
    }
    out.sort();
    Ok(out)
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

#[cfg(test)]
mod tests {
    use super::has_csv_extension;
    use std::path::Path;

    #[test]
    fn csv_extension_is_case_insensitive() {
        assert!(has_csv_extension(Path::new("a/b.csv")));
        assert!(has_csv_extension(Path::new("B.CSV")));
        assert!(!has_csv_extension(Path::new("b.tsv")));
        assert!(!has_csv_extension(Path::new("csv")));
    }
}
