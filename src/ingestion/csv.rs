//! CSV text parsing.
//!
//! This is a deliberately small dialect that matches what typical spreadsheet exports produce:
//!
//! - rows are separated by `\n` (a trailing `\r` is trimmed away with the cell whitespace)
//! - blank and whitespace-only lines are dropped
//! - a `"` at the start of a cell opens a quoted span in which commas are literal
//! - every cell is trimmed, then loses one leading and one trailing `"` if present
//!
//! Escaped quotes (`""`) and quoted fields spanning several lines are **not** supported: a field
//! containing a literal newline is split into two rows.

use std::fs;
use std::path::Path;

use crate::error::ProfilingResult;
use crate::types::Grid;

/// Parse CSV text into a ragged grid of string cells.
///
/// Never fails. An empty input (or one made only of blank lines) yields an empty grid, and a
/// line without commas yields a one-cell row.
///
/// ```
/// use rust_csv_metadata::parse_csv;
///
/// let grid = parse_csv("id,name\n1,\"Doe, Jane\"\n");
/// assert_eq!(grid, vec![vec!["id", "name"], vec!["1", "Doe, Jane"]]);
/// ```
pub fn parse_csv(text: &str) -> Grid {
    text.split('\n')
        .filter(|line| !trim_cell(line).is_empty())
        .map(parse_line)
        .collect()
}

/// Read a file into a string for [`parse_csv`].
///
/// Invalid UTF-8 is reported as an I/O error of kind `InvalidData`.
pub fn read_csv_text(path: impl AsRef<Path>) -> ProfilingResult<String> {
    Ok(fs::read_to_string(path)?)
}

fn parse_line(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let last = chars.len().saturating_sub(1);

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for (i, &c) in chars.iter().enumerate() {
        if c == '"' && (i == 0 || chars[i - 1] == ',') {
            in_quotes = true;
        } else if c == '"' && in_quotes && (i == last || chars[i + 1] == ',') {
            in_quotes = false;
        } else if c == ',' && !in_quotes {
            cells.push(strip_outer_quotes(trim_cell(&current)));
            current.clear();
        } else {
            current.push(c);
        }
    }
    cells.push(strip_outer_quotes(trim_cell(&current)));
    cells
}

/// Drops one leading and one trailing `"`. Interior quotes are left alone.
fn strip_outer_quotes(cell: &str) -> String {
    let inner = cell.strip_prefix('"').unwrap_or(cell);
    inner.strip_suffix('"').unwrap_or(inner).to_string()
}

/// Whitespace trim that also drops a byte-order mark, so a BOM-prefixed header cell comes out
/// clean.
pub(crate) fn trim_cell(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}
