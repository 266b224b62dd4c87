//! Helpers for the boundary with the external AI schema analysis.
//!
//! The HTTP call itself lives outside this crate. What lives here is everything on either side
//! of it: the text sample sent with the prompt, cleaning and parsing what comes back
//! ([`response`]), and turning the model's free-text ideas into structured suggestions
//! ([`suggestions`]).
//!
//! ```
//! use rust_csv_metadata::analysis::{dataset_name_from_file, prompt_sample};
//!
//! let text = "id,name\n1,a\n2,b\n3,c";
//! assert_eq!(prompt_sample(text, 2), "id,name\n1,a");
//! assert_eq!(dataset_name_from_file("sales.csv"), "sales");
//! ```

pub mod response;
pub mod suggestions;

pub use response::{
    analysis_data, parse_model_output, strip_code_fences, AiSchemaResponse, AnalysisData,
    AnalysisPayload, ColumnAnalysis, NestedAnalysis, GENERATED_TABLE_NAME,
};
pub use suggestions::{
    parse_suggestions, AnalysisSuggestion, AnalysisType, Complexity, SuggestionMetadata,
    DEFAULT_CONFIDENCE,
};

/// Number of lines (header included) sent to the model by default.
pub const DEFAULT_SAMPLE_LINES: usize = 20;

/// The first `max_lines` lines of `text`, joined by `\n`.
///
/// Lines are split on `\n` only, so a `\r` from CRLF input stays at the end of its line.
pub fn prompt_sample(text: &str, max_lines: usize) -> String {
    text.split('\n').take(max_lines).collect::<Vec<_>>().join("\n")
}

/// Display name of an uploaded dataset: the file name with its first `.csv` removed.
pub fn dataset_name_from_file(file_name: &str) -> String {
    file_name.replacen(".csv", "", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_keeps_header_and_caps_lines() {
        let text: String = (0..30).map(|i| format!("row{i}\n")).collect();
        let sample = prompt_sample(&text, DEFAULT_SAMPLE_LINES);
        assert_eq!(sample.lines().count(), 20);
        assert!(sample.starts_with("row0\nrow1"));
        assert!(sample.ends_with("row19"));
    }

    #[test]
    fn short_input_is_returned_whole() {
        assert_eq!(prompt_sample("a,b\n1,2", 20), "a,b\n1,2");
        assert_eq!(prompt_sample("", 20), "");
    }

    #[test]
    fn dataset_name_drops_first_csv_only() {
        assert_eq!(dataset_name_from_file("q1.csv"), "q1");
        assert_eq!(dataset_name_from_file("a.csv.csv"), "a.csv");
        assert_eq!(dataset_name_from_file("notes.txt"), "notes.txt");
    }
}
