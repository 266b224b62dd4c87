//! Extracting structured analysis suggestions from free-form model text.
//!
//! The model answers "what could I analyze in this dataset?" with a numbered markdown list:
//!
//! ```text
//! 1. **Defect Rate by Vendor** - Compare "defect_count" across Vendor_Name over 20 minutes.
//! 2. **Monthly Cost Trend** - Track spend over time.
//! ```
//!
//! [`parse_suggestions`] turns each item into an [`AnalysisSuggestion`] and classifies it with
//! simple keyword rules.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// At most this many required columns are kept per suggestion.
pub const MAX_REQUIRED_COLUMNS: usize = 5;

/// Confidence attached to every suggestion parsed from model text.
pub const DEFAULT_CONFIDENCE: f64 = 0.8;

static ITEM_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)(\d+)\.\s*\*\*(.*?)\*\*\s*-\s*").expect("suggestion header regex is valid")
});
static ITEM_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\d+\.|\n\n").expect("suggestion end regex is valid"));
static TIME_ESTIMATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+)\s*(minute|hour|min|hr)s?").expect("time estimate regex is valid")
});
static COLUMN_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([^"]+)"|'([^']+)'|(?-u:\b)([A-Z][a-z_]+(?:_[a-z]+)*)(?-u:\b)"#)
        .expect("column reference regex is valid")
});

/// Kind of analysis a suggestion proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    QualityAnalysis,
    VendorAnalysis,
    TrendAnalysis,
    CostAnalysis,
    CorrelationAnalysis,
    GeneralAnalysis,
}

impl AnalysisType {
    fn classify(text: &str) -> Self {
        let has = |words: &[&str]| words.iter().any(|w| text.contains(w));
        if has(&["defect", "quality", "error"]) {
            Self::QualityAnalysis
        } else if has(&["vendor", "supplier", "performance"]) {
            Self::VendorAnalysis
        } else if has(&["trend", "time", "temporal"]) {
            Self::TrendAnalysis
        } else if has(&["cost", "financial", "budget"]) {
            Self::CostAnalysis
        } else if has(&["correlation", "relationship"]) {
            Self::CorrelationAnalysis
        } else {
            Self::GeneralAnalysis
        }
    }
}

/// Rough difficulty of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    Basic,
    Intermediate,
    Advanced,
}

impl Complexity {
    fn classify(text: &str) -> Self {
        let has = |words: &[&str]| words.iter().any(|w| text.contains(w));
        if has(&["advanced", "complex", "correlation", "multivariate"]) {
            Self::Advanced
        } else if has(&["comparison", "trend", "analysis"]) {
            Self::Intermediate
        } else {
            Self::Basic
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        })
    }
}

/// Provenance stored with each suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionMetadata {
    /// Number the model gave the item.
    pub order: u64,
    pub extracted_from_ai: bool,
    pub confidence_score: f64,
}

/// One numbered suggestion from the model's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSuggestion {
    pub title: String,
    pub description: String,
    pub analysis_type: AnalysisType,
    pub complexity_level: Complexity,
    pub estimated_time_minutes: u32,
    pub required_columns: Vec<String>,
    pub suggested_prompt: String,
    pub metadata: SuggestionMetadata,
}

/// Parse every `N. **Title** - description` item out of `content`.
///
/// A description runs until the next line starting with `N.`, a blank line, or the end of the
/// text. Text that contains no such items yields an empty list.
pub fn parse_suggestions(content: &str) -> Vec<AnalysisSuggestion> {
    let mut out = Vec::new();
    let mut pos = 0;

    while let Some(caps) = ITEM_HEADER.captures_at(content, pos) {
        let Some(header) = caps.get(0) else { break };
        let desc_start = header.end();
        let desc_end = ITEM_END
            .find_at(content, desc_start)
            .map_or(content.len(), |m| m.start());

        let order = caps[1].parse::<u64>().unwrap_or_default();
        let title = caps[2].trim();
        let description = content[desc_start..desc_end].trim();
        out.push(build_suggestion(order, title, description));

        // An empty item cannot advance the cursor on its own.
        pos = desc_end.max(header.start() + 1);
    }

    out
}

fn build_suggestion(order: u64, title: &str, description: &str) -> AnalysisSuggestion {
    let combined = format!("{title} {description}").to_lowercase();
    AnalysisSuggestion {
        title: title.to_string(),
        description: description.to_string(),
        analysis_type: AnalysisType::classify(&combined),
        complexity_level: Complexity::classify(&combined),
        estimated_time_minutes: estimate_minutes(description),
        required_columns: required_columns(description),
        suggested_prompt: suggested_prompt(title, description),
        metadata: SuggestionMetadata {
            order,
            extracted_from_ai: true,
            confidence_score: DEFAULT_CONFIDENCE,
        },
    }
}

fn estimate_minutes(description: &str) -> u32 {
    if let Some(caps) = TIME_ESTIMATE.captures(description) {
        if let Ok(value) = caps[1].parse::<u32>() {
            let unit = caps[2].to_lowercase();
            return if unit.starts_with("hour") || unit.starts_with("hr") {
                value.saturating_mul(60)
            } else {
                value
            };
        }
    }

    let lower = description.to_lowercase();
    if lower.contains("advanced") || lower.contains("complex") {
        30
    } else if lower.contains("analysis") || lower.contains("comparison") {
        15
    } else {
        10
    }
}

fn required_columns(description: &str) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for caps in COLUMN_REF.captures_iter(description) {
        let Some(m) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) else {
            continue;
        };
        let name = m.as_str();
        if name.chars().count() > 2 && !columns.iter().any(|c| c == name) {
            columns.push(name.to_string());
        }
    }
    columns.truncate(MAX_REQUIRED_COLUMNS);
    columns
}

fn suggested_prompt(title: &str, description: &str) -> String {
    let first_sentence = description.split('.').next().unwrap_or_default();
    format!(
        "Analyze the dataset to {}. {}.",
        title.to_lowercase(),
        first_sentence
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANSWER: &str = "Here are some ideas:\n\n\
        1. **Defect Rate by Vendor** - Compare \"defect_count\" across Vendor_Name. Takes 20 minutes.\n\
        2. **Monthly Cost Trend** - Track spend over 2 hours of data.\n\
        3. **Advanced Correlation Study** - A complex multivariate look.\n\n\
        Let me know if you need more.";

    #[test]
    fn parses_each_numbered_item() {
        let s = parse_suggestions(ANSWER);
        assert_eq!(s.len(), 3);
        assert_eq!(s[0].metadata.order, 1);
        assert_eq!(s[2].metadata.order, 3);
        assert_eq!(s[0].title, "Defect Rate by Vendor");
        assert_eq!(
            s[0].description,
            "Compare \"defect_count\" across Vendor_Name. Takes 20 minutes."
        );
        assert_eq!(s[2].description, "A complex multivariate look.");
    }

    #[test]
    fn classifies_type_and_complexity() {
        let s = parse_suggestions(ANSWER);
        assert_eq!(s[0].analysis_type, AnalysisType::QualityAnalysis);
        // "trend" wins over "cost": the keyword ladder checks trends first.
        assert_eq!(s[1].analysis_type, AnalysisType::TrendAnalysis);
        assert_eq!(s[1].complexity_level, Complexity::Intermediate);
        assert_eq!(s[2].analysis_type, AnalysisType::CorrelationAnalysis);
        assert_eq!(s[2].complexity_level, Complexity::Advanced);
    }

    #[test]
    fn time_estimates_use_explicit_values_then_keywords() {
        let s = parse_suggestions(ANSWER);
        assert_eq!(s[0].estimated_time_minutes, 20);
        assert_eq!(s[1].estimated_time_minutes, 120);
        assert_eq!(s[2].estimated_time_minutes, 30);
        assert_eq!(estimate_minutes("a quick comparison"), 15);
        assert_eq!(estimate_minutes("count rows"), 10);
    }

    #[test]
    fn required_columns_are_quoted_or_capitalized_identifiers() {
        let s = parse_suggestions(ANSWER);
        assert_eq!(s[0].required_columns, vec!["Compare", "defect_count", "Takes"]);
        assert_eq!(
            required_columns("'aa' 'Alpha' Beta Gamma Delta Epsilon Zeta Beta"),
            vec!["Alpha", "Beta", "Gamma", "Delta", "Epsilon"]
        );
    }

    #[test]
    fn column_names_after_non_ascii_letters_are_found() {
        assert_eq!(required_columns("Group by éVendor totals"), vec!["Group", "Vendor"]);
    }

    #[test]
    fn stored_metadata_marks_ai_origin() {
        let s = parse_suggestions(ANSWER);
        let v = serde_json::to_value(&s[1]).unwrap();
        assert_eq!(v["metadata"]["order"], 2);
        assert_eq!(v["metadata"]["extracted_from_ai"], true);
        assert_eq!(v["metadata"]["confidence_score"], 0.8);
        assert_eq!(v["analysis_type"], "trend_analysis");
    }

    #[test]
    fn suggested_prompt_uses_first_sentence() {
        let s = parse_suggestions(ANSWER);
        assert_eq!(
            s[0].suggested_prompt,
            "Analyze the dataset to defect rate by vendor. Compare \"defect_count\" across Vendor_Name."
        );
    }

    #[test]
    fn text_without_items_yields_nothing() {
        assert!(parse_suggestions("No suggestions today.").is_empty());
        assert!(parse_suggestions("").is_empty());
    }

    #[test]
    fn serializes_snake_case_types() {
        let v = serde_json::to_value(AnalysisType::QualityAnalysis).unwrap();
        assert_eq!(v, "quality_analysis");
        assert_eq!(Complexity::Advanced.to_string(), "advanced");
    }
}
