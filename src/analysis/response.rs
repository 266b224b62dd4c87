//! The AI model's schema analysis: cleaning its raw output and normalizing what gets stored.
//!
//! The model is asked for a JSON object with `sql_schema`, `column_analysis`, `table_name` and
//! `total_columns`, but it frequently wraps the object in markdown code fences, and historic
//! stored records come in three shapes. Everything here is permissive: missing fields default,
//! and fields of the wrong JSON type are coerced (or dropped) instead of failing the whole
//! analysis.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ProfilingError, ProfilingResult};

/// Table name used when the stored payload is a bare array with no table name of its own.
pub const GENERATED_TABLE_NAME: &str = "Generated";

static JSON_FENCE_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json\s*").expect("fence regex is valid"));
static FENCE_AT_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"```\s*$").expect("fence regex is valid"));
static ANY_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```\s*").expect("fence regex is valid"));

/// One column as described by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnAnalysis {
    #[serde(deserialize_with = "lenient::string")]
    pub column_name: String,
    #[serde(deserialize_with = "lenient::string")]
    pub data_type: String,
    #[serde(deserialize_with = "lenient::string")]
    pub sql_type: String,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::samples")]
    pub sample_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::count")]
    pub null_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::count")]
    pub unique_count: Option<u64>,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
}

/// Normalized analysis ready for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisData {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_columns")]
    pub column_analysis: Option<Vec<ColumnAnalysis>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub table_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::count")]
    pub total_columns: Option<u64>,
}

/// An analysis object that carries its own `column_analysis` list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NestedAnalysis {
    #[serde(deserialize_with = "lenient::columns")]
    pub column_analysis: Vec<ColumnAnalysis>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub table_name: Option<String>,
    #[serde(deserialize_with = "lenient::count")]
    pub total_columns: Option<u64>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub sql_schema: Option<String>,
}

/// The three accepted shapes of a stored `column_analysis` value.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisPayload {
    /// A bare array of column analyses.
    Columns(Vec<ColumnAnalysis>),
    /// The whole model response, with a truthy nested `column_analysis`.
    Nested(NestedAnalysis),
    /// Any other object, taken as is.
    Flat(AnalysisData),
}

impl AnalysisPayload {
    /// Decode the `column_analysis` value of a stored schema record.
    ///
    /// Returns `None` when the key is missing or its value is neither an array nor an object.
    /// Array entries that are not objects are skipped; loosely typed fields inside an entry are
    /// coerced by the same rules as [`parse_model_output`].
    pub fn from_record(record: &Value) -> Option<Self> {
        let inner = record.get("column_analysis")?;
        match inner {
            Value::Array(items) => Some(Self::Columns(lenient::column_list(items))),
            Value::Object(map) => {
                if map.get("column_analysis").is_some_and(lenient::is_truthy) {
                    NestedAnalysis::deserialize(inner).ok().map(Self::Nested)
                } else {
                    AnalysisData::deserialize(inner).ok().map(Self::Flat)
                }
            }
            _ => None,
        }
    }

    /// Collapse any shape into [`AnalysisData`].
    pub fn normalize(self) -> AnalysisData {
        match self {
            Self::Columns(columns) => AnalysisData {
                total_columns: Some(columns.len() as u64),
                table_name: Some(GENERATED_TABLE_NAME.to_string()),
                column_analysis: Some(columns),
            },
            Self::Nested(nested) => AnalysisData {
                column_analysis: Some(nested.column_analysis),
                table_name: nested.table_name,
                total_columns: nested.total_columns,
            },
            Self::Flat(data) => data,
        }
    }
}

/// Shorthand for `AnalysisPayload::from_record(record).map(AnalysisPayload::normalize)`.
pub fn analysis_data(record: &Value) -> Option<AnalysisData> {
    AnalysisPayload::from_record(record).map(AnalysisPayload::normalize)
}

/// Parsed model response plus the raw JSON to store verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct AiSchemaResponse {
    /// `CREATE TABLE` statement, if the model produced one.
    pub sql_schema: Option<String>,
    pub table_name: Option<String>,
    pub total_columns: Option<u64>,
    pub column_analysis: Vec<ColumnAnalysis>,
    /// The full object as returned by the model.
    pub raw: Value,
}

impl AiSchemaResponse {
    /// The record stored next to the dataset: the generated SQL and the full response under
    /// `column_analysis` (which [`analysis_data`] reads back as the nested shape).
    pub fn to_record(&self) -> Value {
        serde_json::json!({
            "generated_sql": self.sql_schema,
            "column_analysis": self.raw,
        })
    }
}

/// Remove markdown code fences around the model output and trim it.
///
/// If the text contains "```json", every "```json" (plus following whitespace) and a trailing
/// "```" are removed; otherwise every "```" (plus following whitespace) is removed.
pub fn strip_code_fences(content: &str) -> String {
    let cleaned = if content.contains("```json") {
        let without_open = JSON_FENCE_OPEN.replace_all(content, "");
        FENCE_AT_END.replace_all(&without_open, "").into_owned()
    } else if content.contains("```") {
        ANY_FENCE.replace_all(content, "").into_owned()
    } else {
        content.to_string()
    };
    cleaned.trim().to_string()
}

/// Clean and parse the model's free-form output.
///
/// Fails with [`ProfilingError::AnalysisParse`] when the cleaned text is not a JSON object.
/// Inside the object nothing fails: wrongly typed fields are coerced and `column_analysis`
/// entries that are not objects are skipped. This failure concerns only the AI analysis;
/// locally extracted metadata is unaffected.
pub fn parse_model_output(content: &str) -> ProfilingResult<AiSchemaResponse> {
    let cleaned = strip_code_fences(content);
    let raw: Value = serde_json::from_str(&cleaned).map_err(|e| ProfilingError::AnalysisParse {
        message: e.to_string(),
        raw: content.to_string(),
    })?;
    if !raw.is_object() {
        return Err(ProfilingError::AnalysisParse {
            message: "expected a JSON object".to_string(),
            raw: content.to_string(),
        });
    }
    let nested = NestedAnalysis::deserialize(&raw).map_err(|e| ProfilingError::AnalysisParse {
        message: e.to_string(),
        raw: content.to_string(),
    })?;

    Ok(AiSchemaResponse {
        sql_schema: nested.sql_schema,
        table_name: nested.table_name,
        total_columns: nested.total_columns,
        column_analysis: nested.column_analysis,
        raw,
    })
}

/// Field decoders that accept whatever JSON type the model happened to emit.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::ColumnAnalysis;

    /// Whether a value counts as set. `null`, `false`, zero and `""` do not.
    pub(super) fn is_truthy(v: &Value) -> bool {
        match v {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    fn text_of(v: Value) -> Option<String> {
        match v {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    /// A non-negative whole count from a number (`3`, `3.0`) or numeric string (`"3"`).
    fn count_of(v: &Value) -> Option<u64> {
        let f = match v {
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    return Some(u);
                }
                n.as_f64()?
            }
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        (f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
    }

    pub(super) fn column_list(items: &[Value]) -> Vec<ColumnAnalysis> {
        items
            .iter()
            .filter(|v| v.is_object())
            .filter_map(|v| ColumnAnalysis::deserialize(v).ok())
            .collect()
    }

    pub(super) fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(text_of(Value::deserialize(d)?).unwrap_or_default())
    }

    pub(super) fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(text_of(Value::deserialize(d)?))
    }

    pub(super) fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(count_of(&Value::deserialize(d)?))
    }

    pub(super) fn samples<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<Value>>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Null => None,
            Value::Array(items) => Some(items),
            single => Some(vec![single]),
        })
    }

    pub(super) fn columns<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<ColumnAnalysis>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => column_list(&items),
            _ => Vec::new(),
        })
    }

    pub(super) fn opt_columns<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<Vec<ColumnAnalysis>>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Array(items) => Some(column_list(&items)),
            _ => None,
        })
    }
}
