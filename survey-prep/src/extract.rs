//! Recovery of structured records from free-form model output.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::errors::PipelineError;

/// Matches a quoted key's closing quote, the colon, and any whitespace before
/// the opening quote of the value, e.g. `":  "` in `{"answer_processed":  "x"}`.
static KEY_COLON_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"":\s*""#).expect("valid regex literal"));

/// Recovers the JSON array embedded in free-form model output.
///
/// The candidate is the outermost bracketed substring (first `[` to last
/// `]`, newlines included). The service is asked for exactly one JSON array,
/// but generation often wraps it in prose, code fences, or single quotes;
/// the observed deviations are patched before the strict parse rather than
/// rejected outright. Each returned element may or may not be a well-formed
/// record; that judgment is deferred to the reconciler.
///
/// # Errors
///
/// Returns [`PipelineError::NoStructuredData`] when no bracketed substring
/// exists, the normalized candidate does not parse, or the parsed value is
/// not an array.
pub fn extract_records(raw: &str) -> Result<Vec<Value>, PipelineError> {
    let start = raw.find('[').ok_or(PipelineError::NoStructuredData)?;
    let end = raw
        .rfind(']')
        .filter(|&end| end > start)
        .ok_or(PipelineError::NoStructuredData)?;
    let candidate = &raw[start..=end];

    // Best-effort pre-pass over the common near-JSON failure modes:
    // single-quoted strings, stray whitespace after a key's colon, and
    // embedded newlines. Strict parsing below remains the arbiter.
    let normalized = candidate.replace('\'', "\"");
    let normalized = KEY_COLON_GAP.replace_all(&normalized, "\":\"");
    let normalized = normalized.replace('\n', "");

    match serde_json::from_str::<Value>(&normalized) {
        Ok(Value::Array(records)) => Ok(records),
        Ok(other) => {
            tracing::debug!(kind = json_kind(&other), "parsed value is not an array");
            Err(PipelineError::NoStructuredData)
        }
        Err(err) => {
            tracing::debug!(%err, "candidate array did not parse");
            Err(PipelineError::NoStructuredData)
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn well_formed_array_round_trips() {
        let raw = r#"[{"answer_processed":"first"},{"answer_processed":"second"}]"#;
        let records = extract_records(raw).unwrap();
        assert_eq!(
            records,
            vec![
                json!({"answer_processed": "first"}),
                json!({"answer_processed": "second"})
            ]
        );
    }

    #[test]
    fn single_quotes_and_surrounding_prose_are_tolerated() {
        let raw = "Here is the result: ['ok']";
        let records = extract_records(raw).unwrap();
        assert_eq!(records, vec![json!("ok")]);
    }

    #[test]
    fn whitespace_after_key_colon_is_collapsed() {
        let raw = "Sure! [{'answer_processed':   'tidy'}] Hope that helps.";
        let records = extract_records(raw).unwrap();
        assert_eq!(records, vec![json!({"answer_processed": "tidy"})]);
    }

    #[test]
    fn embedded_newlines_are_stripped() {
        let raw = "[\n  {\"answer_processed\":\n\"multi\"}\n]";
        let records = extract_records(raw).unwrap();
        assert_eq!(records, vec![json!({"answer_processed": "multi"})]);
    }

    #[test]
    fn missing_brackets_fail() {
        let err = extract_records("no array here").unwrap_err();
        assert!(matches!(err, PipelineError::NoStructuredData));
    }

    #[test]
    fn closing_bracket_before_opening_fails() {
        let err = extract_records("] nothing [").unwrap_err();
        assert!(matches!(err, PipelineError::NoStructuredData));
    }

    #[test]
    fn unparseable_candidate_fails() {
        let err = extract_records("[{{not json}}]").unwrap_err();
        assert!(matches!(err, PipelineError::NoStructuredData));
    }
}
