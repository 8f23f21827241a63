//! Coercion — turns an LLM's free-text completion into a schema-valid JSON
//! value, degrading to a caller-supplied fallback instead of erroring.
//!
//! ARCHITECTURAL RULE: this module never fails outwardly. Parse errors,
//! validation misses, and hopeless repairs all fold into the next attempt
//! stage, and the terminal stage returns the fallback payload. Callers can
//! tell the paths apart (and surface them to clients or logs) through the
//! `CoercionResult` tag and its `was_repaired` flag, but they never see an
//! error and never receive a value that does not conform to the shape.
//!
//! The module carries no domain knowledge: shapes and fallbacks are data
//! owned by each call site.

pub mod repair;
pub mod shape;

pub use shape::{FieldSpec, FieldType, Shape, Violation, ViolationKind};

use serde_json::Value;
use tracing::debug;

/// Outcome of coercing one completion. The payload always conforms to the
/// shape the caller passed in.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercionResult {
    /// A value was extracted from the completion. `was_repaired` is false
    /// only when the raw text parsed and validated verbatim.
    Recovered { value: Value, was_repaired: bool },
    /// Nothing usable could be extracted; this is the caller's fallback.
    FellBack { value: Value },
}

impl CoercionResult {
    pub fn value(&self) -> &Value {
        match self {
            CoercionResult::Recovered { value, .. } => value,
            CoercionResult::FellBack { value } => value,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            CoercionResult::Recovered { value, .. } => value,
            CoercionResult::FellBack { value } => value,
        }
    }

    pub fn was_repaired(&self) -> bool {
        matches!(
            self,
            CoercionResult::Recovered {
                was_repaired: true,
                ..
            }
        )
    }

    pub fn fell_back(&self) -> bool {
        matches!(self, CoercionResult::FellBack { .. })
    }
}

/// Coerces `raw` into a value conforming to `expected`.
///
/// Ordered attempts, first success wins:
/// 1. parse the raw text verbatim
/// 2. strip leading/trailing Markdown code fences and re-parse
/// 3. slice from the first `{` to the last `}` and re-parse
/// 4. apply textual repairs to the slice, cumulatively, re-parsing after each
/// 5. return `FellBack(fallback)`
///
/// Every attempt must both parse and validate; a candidate that parses but
/// misses a required key is treated the same as one that does not parse.
pub fn coerce(raw: &str, expected: &Shape, fallback: &Value) -> CoercionResult {
    if let Some(value) = attempt(raw, expected, "verbatim") {
        return CoercionResult::Recovered {
            value,
            was_repaired: false,
        };
    }

    let body = match strip_fences(raw) {
        Some(inner) => {
            if let Some(value) = attempt(inner, expected, "fence-stripped") {
                return CoercionResult::Recovered {
                    value,
                    was_repaired: true,
                };
            }
            inner
        }
        None => raw.trim(),
    };

    if let Some(slice) = braced_slice(body) {
        if let Some(value) = attempt(slice, expected, "brace-extracted") {
            return CoercionResult::Recovered {
                value,
                was_repaired: true,
            };
        }

        let repairs: [(&str, fn(&str) -> Option<String>); 4] = [
            ("comma-between-objects", repair::insert_comma_between_objects),
            ("comma-between-arrays", repair::insert_comma_between_arrays),
            ("comma-before-key", repair::insert_comma_before_key),
            ("close-truncated", repair::close_truncated),
        ];

        let mut text = slice.to_string();
        for (stage, apply) in repairs {
            if let Some(next) = apply(&text) {
                text = next;
                if let Some(value) = attempt(&text, expected, stage) {
                    return CoercionResult::Recovered {
                        value,
                        was_repaired: true,
                    };
                }
            }
        }
    }

    debug!("all extraction attempts exhausted, serving fallback");
    CoercionResult::FellBack {
        value: fallback.clone(),
    }
}

/// Parses and validates one candidate. `None` means "this attempt failed",
/// never an error: the failure reason goes to the debug log only.
fn attempt(text: &str, expected: &Shape, stage: &str) -> Option<Value> {
    let parsed: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            debug!("{stage}: candidate is not valid JSON: {e}");
            return None;
        }
    };
    match expected.conform(parsed) {
        Ok(value) => {
            debug!("{stage}: candidate accepted");
            Some(value)
        }
        Err(violations) => {
            let reasons = violations
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            debug!("{stage}: candidate failed validation: {reasons}");
            None
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` fences wrapped around the whole
/// completion. Returns `None` when the text does not start with a fence.
fn strip_fences(text: &str) -> Option<&str> {
    let text = text.trim();
    let inner = text.strip_prefix("```")?;
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    let inner = inner.trim_start();
    Some(
        inner
            .strip_suffix("```")
            .map(str::trim_end)
            .unwrap_or(inner),
    )
}

/// Slice from the first `{` to the last `}`. When a `{` exists but no `}`
/// follows it (a completion cut off by the token limit), the slice runs to
/// the end of the text so the repair stage can try to close it.
fn braced_slice(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    match text.rfind('}') {
        Some(end) if end > start => Some(&text[start..=end]),
        _ => Some(&text[start..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn review_shape() -> Shape {
        Shape::new(vec![
            FieldSpec::new("score", FieldType::Number),
            FieldSpec::new("notes", FieldType::array_capped(FieldType::String, 5)),
        ])
    }

    fn review_fallback() -> Value {
        json!({"score": 0, "notes": []})
    }

    #[test]
    fn test_verbatim_json_is_recovered_unrepaired() {
        let raw = r#"{"score": 85, "notes": ["a", "b"]}"#;
        let result = coerce(raw, &review_shape(), &review_fallback());
        assert_eq!(
            result,
            CoercionResult::Recovered {
                value: json!({"score": 85, "notes": ["a", "b"]}),
                was_repaired: false,
            }
        );
    }

    #[test]
    fn test_fenced_json_is_recovered_repaired() {
        let raw = "```json\n{\"score\": 85, \"notes\": [\"a\", \"b\"]}\n```";
        let result = coerce(raw, &review_shape(), &review_fallback());
        assert_eq!(result.value()["score"], json!(85));
        assert!(result.was_repaired());
        assert!(!result.fell_back());
    }

    #[test]
    fn test_fence_without_language_tag() {
        let raw = "```\n{\"score\": 1, \"notes\": []}\n```";
        let result = coerce(raw, &review_shape(), &review_fallback());
        assert!(result.was_repaired());
        assert_eq!(result.value()["score"], json!(1));
    }

    #[test]
    fn test_fence_missing_trailing_delimiter() {
        let raw = "```json\n{\"score\": 1, \"notes\": []}";
        let result = coerce(raw, &review_shape(), &review_fallback());
        assert!(result.was_repaired());
        assert_eq!(result.value()["score"], json!(1));
    }

    #[test]
    fn test_json_surrounded_by_prose() {
        let raw = "Sure! Here's the JSON:\n```json\n{\"score\": 85, \"notes\": [\"a\",\"b\"]}\n```";
        let result = coerce(raw, &review_shape(), &review_fallback());
        assert_eq!(result.value(), &json!({"score": 85, "notes": ["a", "b"]}));
        assert!(result.was_repaired());
    }

    #[test]
    fn test_json_with_prose_on_both_sides() {
        let raw = "Here you go: {\"score\": 42, \"notes\": []} — let me know if you need more.";
        let result = coerce(raw, &review_shape(), &review_fallback());
        assert_eq!(result.value()["score"], json!(42));
        assert!(result.was_repaired());
    }

    #[test]
    fn test_no_brace_falls_back() {
        let result = coerce(
            "I'm sorry, I can't produce JSON for that.",
            &review_shape(),
            &review_fallback(),
        );
        assert_eq!(
            result,
            CoercionResult::FellBack {
                value: review_fallback()
            }
        );
    }

    #[test]
    fn test_empty_input_falls_back() {
        let result = coerce("", &review_shape(), &review_fallback());
        assert!(result.fell_back());
        assert_eq!(result.value(), &review_fallback());
    }

    #[test]
    fn test_parseable_but_invalid_falls_back() {
        // Scenario: two concatenated objects, neither carrying the required keys.
        let shape = Shape::new(vec![FieldSpec::new("combined", FieldType::String)]);
        let result = coerce(r#"{"a":1}{"b":2}"#, &shape, &json!({"combined": "n/a"}));
        assert_eq!(
            result,
            CoercionResult::FellBack {
                value: json!({"combined": "n/a"})
            }
        );
    }

    #[test]
    fn test_two_root_objects_fall_back_gracefully() {
        // The comma repair turns this into two root values, which still does
        // not parse; the coercer must degrade, not panic.
        let shape = Shape::new(vec![FieldSpec::new("skill", FieldType::String)]);
        let result = coerce(
            r#"{"skill":"X"} {"skill":"Y"}"#,
            &shape,
            &json!({"skill": "unknown"}),
        );
        assert_eq!(
            result,
            CoercionResult::FellBack {
                value: json!({"skill": "unknown"})
            }
        );
    }

    #[test]
    fn test_repair_missing_comma_between_objects_in_array() {
        let shape = Shape::new(vec![FieldSpec::new(
            "items",
            FieldType::array_of(FieldType::record(vec![FieldSpec::new(
                "name",
                FieldType::String,
            )])),
        )]);
        let raw = r#"{"items": [{"name": "a"}{"name": "b"}]}"#;
        let result = coerce(raw, &shape, &json!({"items": []}));
        assert!(result.was_repaired());
        assert_eq!(result.value()["items"][1]["name"], json!("b"));
    }

    #[test]
    fn test_repair_missing_comma_between_arrays() {
        let shape = Shape::new(vec![FieldSpec::new(
            "rows",
            FieldType::array_of(FieldType::array_of(FieldType::Number)),
        )]);
        let raw = r#"{"rows": [[1,2][3,4]]}"#;
        let result = coerce(raw, &shape, &json!({"rows": []}));
        assert!(result.was_repaired());
        assert_eq!(result.value()["rows"], json!([[1, 2], [3, 4]]));
    }

    #[test]
    fn test_repair_missing_comma_before_key() {
        let shape = Shape::new(vec![
            FieldSpec::new(
                "inner",
                FieldType::record(vec![FieldSpec::new("b", FieldType::Number)]),
            ),
            FieldSpec::new("c", FieldType::Number),
        ]);
        let raw = r#"{"inner": {"b": 1} "c": 2}"#;
        let result = coerce(raw, &shape, &json!({"inner": {"b": 0}, "c": 0}));
        assert!(result.was_repaired());
        assert_eq!(result.value()["c"], json!(2));
    }

    #[test]
    fn test_repair_truncated_completion() {
        let raw = r#"{"score": 80, "notes": ["a", "b", "c"#;
        let result = coerce(raw, &review_shape(), &review_fallback());
        assert!(result.was_repaired());
        assert_eq!(result.value(), &json!({"score": 80, "notes": ["a", "b"]}));
    }

    #[test]
    fn test_array_truncated_to_cap() {
        let raw = r#"{"score": 9, "notes": ["1","2","3","4","5","6","7","8"]}"#;
        let result = coerce(raw, &review_shape(), &review_fallback());
        assert_eq!(
            result.value()["notes"],
            json!(["1", "2", "3", "4", "5"]),
            "over-long arrays keep the first N elements"
        );
    }

    #[test]
    fn test_extra_keys_are_preserved() {
        let raw = r#"{"score": 9, "notes": [], "confidence": 0.9}"#;
        let result = coerce(raw, &review_shape(), &review_fallback());
        assert_eq!(result.value()["confidence"], json!(0.9));
    }

    #[test]
    fn test_coerce_is_idempotent() {
        let raw = "```json\n{\"score\": 3, \"notes\": [\"x\"]}\n```";
        let first = coerce(raw, &review_shape(), &review_fallback());
        let second = coerce(raw, &review_shape(), &review_fallback());
        assert_eq!(first, second);
    }

    #[test]
    fn test_fallback_is_cloned_not_shared() {
        let fallback = review_fallback();
        let result = coerce("garbage", &review_shape(), &fallback);
        assert_eq!(result.value(), &fallback);
    }

    #[test]
    fn test_open_brace_without_close_falls_back_when_unrepairable() {
        let result = coerce(r#"{"score": "#, &review_shape(), &review_fallback());
        assert!(result.fell_back());
    }
}
