//! Job match — measures how well a resume evidences a job description's
//! requirements and names the gaps.

use serde_json::{json, Value};

use crate::analysis::prompts::{MATCH_PROMPT_TEMPLATE, MATCH_SYSTEM};
use crate::analysis::{run_operation, AnalysisOutcome};
use crate::coerce::{FieldSpec, FieldType, Shape};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::{GenerateOptions, TextGenerator};

pub const MAX_KEYWORDS: usize = 20;

pub fn shape() -> Shape {
    Shape::new(vec![
        FieldSpec::new("match_score", FieldType::Number),
        FieldSpec::new(
            "matched_keywords",
            FieldType::array_capped(FieldType::String, MAX_KEYWORDS),
        ),
        FieldSpec::new(
            "missing_keywords",
            FieldType::array_capped(FieldType::String, MAX_KEYWORDS),
        ),
        FieldSpec::new("summary", FieldType::String),
    ])
}

pub fn fallback() -> Value {
    json!({
        "match_score": 0,
        "matched_keywords": [],
        "missing_keywords": [],
        "summary": "We could not compare this resume against the job description automatically. Please try again in a few minutes."
    })
}

/// Compares a resume against a job description. Never fails outwardly.
pub async fn match_resume(
    llm: &dyn TextGenerator,
    resume_text: &str,
    jd_text: &str,
) -> AnalysisOutcome {
    let prompt = MATCH_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{resume_text}", resume_text)
        .replace("{jd_text}", jd_text);
    run_operation(
        llm,
        "job_match",
        &prompt,
        MATCH_SYSTEM,
        &GenerateOptions::default(),
        &shape(),
        &fallback(),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::testing::ScriptedGenerator;

    #[test]
    fn test_fallback_conforms_to_shape() {
        assert!(shape().conform(fallback()).is_ok());
    }

    #[test]
    fn test_prompt_template_has_all_placeholders() {
        for placeholder in ["{grounding_instruction}", "{resume_text}", "{jd_text}"] {
            assert!(
                MATCH_PROMPT_TEMPLATE.contains(placeholder),
                "missing {placeholder}"
            );
        }
    }

    #[tokio::test]
    async fn test_match_with_surrounding_prose_is_repaired() {
        let llm = ScriptedGenerator(
            "Here's my comparison:\n{\"match_score\": 64, \"matched_keywords\": [\"Rust\"], \
             \"missing_keywords\": [\"Kubernetes\"], \"summary\": \"Decent overlap.\"}"
                .to_string(),
        );
        let outcome = match_resume(&llm, "resume", "jd").await;
        assert!(!outcome.degraded);
        assert!(outcome.was_repaired);
        assert_eq!(outcome.payload["match_score"], serde_json::json!(64));
    }

    #[tokio::test]
    async fn test_missing_required_key_degrades() {
        // Parses fine but has no "summary" — must fall back, not pass through.
        let llm = ScriptedGenerator(
            r#"{"match_score": 64, "matched_keywords": [], "missing_keywords": []}"#.to_string(),
        );
        let outcome = match_resume(&llm, "resume", "jd").await;
        assert!(outcome.degraded);
        assert_eq!(outcome.payload, fallback());
    }
}
