//! Cover letter drafting. The one operation that wants looser sampling.

use serde_json::{json, Value};

use crate::analysis::prompts::{COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM};
use crate::analysis::{run_operation, AnalysisOutcome};
use crate::coerce::{FieldSpec, FieldType, Shape};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::{GenerateOptions, TextGenerator};

pub const MAX_PARAGRAPHS: usize = 5;

pub fn shape() -> Shape {
    Shape::new(vec![
        FieldSpec::new("greeting", FieldType::String),
        FieldSpec::new(
            "body_paragraphs",
            FieldType::array_capped(FieldType::String, MAX_PARAGRAPHS),
        ),
        FieldSpec::new("closing", FieldType::String),
    ])
}

pub fn fallback() -> Value {
    json!({
        "greeting": "Dear Hiring Team,",
        "body_paragraphs": [
            "We could not draft this cover letter automatically. Please try again in a few minutes."
        ],
        "closing": "Sincerely,"
    })
}

/// Drafts a cover letter. Never fails outwardly.
pub async fn draft_cover_letter(
    llm: &dyn TextGenerator,
    resume_text: &str,
    jd_text: &str,
    company: Option<&str>,
) -> AnalysisOutcome {
    let prompt = COVER_LETTER_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{resume_text}", resume_text)
        .replace("{jd_text}", jd_text)
        .replace("{company}", company.unwrap_or("(not specified)"));

    run_operation(
        llm,
        "cover_letter",
        &prompt,
        COVER_LETTER_SYSTEM,
        &GenerateOptions::creative(),
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
        for placeholder in [
            "{grounding_instruction}",
            "{resume_text}",
            "{jd_text}",
            "{company}",
        ] {
            assert!(
                COVER_LETTER_PROMPT_TEMPLATE.contains(placeholder),
                "missing {placeholder}"
            );
        }
    }

    #[tokio::test]
    async fn test_truncated_letter_missing_closing_degrades() {
        // Cut off by the token limit: the repair closes the brackets, but the
        // result still lacks the "closing" key, so it must not be served.
        let llm = ScriptedGenerator(
            r#"{"greeting": "Dear Hiring Team,", "body_paragraphs": ["First.", "Second.", "Thi"#
                .to_string(),
        );
        let outcome = draft_cover_letter(&llm, "resume", "jd", Some("Acme")).await;
        assert!(outcome.degraded, "truncated letter lacks closing key");
        assert_eq!(outcome.payload, fallback());
    }

    #[tokio::test]
    async fn test_clean_letter_passes_through() {
        let llm = ScriptedGenerator(
            r#"{"greeting": "Dear Acme Team,", "body_paragraphs": ["One.", "Two."], "closing": "Best,"}"#
                .to_string(),
        );
        let outcome = draft_cover_letter(&llm, "resume", "jd", None).await;
        assert!(!outcome.degraded);
        assert_eq!(outcome.payload["greeting"], json!("Dear Acme Team,"));
    }
}
