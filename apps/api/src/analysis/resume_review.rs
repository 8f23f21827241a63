//! Resume review — scores a resume and surfaces strengths, weaknesses,
//! and concrete suggestions.

use serde_json::{json, Value};

use crate::analysis::prompts::{REVIEW_PROMPT_TEMPLATE, REVIEW_SYSTEM};
use crate::analysis::{run_operation, AnalysisOutcome};
use crate::coerce::{FieldSpec, FieldType, Shape};
use crate::llm_client::{GenerateOptions, TextGenerator};

pub const MAX_STRENGTHS: usize = 5;
pub const MAX_WEAKNESSES: usize = 5;
pub const MAX_SUGGESTIONS: usize = 8;

/// Shape every review completion must satisfy.
pub fn shape() -> Shape {
    Shape::new(vec![
        FieldSpec::new("score", FieldType::Number),
        FieldSpec::new(
            "strengths",
            FieldType::array_capped(FieldType::String, MAX_STRENGTHS),
        ),
        FieldSpec::new(
            "weaknesses",
            FieldType::array_capped(FieldType::String, MAX_WEAKNESSES),
        ),
        FieldSpec::new(
            "suggestions",
            FieldType::array_capped(FieldType::String, MAX_SUGGESTIONS),
        ),
    ])
}

/// Served when the completion cannot be coerced. Score 0 keeps degraded
/// results visibly distinct from low-but-real model scores paired with text.
pub fn fallback() -> Value {
    json!({
        "score": 0,
        "strengths": [],
        "weaknesses": [],
        "suggestions": [
            "We could not analyze this resume automatically. Please try again in a few minutes."
        ]
    })
}

/// Reviews a resume. Never fails: transport and coercion problems degrade
/// to the fallback payload.
pub async fn review_resume(llm: &dyn TextGenerator, resume_text: &str) -> AnalysisOutcome {
    let prompt = REVIEW_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);
    run_operation(
        llm,
        "resume_review",
        &prompt,
        REVIEW_SYSTEM,
        &GenerateOptions::default(),
        &shape(),
        &fallback(),
    )
    .await
}
