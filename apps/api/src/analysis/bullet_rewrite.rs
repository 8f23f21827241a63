//! Bullet rewrite — sharpens experience bullets toward a target job
//! description without letting the model invent new claims.

use serde_json::{json, Value};
use tracing::warn;

use crate::analysis::prompts::{REWRITE_PROMPT_TEMPLATE, REWRITE_SYSTEM};
use crate::analysis::{run_operation, AnalysisOutcome};
use crate::coerce::{FieldSpec, FieldType, Shape};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::llm_client::{GenerateOptions, TextGenerator};

pub const MAX_BULLETS: usize = 10;

/// Each rewritten bullet is a nested record; the validator checks all three
/// keys on every element.
pub fn shape() -> Shape {
    Shape::new(vec![FieldSpec::new(
        "bullets",
        FieldType::array_capped(
            FieldType::record(vec![
                FieldSpec::new("original", FieldType::String),
                FieldSpec::new("improved", FieldType::String),
                FieldSpec::new("rationale", FieldType::String),
            ]),
            MAX_BULLETS,
        ),
    )])
}

pub fn fallback() -> Value {
    json!({ "bullets": [] })
}

/// Rewrites bullets toward a JD. Never fails outwardly; inputs beyond the
/// cap are dropped before prompting rather than silently in the output.
pub async fn rewrite_bullets(
    llm: &dyn TextGenerator,
    bullets: &[String],
    jd_text: &str,
) -> AnalysisOutcome {
    let bullets = if bullets.len() > MAX_BULLETS {
        warn!(
            "rewrite request carried {} bullets, keeping the first {}",
            bullets.len(),
            MAX_BULLETS
        );
        &bullets[..MAX_BULLETS]
    } else {
        bullets
    };

    // Inputs are plain strings, so serialization cannot fail.
    let bullets_json =
        serde_json::to_string_pretty(bullets).unwrap_or_else(|_| "[]".to_string());

    let prompt = REWRITE_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{bullets_json}", &bullets_json)
        .replace("{jd_text}", jd_text);

    run_operation(
        llm,
        "bullet_rewrite",
        &prompt,
        REWRITE_SYSTEM,
        &GenerateOptions::default(),
        &shape(),
        &fallback(),
    )
    .await
}
