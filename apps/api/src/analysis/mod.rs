// LLM-backed analysis operations: resume review, job match, bullet rewrite,
// cover letter. All LLM calls go through llm_client — no direct Anthropic
// calls here. Each operation owns its prompt templates, its expected shape,
// and its fallback payload; completions are coerced on the way back, never
// trusted.

pub mod bullet_rewrite;
pub mod cover_letter;
pub mod handlers;
pub mod job_match;
pub mod prompts;
pub mod resume_review;

use serde_json::Value;
use tracing::{debug, warn};

use crate::coerce::{coerce, CoercionResult, Shape};
use crate::llm_client::{GenerateOptions, TextGenerator};

/// What an operation hands back to its handler: the coerced payload plus the
/// flags clients use to tell a model-derived result from a degraded one.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub payload: Value,
    /// The completion needed fence-stripping, extraction, or textual repair.
    pub was_repaired: bool,
    /// The payload is the operation's fallback, not model output.
    pub degraded: bool,
}

/// Runs one generation call and coerces the completion.
///
/// A transport failure degrades to the fallback payload exactly like an
/// unusable completion does: the client always receives a schema-valid body,
/// and the `degraded` flag is the only signal either way.
pub(crate) async fn run_operation(
    llm: &dyn TextGenerator,
    op: &'static str,
    prompt: &str,
    system: &str,
    options: &GenerateOptions,
    expected: &Shape,
    fallback: &Value,
) -> AnalysisOutcome {
    let completion = match llm.generate(prompt, system, options).await {
        Ok(text) => text,
        Err(e) => {
            warn!("{op}: generation call failed, serving fallback: {e}");
            return AnalysisOutcome {
                payload: fallback.clone(),
                was_repaired: false,
                degraded: true,
            };
        }
    };

    match coerce(&completion, expected, fallback) {
        CoercionResult::Recovered {
            value,
            was_repaired,
        } => {
            if was_repaired {
                debug!("{op}: completion recovered after repair");
            }
            AnalysisOutcome {
                payload: value,
                was_repaired,
                degraded: false,
            }
        }
        CoercionResult::FellBack { value } => {
            warn!("{op}: completion unusable, serving fallback");
            AnalysisOutcome {
                payload: value,
                was_repaired: false,
                degraded: true,
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;

    use crate::llm_client::{GenerateOptions, LlmError, TextGenerator};

    /// Returns the same canned completion for every call.
    pub(crate) struct ScriptedGenerator(pub String);

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _system: &str,
            _options: &GenerateOptions,
        ) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    /// Fails every call, for exercising the degraded path.
    pub(crate) struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _system: &str,
            _options: &GenerateOptions,
        ) -> Result<String, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }
}
