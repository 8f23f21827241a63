#![allow(dead_code)]

// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Generic system prompt for JSON-only callers that have no domain framing
/// of their own. The analysis operations carry their own system prompts;
/// completions are coerced on the way back either way, because models
/// ignore these instructions often enough.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction that keeps analysis grounded in the submitted documents.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Base every statement on the resume and job description text \
    provided below. Do NOT infer employers, titles, dates, or skills that \
    the text does not contain. If the text does not support a claim, omit \
    the claim entirely.";
