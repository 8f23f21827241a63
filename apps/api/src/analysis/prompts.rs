// All LLM prompt constants for the Analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume review — enforces JSON-only output.
pub const REVIEW_SYSTEM: &str =
    "You are an expert resume reviewer with deep hiring-manager experience. \
    Assess a resume's content, clarity, and impact. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Resume review prompt template. Replace `{resume_text}` before sending.
pub const REVIEW_PROMPT_TEMPLATE: &str = r#"Review the following resume and assess its quality.

Return a JSON object with this EXACT schema (no extra fields):
{
  "score": 72,
  "strengths": [
    "Quantified impact on most experience bullets"
  ],
  "weaknesses": [
    "Summary section is generic and could describe anyone"
  ],
  "suggestions": [
    "Replace 'responsible for' phrasing with direct action verbs"
  ]
}

Rules:
- "score" is an integer 0-100 judging overall hiring-readiness.
- "strengths": at most 5 entries, each a single concrete observation.
- "weaknesses": at most 5 entries, each a single concrete observation.
- "suggestions": at most 8 entries, each an actionable edit the candidate
  can make, ordered by expected impact.
- Judge only what is written. Do not guess at the candidate's seniority or
  intentions beyond the text.

RESUME:
{resume_text}"#;

/// System prompt for job matching — enforces JSON-only output.
pub const MATCH_SYSTEM: &str =
    "You are an expert recruiter comparing a resume against a job description. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Job match prompt template. Replace `{resume_text}` and `{jd_text}`.
pub const MATCH_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Compare the resume against the job description and measure the fit.

Return a JSON object with this EXACT schema (no extra fields):
{
  "match_score": 64,
  "matched_keywords": ["Rust", "PostgreSQL"],
  "missing_keywords": ["Kubernetes"],
  "summary": "Strong backend overlap; no container orchestration evidence."
}

Rules:
- "match_score" is an integer 0-100: how well the resume evidences the
  job's stated requirements.
- "matched_keywords": at most 20 skills/tools/concepts the JD asks for AND
  the resume demonstrates.
- "missing_keywords": at most 20 skills/tools/concepts the JD asks for that
  the resume does not mention.
- "summary": two sentences at most, plain language, no hedging filler.
- A keyword counts as matched only if the resume shows it in use — a bare
  mention in a skills list still counts, an unrelated word does not.

RESUME:
{resume_text}

JOB DESCRIPTION:
{jd_text}"#;

/// System prompt for bullet rewriting — enforces JSON-only output.
pub const REWRITE_SYSTEM: &str =
    "You are an expert resume writer rewriting experience bullets to target \
    a specific job description. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT invent facts not present in the original bullets.";

/// Bullet rewrite prompt template. Replace `{bullets_json}` and `{jd_text}`.
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Rewrite each resume bullet below so it lands harder for the target job
description, without inventing anything the original does not claim.

ORIGINAL BULLETS (JSON array of strings):
{bullets_json}

JOB DESCRIPTION:
{jd_text}

Return a JSON object with this EXACT schema (no extra fields):
{
  "bullets": [
    {
      "original": "Worked on the payments backend",
      "improved": "Built payment-processing services in Rust handling 40k transactions/day",
      "rationale": "Names the stack and adds the scale the JD emphasizes"
    }
  ]
}

Rules:
- One output entry per input bullet, in the same order, at most 10.
- "improved" must stay truthful to "original" — sharpen, never inflate.
- "rationale" is one sentence explaining what changed and why it targets
  this JD.
- Prefer the JD's own vocabulary where the original bullet supports it."#;

/// System prompt for cover letter drafting.
pub const COVER_LETTER_SYSTEM: &str =
    "You are an expert cover-letter writer. Write in a direct, warm, specific \
    voice — no clichés, no 'I am writing to express my interest'. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Cover letter prompt template.
/// Replace: {resume_text}, {jd_text}, {company}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

Draft a cover letter for this candidate and role.

RESUME:
{resume_text}

JOB DESCRIPTION:
{jd_text}

COMPANY: {company}

Return a JSON object with this EXACT schema (no extra fields):
{
  "greeting": "Dear Hiring Team,",
  "body_paragraphs": [
    "First paragraph..."
  ],
  "closing": "Sincerely,"
}

Rules:
- "body_paragraphs": 2 to 5 paragraphs, each 2-4 sentences.
- Open with the strongest specific overlap between the resume and the role,
  not with enthusiasm boilerplate.
- Reference at most three concrete achievements from the resume, chosen for
  relevance to the job description.
- Never claim experience the resume does not contain."#;
