//! Axum route handlers for the Analysis API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::analysis::bullet_rewrite::rewrite_bullets;
use crate::analysis::cover_letter::draft_cover_letter;
use crate::analysis::job_match::match_resume;
use crate::analysis::resume_review::review_resume;
use crate::analysis::AnalysisOutcome;
use crate::errors::AppError;
use crate::models::records::{AnalysisKind, AnalysisRecord};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub resume_text: String,
    pub jd_text: String,
}

#[derive(Debug, Deserialize)]
pub struct RewriteRequest {
    pub bullets: Vec<String>,
    pub jd_text: String,
}

#[derive(Debug, Deserialize)]
pub struct CoverLetterRequest {
    pub resume_text: String,
    pub jd_text: String,
    pub company: Option<String>,
}

/// Envelope returned by every analysis endpoint. `result` is the coerced
/// payload verbatim; `degraded` tells the client it got the fallback.
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub id: Uuid,
    pub kind: AnalysisKind,
    pub was_repaired: bool,
    pub degraded: bool,
    pub result: Value,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/reviews
pub async fn handle_review(
    State(state): State<AppState>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    require_text("resume_text", &request.resume_text)?;
    let outcome = review_resume(state.llm.as_ref(), &request.resume_text).await;
    Ok(Json(persist(&state, AnalysisKind::Review, outcome).await))
}

/// POST /api/v1/matches
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    require_text("resume_text", &request.resume_text)?;
    require_text("jd_text", &request.jd_text)?;
    let outcome = match_resume(state.llm.as_ref(), &request.resume_text, &request.jd_text).await;
    Ok(Json(persist(&state, AnalysisKind::Match, outcome).await))
}

/// POST /api/v1/rewrites
pub async fn handle_rewrite(
    State(state): State<AppState>,
    Json(request): Json<RewriteRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    if request.bullets.iter().all(|b| b.trim().is_empty()) {
        return Err(AppError::Validation(
            "bullets must contain at least one non-empty entry".to_string(),
        ));
    }
    require_text("jd_text", &request.jd_text)?;
    let outcome = rewrite_bullets(state.llm.as_ref(), &request.bullets, &request.jd_text).await;
    Ok(Json(persist(&state, AnalysisKind::Rewrite, outcome).await))
}

/// POST /api/v1/cover-letters
pub async fn handle_cover_letter(
    State(state): State<AppState>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    require_text("resume_text", &request.resume_text)?;
    require_text("jd_text", &request.jd_text)?;
    let outcome = draft_cover_letter(
        state.llm.as_ref(),
        &request.resume_text,
        &request.jd_text,
        request.company.as_deref(),
    )
    .await;
    Ok(Json(
        persist(&state, AnalysisKind::CoverLetter, outcome).await,
    ))
}

/// GET /api/v1/analyses
pub async fn handle_list_analyses(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnalysisRecord>>, AppError> {
    Ok(Json(state.store.list_recent().await))
}

/// GET /api/v1/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisRecord>, AppError> {
    state
        .store
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

async fn persist(state: &AppState, kind: AnalysisKind, outcome: AnalysisOutcome) -> AnalysisResponse {
    let record = AnalysisRecord::new(kind, &outcome);
    let response = AnalysisResponse {
        id: record.id,
        kind: record.kind,
        was_repaired: record.was_repaired,
        degraded: record.degraded,
        result: record.payload.clone(),
    };
    state.store.insert(record).await;
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_rejects_whitespace() {
        let err = require_text("resume_text", "   \n").unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("resume_text")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_require_text_accepts_content() {
        assert!(require_text("jd_text", "Senior Rust Engineer").is_ok());
    }

    #[test]
    fn test_rewrite_request_deserialization() {
        let json = serde_json::json!({
            "bullets": ["Did things", "Owned stuff"],
            "jd_text": "We need a Rust engineer."
        });
        let request: RewriteRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.bullets.len(), 2);
    }

    #[test]
    fn test_cover_letter_request_company_is_optional() {
        let json = serde_json::json!({
            "resume_text": "resume",
            "jd_text": "jd"
        });
        let request: CoverLetterRequest = serde_json::from_value(json).unwrap();
        assert!(request.company.is_none());
    }
}
