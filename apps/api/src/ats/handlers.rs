//! Axum route handlers for the ATS API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ats::apply::apply;
use crate::ats::engine::Analysis;
use crate::errors::AppError;
use crate::models::resume::ResumeData;
use crate::models::suggestion::{ScoreResult, Suggestion};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub resume: ResumeData,
    pub suggestion: Suggestion,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub resume: ResumeData,
    pub suggestion: Suggestion,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ats/suggestions
pub async fn handle_suggestions(
    State(state): State<AppState>,
    Json(resume): Json<ResumeData>,
) -> Json<SuggestionsResponse> {
    let suggestions = state.engine.generate_suggestions(&resume).await;
    Json(SuggestionsResponse { suggestions })
}

/// POST /api/v1/ats/score
///
/// Never fails: the rule-based scorer is the floor of the strategy chain.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(resume): Json<ResumeData>,
) -> Json<ScoreResult> {
    Json(state.engine.calculate_score(&resume).await)
}

/// POST /api/v1/ats/analyze
///
/// Suggestions and score in one round trip, computed concurrently.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(resume): Json<ResumeData>,
) -> Json<Analysis> {
    Json(state.engine.analyze(&resume).await)
}

/// POST /api/v1/ats/apply
///
/// Writes an applicable suggestion back into the resume. Advisory
/// suggestions (format, keyword, education, dataset patterns) are rejected.
pub async fn handle_apply(
    Json(request): Json<ApplyRequest>,
) -> Result<Json<ApplyResponse>, AppError> {
    let (resume, suggestion) = apply(&request.resume, &request.suggestion)?;
    info!("Applied suggestion to '{}'", suggestion.field);
    Ok(Json(ApplyResponse { resume, suggestion }))
}
