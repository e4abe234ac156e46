//! Axum route handlers for the content generation API.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::content::models::{GenerationRequest, OptimizedInput, QualityMetrics};
use crate::content::pipeline::{run_pipeline, PROCESSING_STAGES};
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    pub success: bool,
    pub article: Article,
    pub metadata: GenerationMetadata,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub content: String,
    pub word_count: usize,
    pub affiliate_links: Vec<String>,
    pub quality_score: u32,
    pub optimizations: Vec<String>,
    pub ai_recommendations: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationMetadata {
    pub original_input: GenerationRequest,
    pub optimized_input: OptimizedInput,
    pub quality_metrics: QualityMetrics,
    /// Wall-clock time for the whole pipeline, e.g. "5321ms".
    pub processing_time: String,
    pub ai_processing_stages: u8,
    pub generation_rounds: u32,
    pub request_id: Uuid,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-content
///
/// Validates the brief, then runs Optimize → Generate → Perfect → Score.
pub async fn handle_generate_content(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerateContentResponse>, AppError> {
    let started = Instant::now();

    let Json(request) =
        payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;
    let brief = request.validate(state.config.default_word_count)?;

    let request_id = Uuid::new_v4();
    info!(
        "Content request {request_id}: keyword='{}', publication='{}', target={} words",
        brief.keyword, brief.publication, brief.word_count
    );

    let output = run_pipeline(brief, state.completion.as_ref()).await?;
    let elapsed = started.elapsed().as_millis();

    info!(
        "Content request {request_id} finished in {elapsed}ms, score {}",
        output.metrics.overall_score
    );

    let word_count = output.final_word_count();
    Ok(Json(GenerateContentResponse {
        success: true,
        article: Article {
            content: output.perfected.content,
            word_count,
            affiliate_links: output.perfected.affiliate_links,
            quality_score: output.metrics.overall_score,
            optimizations: output.perfected.optimizations,
            ai_recommendations: output.recommendations,
        },
        metadata: GenerationMetadata {
            original_input: request,
            optimized_input: output.optimized,
            quality_metrics: output.metrics,
            processing_time: format!("{elapsed}ms"),
            ai_processing_stages: PROCESSING_STAGES,
            generation_rounds: output.generated.rounds,
            request_id,
        },
        timestamp: Utc::now(),
    }))
}

/// OPTIONS /api/generate-content
///
/// Plain 200; the CORS layer attaches the permissive headers.
pub async fn handle_generate_content_options() -> StatusCode {
    StatusCode::OK
}
