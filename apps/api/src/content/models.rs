//! Request and domain types for article generation.
//!
//! Wire names are camelCase to match the dashboard form that posts to this service.

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::AppError;

// ────────────────────────────────────────────────────────────────────────────
// Inbound request
// ────────────────────────────────────────────────────────────────────────────

/// Raw request body as submitted by the caller. Echoed back as `metadata.originalInput`.
///
/// Every field is optional at the serde layer so that missing mandatory fields surface
/// as a validation error with the JSON envelope instead of an extractor rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication: Option<String>,
    /// Accepts a JSON number or a numeric string ("3000").
    #[serde(
        default,
        deserialize_with = "lenient_word_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub word_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliate_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl GenerationRequest {
    /// Checks mandatory fields and resolves the target word count.
    pub fn validate(&self, default_word_count: u32) -> Result<ArticleBrief, AppError> {
        let keyword = non_blank(&self.keyword);
        let publication = non_blank(&self.publication);

        let (keyword, publication) = match (keyword, publication) {
            (Some(k), Some(p)) => (k, p),
            (k, p) => {
                let missing: Vec<&str> = [("keyword", k.is_none()), ("publication", p.is_none())]
                    .into_iter()
                    .filter(|(_, absent)| *absent)
                    .map(|(name, _)| name)
                    .collect();
                return Err(AppError::Validation(format!(
                    "Missing required fields: {}",
                    missing.join(", ")
                )));
            }
        };

        let word_count = self.word_count.unwrap_or(default_word_count);

        Ok(ArticleBrief {
            keyword,
            publication,
            word_count,
            affiliate_link: non_blank(&self.affiliate_link),
            source_url: non_blank(&self.source_url),
            source_material: non_blank(&self.source_material),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn lenient_word_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed
        .filter(|n| n.is_finite() && *n >= 1.0)
        .map(|n| n.round().min(u32::MAX as f64) as u32))
}

// ────────────────────────────────────────────────────────────────────────────
// Derived inputs
// ────────────────────────────────────────────────────────────────────────────

/// Validated request: mandatory fields present, blanks normalized away, word count resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleBrief {
    pub keyword: String,
    pub publication: String,
    pub word_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliate_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing)]
    pub source_material: Option<String>,
}

/// The brief enriched by the optimize phase. Lives for one request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedInput {
    #[serde(flatten)]
    pub brief: ArticleBrief,
    pub semantic_keywords: Vec<String>,
    pub content_strategy: String,
    pub affiliate_strategy: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Phase outputs
// ────────────────────────────────────────────────────────────────────────────

/// Article text assembled by the round-based generator.
#[derive(Debug, Clone)]
pub struct GeneratedContent {
    pub content: String,
    pub word_count: usize,
    pub rounds: u32,
    /// True when the round output was too short and a single-shot draft replaced it.
    pub used_fallback: bool,
}

/// Result of the perfect phase.
#[derive(Debug, Clone)]
pub struct PerfectedOutput {
    pub content: String,
    pub affiliate_links: Vec<String>,
    pub seo_score: u32,
    pub optimizations: Vec<String>,
    /// Set when perfection hit an internal error and returned the fixed fallback bundle.
    pub fallback: bool,
}

/// Heuristic quality scores, each 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityMetrics {
    pub word_count_accuracy: u32,
    pub keyword_optimization: u32,
    pub affiliate_integration: u32,
    pub structural_quality: u32,
    pub readability: u32,
    pub seo_score: u32,
    /// Weighted sum of the above, never below 50.
    pub overall_score: u32,
}

impl QualityMetrics {
    /// Fixed bundle reported when scoring inputs could not be produced.
    pub fn fallback() -> Self {
        Self {
            word_count_accuracy: 75,
            keyword_optimization: 75,
            affiliate_integration: 75,
            structural_quality: 75,
            readability: 75,
            seo_score: 75,
            overall_score: 75,
        }
    }
}
