//! Content pipeline: Optimize → Generate → Perfect → Score.
//!
//! The four phases run strictly in order and every phase always runs, even when the
//! previous one fell back. Only the generate phase can fail the request, and only when
//! its single-shot recovery call fails too.

use std::time::Instant;

use tracing::info;

use crate::content::generator::generate_content;
use crate::content::metrics::{calculate_quality_metrics, estimate_word_count};
use crate::content::models::{
    ArticleBrief, GeneratedContent, OptimizedInput, PerfectedOutput, QualityMetrics,
};
use crate::content::optimizer::optimize_input;
use crate::content::perfection::perfect_output;
use crate::errors::AppError;
use crate::llm_client::CompletionService;

/// Number of phases reported to clients as `aiProcessingStages`.
pub const PROCESSING_STAGES: u8 = 4;

/// Everything the handler needs to build the response envelope.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub optimized: OptimizedInput,
    pub generated: GeneratedContent,
    pub perfected: PerfectedOutput,
    pub metrics: QualityMetrics,
    pub recommendations: Vec<String>,
}

impl PipelineOutput {
    /// Word count of the final, perfected article.
    pub fn final_word_count(&self) -> usize {
        estimate_word_count(&self.perfected.content)
    }
}

/// Runs all four phases for one validated request.
pub async fn run_pipeline(
    brief: ArticleBrief,
    completion: &dyn CompletionService,
) -> Result<PipelineOutput, AppError> {
    // Phase 1: Optimize
    let started = Instant::now();
    let optimized = optimize_input(brief, completion).await;
    info!(
        "Phase 1/4 optimize done in {}ms",
        started.elapsed().as_millis()
    );

    // Phase 2: Generate
    let started = Instant::now();
    let generated = generate_content(&optimized, completion).await?;
    info!(
        "Phase 2/4 generate done in {}ms: {} words over {} round(s)",
        started.elapsed().as_millis(),
        generated.word_count,
        generated.rounds
    );

    // Phase 3: Perfect
    let perfected = perfect_output(&generated, &optimized);
    info!(
        "Phase 3/4 perfect done: {} link(s), seo={}",
        perfected.affiliate_links.len(),
        perfected.seo_score
    );

    // Phase 4: Score
    let metrics = score_output(&perfected, &optimized);
    let recommendations = build_recommendations(&metrics, &optimized);
    info!("Phase 4/4 score done: overall={}", metrics.overall_score);

    Ok(PipelineOutput {
        optimized,
        generated,
        perfected,
        metrics,
        recommendations,
    })
}

/// Quality metrics for the perfected article, or the fixed bundle if perfection fell back.
pub fn score_output(perfected: &PerfectedOutput, optimized: &OptimizedInput) -> QualityMetrics {
    if perfected.fallback {
        return QualityMetrics::fallback();
    }
    calculate_quality_metrics(
        &perfected.content,
        &optimized.brief.keyword,
        optimized.brief.word_count,
        perfected.affiliate_links.len(),
        perfected.seo_score,
    )
}

/// Editorial suggestions for every sub-score that missed its threshold.
pub fn build_recommendations(metrics: &QualityMetrics, optimized: &OptimizedInput) -> Vec<String> {
    let keyword = &optimized.brief.keyword;
    let mut recommendations = Vec::new();

    if metrics.word_count_accuracy < 90 {
        recommendations.push(format!(
            "Expand the article toward the {}-word target with more examples or an FAQ",
            optimized.brief.word_count
        ));
    }
    if metrics.keyword_optimization < 85 {
        recommendations.push(format!(
            "Adjust usage of '{keyword}' toward a 1-3% keyword density"
        ));
    }
    if metrics.affiliate_integration < 66 {
        recommendations.push(
            "Add contextual affiliate or reference links inside recommendation sections"
                .to_string(),
        );
    }
    if metrics.structural_quality < 85 {
        recommendations.push(
            "Break the content into more H2/H3 sections and shorter paragraphs".to_string(),
        );
    }
    if metrics.readability < 90 {
        recommendations
            .push("Aim for an average sentence length of 15-20 words".to_string());
    }
    if metrics.seo_score < 75 {
        recommendations.push(format!(
            "Strengthen on-page SEO: use '{keyword}' in headings and the opening paragraph"
        ));
    }

    if recommendations.is_empty() {
        recommendations.push("Content meets all quality benchmarks".to_string());
    }
    recommendations
}
