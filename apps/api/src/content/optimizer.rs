//! Input Optimizer: asks the model for semantic keyword variants and a content strategy.
//!
//! Never fails: any upstream or parse problem yields a deterministic plan derived from
//! the original keyword.

use serde::Deserialize;
use tracing::{info, warn};

use crate::content::models::{ArticleBrief, OptimizedInput};
use crate::content::prompts::{OPTIMIZE_PROMPT_TEMPLATE, OPTIMIZE_SYSTEM};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{parse_json_reply, CompletionService};

/// Cap on semantic keywords carried into generation prompts.
pub const MAX_SEMANTIC_KEYWORDS: usize = 8;
const OPTIMIZE_MAX_TOKENS: u32 = 1024;

/// Shape of the model's optimize reply. Every field is optional so partial replies still parse.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptimizationPlan {
    #[serde(default)]
    semantic_keywords: Vec<String>,
    #[serde(default)]
    content_strategy: Option<String>,
    #[serde(default)]
    affiliate_strategy: Option<String>,
}

/// Runs the optimize phase.
pub async fn optimize_input(
    brief: ArticleBrief,
    completion: &dyn CompletionService,
) -> OptimizedInput {
    let prompt = build_optimize_prompt(&brief);
    let system = format!("{OPTIMIZE_SYSTEM} {JSON_ONLY_SYSTEM}");

    let plan = match completion
        .complete(&prompt, &system, OPTIMIZE_MAX_TOKENS)
        .await
        .and_then(|text| parse_json_reply::<OptimizationPlan>(&text))
    {
        Ok(plan) if plan.semantic_keywords.iter().any(|k| !k.trim().is_empty()) => plan,
        Ok(_) => {
            warn!("Optimizer reply had no semantic keywords, using default plan");
            return default_optimization(brief);
        }
        Err(e) => {
            warn!("Optimizer call failed, using default plan: {e}");
            return default_optimization(brief);
        }
    };

    let defaults = default_optimization(brief);
    let semantic_keywords = merge_keywords(&defaults.brief.keyword, plan.semantic_keywords);
    info!(
        "Optimized input for '{}' with {} semantic keywords",
        defaults.brief.keyword,
        semantic_keywords.len()
    );

    OptimizedInput {
        semantic_keywords,
        content_strategy: non_blank_or(plan.content_strategy, defaults.content_strategy),
        affiliate_strategy: non_blank_or(plan.affiliate_strategy, defaults.affiliate_strategy),
        brief: defaults.brief,
    }
}

/// The plan used whenever the model cannot supply one.
pub fn default_optimization(brief: ArticleBrief) -> OptimizedInput {
    let keyword = brief.keyword.as_str();
    let semantic_keywords = vec![
        keyword.to_string(),
        format!("{keyword} guide"),
        format!("best {keyword}"),
        format!("{keyword} tips"),
        format!("{keyword} review"),
    ];
    let content_strategy = format!(
        "Comprehensive, reader-first guide to {keyword} for {}",
        brief.publication
    );
    let affiliate_strategy = if brief.affiliate_link.is_some() {
        "Place the affiliate link naturally within a recommendation section".to_string()
    } else {
        "No affiliate link provided; focus on informational value".to_string()
    };

    OptimizedInput {
        semantic_keywords,
        content_strategy,
        affiliate_strategy,
        brief,
    }
}

/// Primary keyword first, then model suggestions, deduplicated case-insensitively.
fn merge_keywords(primary: &str, suggested: Vec<String>) -> Vec<String> {
    let mut merged = vec![primary.to_string()];
    for keyword in suggested {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            continue;
        }
        if merged.iter().any(|k| k.eq_ignore_ascii_case(keyword)) {
            continue;
        }
        merged.push(keyword.to_string());
        if merged.len() == MAX_SEMANTIC_KEYWORDS {
            break;
        }
    }
    merged
}

fn non_blank_or(value: Option<String>, fallback: String) -> String {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
}

fn build_optimize_prompt(brief: &ArticleBrief) -> String {
    let affiliate_note = match &brief.affiliate_link {
        Some(link) => format!("Affiliate link to feature: {link}"),
        None => "No affiliate link.".to_string(),
    };
    let source_note = match (&brief.source_url, &brief.source_material) {
        (_, Some(material)) => format!(
            "Source material excerpt: {}",
            material.chars().take(1000).collect::<String>()
        ),
        (Some(url), None) => format!("Source URL: {url}"),
        (None, None) => String::new(),
    };

    OPTIMIZE_PROMPT_TEMPLATE
        .replace("{keyword}", &brief.keyword)
        .replace("{publication}", &brief.publication)
        .replace("{word_count}", &brief.word_count.to_string())
        .replace("{affiliate_note}", &affiliate_note)
        .replace("{source_note}", &source_note)
}
