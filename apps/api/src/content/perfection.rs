//! Output Perfection: final touches on the generated article plus the SEO heuristic.
//!
//! Ensures a supplied affiliate link actually appears in the text, collects the links
//! the article carries and scores basic on-page SEO signals. Never fails: internal
//! errors produce a fixed fallback bundle.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::warn;

use crate::content::metrics::{
    count_headers, count_sentences, estimate_word_count, keyword_regex,
};
use crate::content::models::{GeneratedContent, OptimizedInput, PerfectedOutput};

pub const MAX_AFFILIATE_LINKS: usize = 5;
/// SEO score reported when perfection falls back.
pub const FALLBACK_SEO_SCORE: u32 = 75;
const SEO_POINTS_PER_SIGNAL: u32 = 25;
const SEO_MIN_WORDS: usize = 1000;
const SEO_MIN_SENTENCES: usize = 20;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"'()\[\]{}]+"#).expect("url regex is valid")
});

#[derive(Debug, Error)]
enum PerfectionError {
    #[error("generated content is empty")]
    EmptyContent,
}

/// Runs the perfect phase.
pub fn perfect_output(generated: &GeneratedContent, input: &OptimizedInput) -> PerfectedOutput {
    match try_perfect(generated, input) {
        Ok(output) => output,
        Err(e) => {
            warn!("Output perfection failed, using fallback bundle: {e}");
            fallback_output(generated, input)
        }
    }
}

fn try_perfect(
    generated: &GeneratedContent,
    input: &OptimizedInput,
) -> Result<PerfectedOutput, PerfectionError> {
    let keyword = input.brief.keyword.as_str();
    let mut content = generated.content.trim().to_string();
    if content.is_empty() {
        return Err(PerfectionError::EmptyContent);
    }

    let mut optimizations = vec![format!(
        "Generated in {} round(s){}",
        generated.rounds,
        if generated.used_fallback {
            " with single-shot recovery"
        } else {
            ""
        }
    )];

    if let Some(link) = &input.brief.affiliate_link {
        if !content.contains(link.as_str()) {
            content.push_str(&format!(
                "\n\n## Recommended Resource\n\n[Explore our top {keyword} pick]({link})"
            ));
            optimizations.push("Affiliate link placed in a recommendation section".to_string());
        }
    }

    let affiliate_links = extract_affiliate_links(&content, input.brief.affiliate_link.as_deref());
    let seo_score = calculate_seo_score(&content, keyword);

    optimizations.push(format!(
        "Semantic keywords targeted: {}",
        input.semantic_keywords.join(", ")
    ));
    optimizations.push(format!("Content strategy: {}", input.content_strategy));
    optimizations.push(format!("Affiliate links detected: {}", affiliate_links.len()));
    optimizations.push(format!("SEO score: {seo_score}/100"));

    Ok(PerfectedOutput {
        content,
        affiliate_links,
        seo_score,
        optimizations,
        fallback: false,
    })
}

fn fallback_output(generated: &GeneratedContent, input: &OptimizedInput) -> PerfectedOutput {
    PerfectedOutput {
        content: generated.content.clone(),
        affiliate_links: input.brief.affiliate_link.iter().cloned().collect(),
        seo_score: FALLBACK_SEO_SCORE,
        optimizations: vec!["Standard formatting applied".to_string()],
        fallback: true,
    }
}

/// The supplied link first, then distinct URLs from the text, at most five in total.
pub fn extract_affiliate_links(content: &str, affiliate_link: Option<&str>) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    if let Some(link) = affiliate_link.map(str::trim).filter(|l| !l.is_empty()) {
        links.push(link.to_string());
    }

    for m in URL_RE.find_iter(content) {
        if links.len() >= MAX_AFFILIATE_LINKS {
            break;
        }
        let url = m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']);
        if !links.iter().any(|l| l == url) {
            links.push(url.to_string());
        }
    }
    links
}

/// 25 points each for: keyword present, a heading present, ≥1000 words, ≥20 sentences.
pub fn calculate_seo_score(content: &str, keyword: &str) -> u32 {
    let signals = [
        keyword_regex(keyword).is_some_and(|re| re.is_match(content)),
        count_headers(content) > 0,
        estimate_word_count(content) >= SEO_MIN_WORDS,
        count_sentences(content) >= SEO_MIN_SENTENCES,
    ];
    let score = signals.iter().filter(|hit| **hit).count() as u32 * SEO_POINTS_PER_SIGNAL;
    score.min(100)
}
