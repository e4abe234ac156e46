//! Quality Metrics: pure, deterministic text heuristics.
//!
//! No LLM calls. Every function here takes text and returns a 0–100 score, so the
//! whole module is unit-testable without a network.

use std::sync::LazyLock;

use regex::Regex;

use crate::content::models::QualityMetrics;

/// Floor applied to the weighted overall score.
pub const MIN_OVERALL_SCORE: u32 = 50;

/// Weights for the overall score, in the order the sub-scores appear in `QualityMetrics`.
const WEIGHT_WORD_COUNT: f64 = 0.15;
const WEIGHT_KEYWORD: f64 = 0.25;
const WEIGHT_AFFILIATE: f64 = 0.15;
const WEIGHT_STRUCTURE: f64 = 0.15;
const WEIGHT_READABILITY: f64 = 0.15;
const WEIGHT_SEO: f64 = 0.15;

/// Markdown `#`–`######` heading lines or HTML `<h1>`–`<h6>` opening tags.
static HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]{0,3}#{1,6}[ \t]+\S|<h[1-6][\s>]").expect("header regex is valid")
});

static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("sentence regex is valid"));

static PARAGRAPH_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("paragraph regex is valid"));

// ────────────────────────────────────────────────────────────────────────────
// Text statistics
// ────────────────────────────────────────────────────────────────────────────

/// Estimated word count: whitespace-separated non-empty tokens.
pub fn estimate_word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn count_headers(text: &str) -> usize {
    HEADER_RE.find_iter(text).count()
}

/// Non-blank blocks separated by at least one blank line.
pub fn count_paragraphs(text: &str) -> usize {
    PARAGRAPH_BREAK_RE
        .split(text)
        .filter(|block| !block.trim().is_empty())
        .count()
}

/// Non-blank fragments between runs of `.`, `!` or `?`.
pub fn count_sentences(text: &str) -> usize {
    SENTENCE_END_RE
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .count()
}

/// Case-insensitive whole-word matcher for `keyword` (which may be a phrase).
///
/// Word boundaries are only asserted on ends that are word characters, so keywords
/// like "c++" or ".net" still match. Returns `None` for a blank keyword.
pub fn keyword_regex(keyword: &str) -> Option<Regex> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return None;
    }
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');
    let lead = if is_word(keyword.chars().next()) { r"\b" } else { "" };
    let trail = if is_word(keyword.chars().last()) { r"\b" } else { "" };
    Regex::new(&format!("(?i){lead}{}{trail}", regex::escape(keyword))).ok()
}

/// Case-insensitive, non-overlapping whole-word occurrences of `keyword`.
pub fn count_keyword_occurrences(text: &str, keyword: &str) -> usize {
    keyword_regex(keyword).map_or(0, |re| re.find_iter(text).count())
}

/// Keyword occurrences as a percentage of total words.
pub fn keyword_density(text: &str, keyword: &str) -> f64 {
    let words = estimate_word_count(text);
    if words == 0 {
        return 0.0;
    }
    count_keyword_occurrences(text, keyword) as f64 / words as f64 * 100.0
}

// ────────────────────────────────────────────────────────────────────────────
// Sub-scores
// ────────────────────────────────────────────────────────────────────────────

/// `actual / target` as a percentage, clamped to [50, 100].
pub fn calculate_word_count_accuracy(actual: usize, target: u32) -> u32 {
    if target == 0 {
        return 50;
    }
    let ratio = actual as f64 / target as f64 * 100.0;
    (ratio.round() as u32).clamp(50, 100)
}

/// Buckets keyword density: 1–3% is ideal, under- and over-use lose points.
pub fn calculate_keyword_score(text: &str, keyword: &str) -> u32 {
    let occurrences = count_keyword_occurrences(text, keyword);
    if occurrences == 0 {
        return 50;
    }
    let density = keyword_density(text, keyword);
    if (1.0..=3.0).contains(&density) {
        100
    } else if (0.5..1.0).contains(&density) {
        85
    } else if density > 3.0 && density <= 5.0 {
        75
    } else {
        65
    }
}

/// 33 points per affiliate link, capped at 100.
pub fn calculate_affiliate_score(link_count: usize) -> u32 {
    (link_count.min(4) as u32 * 33).min(100)
}

/// Base 60, +15 for ≥3 headers, +10 more for ≥6 headers, +15 for ≥5 paragraphs.
pub fn calculate_structural_score(text: &str) -> u32 {
    let headers = count_headers(text);
    let paragraphs = count_paragraphs(text);

    let mut score = 60;
    if headers >= 3 {
        score += 15;
    }
    if headers >= 6 {
        score += 10;
    }
    if paragraphs >= 5 {
        score += 15;
    }
    score.min(100)
}

/// Base 70, +20 when average sentence length is 10–25 words, +10 more for 15–20.
pub fn calculate_readability_score(text: &str) -> u32 {
    let sentences = count_sentences(text);
    if sentences == 0 {
        return 70;
    }
    let avg = estimate_word_count(text) as f64 / sentences as f64;

    let mut score = 70;
    if (10.0..=25.0).contains(&avg) {
        score += 20;
    }
    if (15.0..=20.0).contains(&avg) {
        score += 10;
    }
    score.min(100)
}

/// Computes every sub-score and the weighted overall score for a finished article.
pub fn calculate_quality_metrics(
    content: &str,
    keyword: &str,
    target_word_count: u32,
    affiliate_link_count: usize,
    seo_score: u32,
) -> QualityMetrics {
    let word_count_accuracy =
        calculate_word_count_accuracy(estimate_word_count(content), target_word_count);
    let keyword_optimization = calculate_keyword_score(content, keyword);
    let affiliate_integration = calculate_affiliate_score(affiliate_link_count);
    let structural_quality = calculate_structural_score(content);
    let readability = calculate_readability_score(content);
    let seo_score = seo_score.min(100);

    let weighted = WEIGHT_WORD_COUNT * word_count_accuracy as f64
        + WEIGHT_KEYWORD * keyword_optimization as f64
        + WEIGHT_AFFILIATE * affiliate_integration as f64
        + WEIGHT_STRUCTURE * structural_quality as f64
        + WEIGHT_READABILITY * readability as f64
        + WEIGHT_SEO * seo_score as f64;

    QualityMetrics {
        word_count_accuracy,
        keyword_optimization,
        affiliate_integration,
        structural_quality,
        readability,
        seo_score,
        overall_score: (weighted.round() as u32).clamp(MIN_OVERALL_SCORE, 100),
    }
}
