//! Round-Based Generator: builds a long article in sequential chunks.
//!
//! Flow: plan_rounds → for each round (intro / body / conclusion) → complete → append.
//! Rounds run strictly one after another; each prompt sees the first 800 characters of
//! what has been written so far. A failed round is replaced by a placeholder sentence.
//! If the result is still under 1000 words, it is thrown away and a single-shot draft
//! of at least 2000 words is requested instead.

use tracing::{info, warn};

use crate::content::metrics::estimate_word_count;
use crate::content::models::{GeneratedContent, OptimizedInput};
use crate::content::prompts::{
    ARTICLE_BRIEF_TEMPLATE, BODY_PROMPT_TEMPLATE, CONCLUSION_PROMPT_TEMPLATE,
    FALLBACK_PROMPT_TEMPLATE, INTRODUCTION_PROMPT_TEMPLATE, ROUND_PLACEHOLDER_TEMPLATE,
    WRITER_SYSTEM,
};
use crate::errors::AppError;
use crate::llm_client::prompts::{KEYWORD_INSTRUCTION, MARKDOWN_INSTRUCTION};
use crate::llm_client::{CompletionService, MAX_TOKENS_CEILING};

pub const MAX_WORDS_PER_ROUND: u32 = 3500;
pub const MIN_WORDS_PER_ROUND: u32 = 1000;
/// Characters of prior content handed to each follow-up round.
pub const CONTEXT_CHARS: usize = 800;
/// Below this total the round output is discarded in favor of a single-shot draft.
pub const MIN_ACCEPTABLE_WORDS: usize = 1000;
pub const FALLBACK_MIN_WORDS: u32 = 2000;
const SOURCE_MATERIAL_CHARS: usize = 3000;
const TOKENS_PER_WORD: f64 = 1.5;
const ROUND_SEPARATOR: &str = "\n\n";

/// What a round is asked to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundRole {
    Introduction,
    Body,
    Conclusion,
}

impl RoundRole {
    /// Round 1 introduces, the last of several concludes, everything between is body.
    pub fn for_round(round: u32, total_rounds: u32) -> Self {
        if round <= 1 {
            RoundRole::Introduction
        } else if round >= total_rounds {
            RoundRole::Conclusion
        } else {
            RoundRole::Body
        }
    }
}

/// `ceil(target / 3500)`, at least one round.
pub fn plan_rounds(target_words: u32) -> u32 {
    target_words.div_ceil(MAX_WORDS_PER_ROUND).max(1)
}

/// Words requested from one round: what is left of the target, clamped to [1000, 3500].
pub fn round_word_target(target_words: u32, words_so_far: usize) -> u32 {
    let remaining = target_words as i64 - words_so_far as i64;
    remaining.clamp(MIN_WORDS_PER_ROUND as i64, MAX_WORDS_PER_ROUND as i64) as u32
}

/// Literal prefix of the prior content, cut on a character boundary.
pub fn prior_context(content: &str) -> &str {
    match content.char_indices().nth(CONTEXT_CHARS) {
        Some((byte_idx, _)) => &content[..byte_idx],
        None => content,
    }
}

/// Token budget for a completion that should produce `words` words.
pub fn token_budget(words: u32) -> u32 {
    ((words as f64 * TOKENS_PER_WORD).ceil() as u32).min(MAX_TOKENS_CEILING)
}

/// Runs the generate phase.
///
/// Returns an error only when the single-shot fallback itself fails.
pub async fn generate_content(
    input: &OptimizedInput,
    completion: &dyn CompletionService,
) -> Result<GeneratedContent, AppError> {
    let target = input.brief.word_count;
    let total_rounds = plan_rounds(target);
    let brief = render_brief(input);

    info!(
        "Generating ~{} words for '{}' in {} round(s)",
        target, input.brief.keyword, total_rounds
    );

    let mut content = String::new();

    for round in 1..=total_rounds {
        let words_so_far = estimate_word_count(&content);
        let round_words = round_word_target(target, words_so_far);
        let role = RoundRole::for_round(round, total_rounds);
        let prompt = build_round_prompt(&brief, role, round, total_rounds, round_words, &content);

        let chunk = match completion
            .complete(&prompt, WRITER_SYSTEM, token_budget(round_words))
            .await
        {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("Round {round}/{total_rounds} failed, inserting placeholder: {e}");
                ROUND_PLACEHOLDER_TEMPLATE
                    .replace("{round}", &round.to_string())
                    .replace("{keyword}", &input.brief.keyword)
            }
        };

        if !content.is_empty() {
            content.push_str(ROUND_SEPARATOR);
        }
        content.push_str(&chunk);

        info!(
            "Round {}/{} ({:?}) done: {} words total",
            round,
            total_rounds,
            role,
            estimate_word_count(&content)
        );
    }

    let word_count = estimate_word_count(&content);
    if word_count >= MIN_ACCEPTABLE_WORDS {
        return Ok(GeneratedContent {
            content,
            word_count,
            rounds: total_rounds,
            used_fallback: false,
        });
    }

    warn!(
        "Rounds produced only {word_count} words (< {MIN_ACCEPTABLE_WORDS}), requesting single-shot draft"
    );

    let prompt = FALLBACK_PROMPT_TEMPLATE
        .replace("{brief}", &brief)
        .replace("{min_words}", &FALLBACK_MIN_WORDS.to_string());

    let content = completion
        .complete(&prompt, WRITER_SYSTEM, MAX_TOKENS_CEILING)
        .await
        .map_err(|e| AppError::Llm(format!("Fallback generation failed: {e}")))?
        .trim()
        .to_string();

    Ok(GeneratedContent {
        word_count: estimate_word_count(&content),
        content,
        rounds: total_rounds,
        used_fallback: true,
    })
}

fn render_brief(input: &OptimizedInput) -> String {
    let brief = &input.brief;
    let mut source_block = String::new();
    if let Some(url) = &brief.source_url {
        source_block.push_str(&format!("Source URL: {url}\n"));
    }
    if let Some(material) = &brief.source_material {
        let excerpt: String = material.chars().take(SOURCE_MATERIAL_CHARS).collect();
        source_block.push_str(&format!(
            "Source material (ground facts in this):\n{excerpt}\n"
        ));
    }
    if let Some(link) = &brief.affiliate_link {
        source_block.push_str(&format!("Affiliate link: {link}\n"));
    }

    ARTICLE_BRIEF_TEMPLATE
        .replace("{keyword}", &brief.keyword)
        .replace("{publication}", &brief.publication)
        .replace("{semantic_keywords}", &input.semantic_keywords.join(", "))
        .replace("{content_strategy}", &input.content_strategy)
        .replace("{affiliate_strategy}", &input.affiliate_strategy)
        .replace("{source_block}", &source_block)
        .replace("{markdown_instruction}", MARKDOWN_INSTRUCTION)
        .replace("{keyword_instruction}", KEYWORD_INSTRUCTION)
}

fn build_round_prompt(
    brief: &str,
    role: RoundRole,
    round: u32,
    total_rounds: u32,
    round_words: u32,
    content_so_far: &str,
) -> String {
    let template = match role {
        RoundRole::Introduction => INTRODUCTION_PROMPT_TEMPLATE,
        RoundRole::Body => BODY_PROMPT_TEMPLATE,
        RoundRole::Conclusion => CONCLUSION_PROMPT_TEMPLATE,
    };

    template
        .replace("{brief}", brief)
        .replace("{round}", &round.to_string())
        .replace("{total_rounds}", &total_rounds.to_string())
        .replace("{round_words}", &round_words.to_string())
        .replace("{context}", prior_context(content_so_far))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::models::GenerationRequest;
    use crate::content::optimizer::default_optimization;
    use crate::llm_client::mock::ScriptedCompletion;

    fn input(word_count: u32) -> OptimizedInput {
        let brief = GenerationRequest {
            keyword: Some("trail running".to_string()),
            publication: Some("Outdoor Monthly".to_string()),
            word_count: Some(word_count),
            ..Default::default()
        }
        .validate(3000)
        .unwrap();
        default_optimization(brief)
    }

    fn words(n: usize) -> String {
        vec!["stride"; n].join(" ")
    }

    #[test]
    fn test_plan_rounds() {
        assert_eq!(plan_rounds(8000), 3);
        assert_eq!(plan_rounds(3500), 1);
        assert_eq!(plan_rounds(3501), 2);
        assert_eq!(plan_rounds(500), 1);
        assert_eq!(plan_rounds(0), 1);
        assert_eq!(plan_rounds(20_000), 6);
    }

    #[test]
    fn test_round_word_target_clamps() {
        assert_eq!(round_word_target(8000, 0), 3500);
        assert_eq!(round_word_target(8000, 6000), 2000);
        assert_eq!(round_word_target(8000, 7800), 1000);
        assert_eq!(round_word_target(8000, 12000), 1000);
    }

    #[test]
    fn test_round_roles() {
        assert_eq!(RoundRole::for_round(1, 1), RoundRole::Introduction);
        assert_eq!(RoundRole::for_round(1, 3), RoundRole::Introduction);
        assert_eq!(RoundRole::for_round(2, 3), RoundRole::Body);
        assert_eq!(RoundRole::for_round(3, 3), RoundRole::Conclusion);
        assert_eq!(RoundRole::for_round(2, 2), RoundRole::Conclusion);
    }

    #[test]
    fn test_prior_context_truncates_by_chars() {
        let short = "short content";
        assert_eq!(prior_context(short), short);

        let long = "é".repeat(1000);
        let ctx = prior_context(&long);
        assert_eq!(ctx.chars().count(), CONTEXT_CHARS);
        assert!(long.starts_with(ctx));
    }

    #[test]
    fn test_token_budget_is_capped() {
        assert_eq!(token_budget(1000), 1500);
        assert_eq!(token_budget(3500), 5250);
        assert_eq!(token_budget(100_000), MAX_TOKENS_CEILING);
    }

    #[tokio::test]
    async fn test_three_rounds_are_joined_with_blank_lines() {
        let service = ScriptedCompletion::new(
            vec![
                Ok(format!("# Title\n\n{}", words(3500))),
                Ok(words(3000)),
                Ok(words(1500)),
            ],
            Err("unexpected extra call".to_string()),
        );
        let generated = generate_content(&input(8000), &service).await.unwrap();

        assert_eq!(generated.rounds, 3);
        assert!(!generated.used_fallback);
        assert_eq!(service.call_count(), 3);
        assert_eq!(generated.content.matches("\n\n").count(), 3);
        assert_eq!(generated.word_count, 2 + 3500 + 3000 + 1500);

        let prompts = service.prompts.lock().unwrap();
        assert!(prompts[0].0.contains("part 1 of 3"));
        assert!(prompts[1].0.contains("part 2 of 3"));
        assert!(prompts[1].0.contains("# Title"));
        assert!(prompts[2].0.contains("final part (3 of 3)"));
        // Round 2 asks for what remains: 8000 - 3502 = 4498 → clamped to 3500.
        assert_eq!(prompts[1].1, token_budget(3500));
        // Round 3: 8000 - 6502 = 1498.
        assert!(prompts[2].0.contains("about 1498 words"));
    }

    #[tokio::test]
    async fn test_large_target_is_not_capped() {
        let service = ScriptedCompletion::always(words(3500));
        let generated = generate_content(&input(20_000), &service).await.unwrap();

        assert_eq!(generated.rounds, 6);
        assert_eq!(service.call_count(), 6);
        let prompts = service.prompts.lock().unwrap();
        assert!(prompts[5].0.contains("final part (6 of 6)"));
    }

    #[tokio::test]
    async fn test_failed_round_gets_placeholder() {
        let service = ScriptedCompletion::new(
            vec![Ok(words(2000)), Err("timeout".to_string())],
            Err("unexpected".to_string()),
        );
        let generated = generate_content(&input(5000), &service).await.unwrap();

        assert_eq!(generated.rounds, 2);
        assert!(!generated.used_fallback);
        assert!(generated
            .content
            .ends_with("Section 2 of this guide to trail running is being expanded with further detail."));
    }

    #[tokio::test]
    async fn test_short_output_triggers_single_shot_fallback() {
        let service = ScriptedCompletion::new(
            vec![Ok(words(200)), Ok(words(2400))],
            Err("unexpected".to_string()),
        );
        let generated = generate_content(&input(3000), &service).await.unwrap();

        assert!(generated.used_fallback);
        assert_eq!(generated.word_count, 2400);
        assert_eq!(service.call_count(), 2);
        let prompts = service.prompts.lock().unwrap();
        assert!(prompts[1].0.contains("at least 2000 words"));
        assert_eq!(prompts[1].1, MAX_TOKENS_CEILING);
    }

    #[tokio::test]
    async fn test_all_failures_surface_as_llm_error() {
        let service = ScriptedCompletion::failing();
        let result = generate_content(&input(3000), &service).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
        // one round + one fallback attempt
        assert_eq!(service.call_count(), 2);
    }

    #[tokio::test]
    async fn test_source_material_is_in_prompt() {
        let mut optimized = input(3000);
        optimized.brief.source_material = Some("Lab notes: the shoe weighs 210 grams.".to_string());
        let service = ScriptedCompletion::always(words(3000));
        generate_content(&optimized, &service).await.unwrap();

        let prompts = service.prompts.lock().unwrap();
        assert!(prompts[0].0.contains("the shoe weighs 210 grams"));
    }
}
