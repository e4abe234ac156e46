// All LLM prompt constants for the content module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Persona for the optimize phase. Combined with `JSON_ONLY_SYSTEM` at call time.
pub const OPTIMIZE_SYSTEM: &str = "You are an SEO strategist planning long-form articles.";

/// Optimize prompt. Replace: {keyword}, {publication}, {word_count}, {affiliate_note}, {source_note}
pub const OPTIMIZE_PROMPT_TEMPLATE: &str = r#"Plan an SEO article.

Primary keyword: {keyword}
Publication: {publication}
Target length: {word_count} words
{affiliate_note}
{source_note}

Return a JSON object with this EXACT schema (no extra fields):
{
  "semanticKeywords": ["5 to 7 close variants and related search phrases"],
  "contentStrategy": "One or two sentences describing angle, audience and structure",
  "affiliateStrategy": "One sentence on where and how to place the affiliate link naturally"
}"#;

/// System prompt for every article-writing call.
pub const WRITER_SYSTEM: &str = "You are a senior editorial writer producing long-form, \
    search-optimized articles. Write original, specific, useful prose. \
    Never mention that you are an AI or that the text was generated.";

/// Shared header for round prompts.
/// Replace: {keyword}, {publication}, {semantic_keywords}, {content_strategy},
///          {affiliate_strategy}, {source_block}, {markdown_instruction}, {keyword_instruction}
pub const ARTICLE_BRIEF_TEMPLATE: &str = r#"ARTICLE BRIEF
Primary keyword: {keyword}
Publication: {publication}
Semantic keywords: {semantic_keywords}
Content strategy: {content_strategy}
Affiliate strategy: {affiliate_strategy}
{source_block}
{markdown_instruction}
{keyword_instruction}"#;

/// Round 1. Replace: {brief}, {round_words}, {total_rounds}
pub const INTRODUCTION_PROMPT_TEMPLATE: &str = r#"{brief}

This is part 1 of {total_rounds} of the article.
Write the title (as a `#` heading), the introduction and the first major sections.
Length: about {round_words} words."#;

/// Middle rounds. Replace: {brief}, {round}, {total_rounds}, {round_words}, {context}
pub const BODY_PROMPT_TEMPLATE: &str = r#"{brief}

This is part {round} of {total_rounds} of the article. The article so far begins:
---
{context}
---
Continue with NEW body sections that go deeper: examples, comparisons, step-by-step guidance.
Do not repeat the title or the introduction.
Length: about {round_words} words."#;

/// Final round. Replace: {brief}, {round}, {total_rounds}, {round_words}, {context}
pub const CONCLUSION_PROMPT_TEMPLATE: &str = r#"{brief}

This is the final part ({round} of {total_rounds}) of the article. The article so far begins:
---
{context}
---
Write the remaining sections, an FAQ section and a conclusion with a clear call to action.
Do not repeat the title or the introduction.
Length: about {round_words} words."#;

/// Single-shot replacement when the rounds produced too little text.
/// Replace: {brief}, {min_words}
pub const FALLBACK_PROMPT_TEMPLATE: &str = r#"{brief}

Write the COMPLETE article in one response: `#` title, introduction, at least six `##` sections,
an FAQ section and a conclusion.
Length: at least {min_words} words."#;

/// Stand-in text for a round whose completion failed. Replace: {round}, {keyword}
pub const ROUND_PLACEHOLDER_TEMPLATE: &str =
    "Section {round} of this guide to {keyword} is being expanded with further detail.";
