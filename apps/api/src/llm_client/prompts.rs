// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Formatting rules appended to every article-writing prompt.
pub const MARKDOWN_INSTRUCTION: &str = "\
    Write in Markdown. Use `##` and `###` headings to break up sections. \
    Separate paragraphs with a blank line. \
    Return only the article text: no preamble, no closing remarks about the task.";

/// Guardrail against unnatural keyword repetition.
pub const KEYWORD_INSTRUCTION: &str = "\
    Use the primary keyword naturally, aiming for roughly 1-3% density. \
    Weave in the semantic variants where they fit. Never keyword-stuff.";
