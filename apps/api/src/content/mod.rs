// Content generation engine.
// Implements: input optimization, round-based generation, output perfection, quality scoring.
// All LLM calls go through llm_client::CompletionService; no direct Anthropic calls here.

pub mod generator;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod optimizer;
pub mod perfection;
pub mod pipeline;
pub mod prompts;
