use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Total attempts per LLM call. 1 means a failure goes straight to the phase fallback.
    pub llm_max_attempts: u32,
    pub llm_timeout_secs: u64,
    /// Used when a request omits `wordCount` or sends something unparseable.
    pub default_word_count: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_max_attempts: parse_env::<u32>("LLM_MAX_ATTEMPTS", 1)?.max(1),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            default_word_count: parse_env("DEFAULT_WORD_COUNT", 3000)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .ok()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test owns its variable names so parallel tests never race on the environment.

    #[test]
    fn test_parse_env_unset_uses_default() {
        std::env::remove_var("EMPIRE_TEST_UNSET_PORT");
        assert_eq!(parse_env::<u16>("EMPIRE_TEST_UNSET_PORT", 8080).unwrap(), 8080);
    }

    #[test]
    fn test_parse_env_trims_valid_value() {
        std::env::set_var("EMPIRE_TEST_WORD_COUNT", " 4500 ");
        assert_eq!(parse_env::<u32>("EMPIRE_TEST_WORD_COUNT", 3000).unwrap(), 4500);
    }

    #[test]
    fn test_parse_env_invalid_value_is_error() {
        std::env::set_var("EMPIRE_TEST_ATTEMPTS", "three");
        let err = parse_env::<u32>("EMPIRE_TEST_ATTEMPTS", 1).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("EMPIRE_TEST_ATTEMPTS"));
        assert!(message.contains("three"));
    }

    #[test]
    fn test_parse_env_rejects_out_of_range() {
        std::env::set_var("EMPIRE_TEST_BIG_PORT", "70000");
        assert!(parse_env::<u16>("EMPIRE_TEST_BIG_PORT", 8080).is_err());
    }

    #[test]
    fn test_require_env_reports_missing_key() {
        std::env::remove_var("EMPIRE_TEST_MISSING_KEY");
        let err = require_env("EMPIRE_TEST_MISSING_KEY").unwrap_err();
        assert!(err.to_string().contains("EMPIRE_TEST_MISSING_KEY"));
    }
}
