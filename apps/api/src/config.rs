use std::str::FromStr;
use std::time::Duration;

use anyhow::{ensure, Context, Result};

use crate::llm_client::{LlmSettings, MAX_ATTEMPTS_LIMIT};
use crate::pipeline::ranking::DEFAULT_INTERVIEW_SCORE_SCALE;

const DEFAULT_MAX_CV_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if a required variable is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    /// Upper bound for one CV upload request body.
    pub max_cv_bytes: usize,
    /// Multiplier from the mean per-question interview score to the chart scale.
    pub interview_score_scale: f64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_timeout_secs: env_or("LLM_TIMEOUT_SECS", 120)?,
            llm_max_retries: attempts(env_or("LLM_MAX_RETRIES", 3)?)?,
            max_cv_bytes: env_or("MAX_CV_BYTES", DEFAULT_MAX_CV_BYTES)?,
            interview_score_scale: env_or("INTERVIEW_SCORE_SCALE", DEFAULT_INTERVIEW_SCORE_SCALE)?,
        })
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            timeout: Duration::from_secs(self.llm_timeout_secs),
            max_attempts: self.llm_max_retries,
        }
    }
}

impl Default for Config {
    /// Defaults for everything but the API key, which is left empty.
    fn default() -> Self {
        Config {
            anthropic_api_key: String::new(),
            port: 8080,
            rust_log: "info".to_string(),
            llm_timeout_secs: 120,
            llm_max_retries: 3,
            max_cv_bytes: DEFAULT_MAX_CV_BYTES,
            interview_score_scale: DEFAULT_INTERVIEW_SCORE_SCALE,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn attempts(value: u32) -> Result<u32> {
    ensure!(
        (1..=MAX_ATTEMPTS_LIMIT).contains(&value),
        "LLM_MAX_RETRIES must be between 1 and {MAX_ATTEMPTS_LIMIT}, got {value}"
    );
    Ok(value)
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} has an invalid value '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_accepts_valid_numbers() {
        assert_eq!(parse_value::<u16>("PORT", " 9000 ").unwrap(), 9000);
        assert_eq!(
            parse_value::<f64>("INTERVIEW_SCORE_SCALE", "20").unwrap(),
            20.0
        );
    }

    #[test]
    fn test_parse_value_names_the_variable() {
        let err = parse_value::<u16>("PORT", "eighty").unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_attempts_must_be_in_range() {
        assert_eq!(attempts(1).unwrap(), 1);
        assert_eq!(attempts(MAX_ATTEMPTS_LIMIT).unwrap(), MAX_ATTEMPTS_LIMIT);
        assert!(attempts(0).is_err());
        let err = attempts(4_000_000_000).unwrap_err();
        assert!(err.to_string().contains("LLM_MAX_RETRIES"));
    }

    #[test]
    fn test_llm_settings_follow_config() {
        let config = Config {
            llm_timeout_secs: 30,
            llm_max_retries: 5,
            ..Config::default()
        };
        let settings = config.llm_settings();
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert_eq!(settings.max_attempts, 5);
    }
}
