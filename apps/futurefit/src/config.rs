use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Inline-data ceiling of the inference service.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if the API credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub inference_timeout: Duration,
    pub max_upload_bytes: usize,
    pub progress_tick: Duration,
    pub progress_hold: Duration,
    pub session_ttl: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_api_base: std::env::var("GEMINI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE.to_string()),
            inference_timeout: Duration::from_secs(parse_nonzero("INFERENCE_TIMEOUT_SECS", 120)?),
            max_upload_bytes: parse_nonzero("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            progress_tick: Duration::from_millis(parse_nonzero("PROGRESS_TICK_MS", 1000)?),
            progress_hold: Duration::from_millis(parse_env("PROGRESS_HOLD_MS", 500)?),
            session_ttl: Duration::from_secs(parse_nonzero("SESSION_TTL_SECS", 1800)?),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

/// Like `parse_env`, but zero is rejected. Used for periods, timeouts and limits.
fn parse_nonzero<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Default + PartialEq,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = parse_env(key, default)?;
    if value == T::default() {
        bail!("{key} must be greater than zero");
    }
    Ok(value)
}

#[cfg(test)]
impl Config {
    /// Configuration with short timings for tests; never touches the environment.
    pub fn for_tests() -> Self {
        Config {
            gemini_api_key: "test-key".to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_api_base: "http://127.0.0.1:9".to_string(),
            inference_timeout: Duration::from_secs(5),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            progress_tick: Duration::from_millis(100),
            progress_hold: Duration::from_millis(50),
            session_ttl: Duration::from_secs(1800),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u64 = parse_env("FUTUREFIT_TEST_SURELY_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("FUTUREFIT_TEST_GARBAGE_PORT", "eighty");
        let result: Result<u16> = parse_env("FUTUREFIT_TEST_GARBAGE_PORT", 8080);
        assert!(result.is_err());
        std::env::remove_var("FUTUREFIT_TEST_GARBAGE_PORT");
    }

    #[test]
    fn test_require_env_rejects_blank() {
        std::env::set_var("FUTUREFIT_TEST_BLANK_KEY", "   ");
        assert!(require_env("FUTUREFIT_TEST_BLANK_KEY").is_err());
        std::env::remove_var("FUTUREFIT_TEST_BLANK_KEY");
    }

    #[test]
    fn test_parse_nonzero_rejects_zero_tick() {
        std::env::set_var("FUTUREFIT_TEST_ZERO_TICK_MS", "0");
        let result: Result<u64> = parse_nonzero("FUTUREFIT_TEST_ZERO_TICK_MS", 1000);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("must be greater than zero"));
        std::env::remove_var("FUTUREFIT_TEST_ZERO_TICK_MS");
    }

    #[test]
    fn test_parse_nonzero_accepts_positive_and_default() {
        std::env::set_var("FUTUREFIT_TEST_TIMEOUT_SECS", " 30 ");
        let value: u64 = parse_nonzero("FUTUREFIT_TEST_TIMEOUT_SECS", 120).unwrap();
        assert_eq!(value, 30);
        std::env::remove_var("FUTUREFIT_TEST_TIMEOUT_SECS");

        let value: usize = parse_nonzero("FUTUREFIT_TEST_SURELY_UNSET_LIMIT", 1024).unwrap();
        assert_eq!(value, 1024);
    }
}
