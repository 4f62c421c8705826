use std::str::FromStr;

use anyhow::{Context, Result};

const DEFAULT_AI_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
const DEFAULT_AI_MODEL: &str = "google/gemini-2.5-flash";

/// Application configuration loaded from environment variables.
/// Built once at startup and shared through `AppState`; nothing reads the
/// environment at request time.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub ai_gateway_url: String,
    pub ai_gateway_api_key: String,
    pub ai_model: String,
    pub ai_timeout_secs: u64,
    /// Extra attempts after the first completion call. Zero means a single call.
    pub completion_max_retries: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let ai_gateway_api_key = require_env("AI_GATEWAY_API_KEY")
            .or_else(|_| require_env("LOVABLE_API_KEY"))
            .context("Set AI_GATEWAY_API_KEY (or LOVABLE_API_KEY) for the completion gateway")?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 10)?,
            supabase_url: require_env("SUPABASE_URL")?
                .trim_end_matches('/')
                .to_string(),
            supabase_service_key: require_env("SUPABASE_SERVICE_ROLE_KEY")?,
            ai_gateway_url: optional_env("AI_GATEWAY_URL", DEFAULT_AI_GATEWAY_URL),
            ai_gateway_api_key,
            ai_model: optional_env("AI_MODEL", DEFAULT_AI_MODEL),
            ai_timeout_secs: parse_env("AI_GATEWAY_TIMEOUT_SECS", 60)?,
            completion_max_retries: parse_env("COMPLETION_MAX_RETRIES", 0)?,
            port: parse_env("PORT", 8080)?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_accepts_port() {
        let port: u16 = parse_value("PORT", "9090").unwrap();
        assert_eq!(port, 9090);
    }

    #[test]
    fn test_parse_value_trims_whitespace() {
        let retries: u32 = parse_value("COMPLETION_MAX_RETRIES", " 2 ").unwrap();
        assert_eq!(retries, 2);
    }

    #[test]
    fn test_parse_value_rejects_out_of_range_port() {
        let err = parse_value::<u16>("PORT", "70000").unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        assert!(parse_value::<u64>("AI_GATEWAY_TIMEOUT_SECS", "soon").is_err());
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value: u32 = parse_env("RECOMMENDER_TEST_SURELY_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }
}
