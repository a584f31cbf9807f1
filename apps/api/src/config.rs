use anyhow::{Context, Result};

const DEFAULT_MAX_NEW_BULLETS: u32 = 5;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    /// Optional override of the Messages API endpoint.
    pub anthropic_api_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Applied when a generate request leaves `maxNewBullets` unset.
    pub max_new_bullets: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            anthropic_api_url: std::env::var("ANTHROPIC_API_URL").ok(),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_new_bullets: parse_env("TAILOR_MAX_NEW_BULLETS", DEFAULT_MAX_NEW_BULLETS)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let value: u32 = parse_env("TAILOR_TEST_UNSET_VARIABLE", 7).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("TAILOR_TEST_BAD_PORT", "eighty");
        let result: Result<u16> = parse_env("TAILOR_TEST_BAD_PORT", 8080);
        assert!(result.is_err());
        std::env::remove_var("TAILOR_TEST_BAD_PORT");
    }
}
