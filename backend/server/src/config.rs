use std::{env, fmt::Display, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub chat_token_interval: Duration,
    pub cors_max_age: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            port: try_load("RUST_PORT", "8080")?,
            chat_token_interval: Duration::from_millis(try_load("CHAT_TOKEN_INTERVAL_MS", "120")?),
            cors_max_age: Duration::from_secs(try_load("CORS_MAX_AGE_SECS", "3600")?),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            chat_token_interval: Duration::from_millis(120),
            cors_max_age: Duration::from_secs(60 * 60),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse(key, &raw)
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: Display,
{
    raw.trim()
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
            anyhow::anyhow!("{e}")
        })
        .with_context(|| format!("Environment misconfigured: {key}={raw}"))
}

#[cfg(test)]
mod tests {
    use super::parse;

    #[test]
    fn test_parse() {
        assert_eq!(parse::<u16>("RUST_PORT", " 3000 ").unwrap(), 3000);
        assert_eq!(parse::<u64>("CHAT_TOKEN_INTERVAL_MS", "0").unwrap(), 0);
    }

    #[test]
    fn test_parse_invalid() {
        let err = parse::<u16>("RUST_PORT", "99999").unwrap_err();
        assert!(err.to_string().contains("RUST_PORT=99999"));
    }
}
