use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::HeaderValue;

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Absent means athletes are kept in memory
    pub database_url: Option<String>,
    pub cors_allowed_origin: HeaderValue,
    pub rate_limit: RateLimitConfig,
}

/// Global token bucket settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub capacity: u64,
    pub refill_amount: u64,
    pub refill_interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            capacity: 1000,
            refill_amount: 1000,
            refill_interval: Duration::from_secs(60),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: None,
            cors_allowed_origin: HeaderValue::from_static(DEFAULT_CORS_ORIGIN),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let rate_limit = RateLimitConfig {
            capacity: parse_var("RATE_LIMIT_CAPACITY", defaults.rate_limit.capacity)?,
            refill_amount: parse_var("RATE_LIMIT_REFILL_AMOUNT", defaults.rate_limit.refill_amount)?,
            refill_interval: Duration::from_secs(parse_var(
                "RATE_LIMIT_REFILL_SECS",
                defaults.rate_limit.refill_interval.as_secs(),
            )?),
        };

        let cors_allowed_origin = match std::env::var("CORS_ALLOWED_ORIGIN") {
            Ok(origin) => HeaderValue::from_str(&origin)
                .context("CORS_ALLOWED_ORIGIN must be a valid header value")?,
            Err(_) => defaults.cors_allowed_origin,
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            cors_allowed_origin,
            rate_limit,
        })
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number")),
        Err(_) => Ok(default),
    }
}
