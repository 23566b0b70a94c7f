use std::time::Duration;

use anyhow::{Context, Result};

use crate::onboarding::service::OnboardingConfig;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub port: u16,
    pub rust_log: String,
    pub db_max_connections: u32,
    /// Header carrying the identity-provider user id, set by the auth proxy.
    pub identity_header: String,
    pub invalidation_channel: String,
    pub onboarding_timeout_secs: u64,
    pub insight_refresh_days: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            redis_url: require_env("REDIS_URL")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 10)?,
            identity_header: std::env::var("IDENTITY_HEADER")
                .unwrap_or_else(|_| "x-user-id".to_string()),
            invalidation_channel: std::env::var("INVALIDATION_CHANNEL")
                .unwrap_or_else(|_| "cache:invalidate".to_string()),
            onboarding_timeout_secs: parse_env("ONBOARDING_TIMEOUT_SECS", 10)?,
            insight_refresh_days: parse_env("INSIGHT_REFRESH_DAYS", 7)?,
        })
    }

    pub fn onboarding(&self) -> OnboardingConfig {
        OnboardingConfig {
            transaction_timeout: Duration::from_secs(self.onboarding_timeout_secs),
            insight_refresh_interval: chrono::Duration::days(self.insight_refresh_days),
            ..OnboardingConfig::default()
        }
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
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
