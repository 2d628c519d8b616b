/// Configuration for the Pulse core service.
///
/// Loaded from environment variables. Token secrets are required; everything
/// else has defaults that match the original deployment.
use anyhow::{Context, Result};

/// Both access and refresh lifetimes default to 7 days; override per
/// environment with the TTL variables below.
const DEFAULT_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// HS256 secret for access tokens
    pub access_token_secret: String,
    /// HS256 secret for refresh tokens (must differ from the access secret)
    pub refresh_token_secret: String,
    /// Access token lifetime in seconds
    pub access_token_ttl_secs: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_ttl_secs: i64,
    /// Postgres URL, when the sqlx repositories are used
    pub database_url: Option<String>,
    /// Redis URL, when the shared refresh-token registry is used
    pub redis_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let access_token_secret = std::env::var("PULSE_ACCESS_TOKEN_SECRET")
            .context("PULSE_ACCESS_TOKEN_SECRET environment variable not set")?;
        let refresh_token_secret = std::env::var("PULSE_REFRESH_TOKEN_SECRET")
            .context("PULSE_REFRESH_TOKEN_SECRET environment variable not set")?;

        if access_token_secret == refresh_token_secret {
            anyhow::bail!("access and refresh token secrets must be distinct");
        }

        Ok(Self {
            access_token_secret,
            refresh_token_secret,
            access_token_ttl_secs: env_i64("PULSE_ACCESS_TOKEN_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?,
            refresh_token_ttl_secs: env_i64(
                "PULSE_REFRESH_TOKEN_TTL_SECS",
                DEFAULT_TOKEN_TTL_SECS,
            )?,
            database_url: std::env::var("DATABASE_URL").ok(),
            redis_url: std::env::var("REDIS_URL").ok(),
        })
    }
}

fn env_i64(name: &str, default: i64) -> Result<i64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<i64>()
            .with_context(|| format!("{} must be an integer, got {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}
