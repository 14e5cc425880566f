use anyhow::Context;
use serde::Deserialize;

/// Used when `JWT_SECRET` is not set. Process-wide, never rotated.
pub const DEFAULT_JWT_SECRET: &str = "A very Secret Key";

/// One year. Larger lifetimes overflow token expiry arithmetic.
pub const MAX_JWT_TTL_MINUTES: i64 = 60 * 24 * 365;
const DEFAULT_JWT_TTL_MINUTES: i64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub url: String,
    pub pool_size: u32,
    pub recycle_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database: DbConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let database = DbConfig {
            url,
            pool_size: env_parse("DB_POOL_SIZE").unwrap_or(10),
            recycle_secs: env_parse("DB_POOL_RECYCLE_SECS").unwrap_or(300),
        };
        let server = ServerConfig {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parse("APP_PORT").unwrap_or(8000),
        };
        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ => {
                tracing::warn!("JWT_SECRET not set; signing tokens with the built-in default secret");
                DEFAULT_JWT_SECRET.into()
            }
        };
        let jwt = JwtConfig {
            secret,
            ttl_minutes: parse_ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok())?,
        };
        Ok(Self {
            database,
            server,
            jwt,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

fn parse_ttl_minutes(raw: Option<String>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_JWT_TTL_MINUTES);
    };
    let minutes: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("JWT_TTL_MINUTES must be an integer, got {raw:?}"))?;
    if !(1..=MAX_JWT_TTL_MINUTES).contains(&minutes) {
        anyhow::bail!("JWT_TTL_MINUTES must be between 1 and {MAX_JWT_TTL_MINUTES}, got {minutes}");
    }
    Ok(minutes)
}
