use std::net::SocketAddr;

use anyhow::{bail, Context};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Lifetime of a session: token `exp` and cookie `Max-Age` both derive from it.
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub cookie_secure: bool,
    pub cors_origins: Vec<String>,
    pub bind_addr: SocketAddr,
}

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:7070,http://dev.local";
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;
/// One year.
pub const MAX_SESSION_TTL_MINUTES: i64 = 365 * 24 * 60;

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "inkpost".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "inkpost-users".into()),
            ttl_minutes: parse_ttl_minutes(std::env::var("SESSION_TTL_MINUTES").ok().as_deref())?,
        };
        let cookie_secure = std::env::var("COOKIE_SECURE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into()),
        );
        let bind_addr = parse_bind_addr(
            &std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            &std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into()),
        )?;
        Ok(Self {
            database_url,
            jwt,
            cookie_secure,
            cors_origins,
            bind_addr,
        })
    }
}

/// Unset means the default; anything outside `1..=MAX_SESSION_TTL_MINUTES` is a startup error.
fn parse_ttl_minutes(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_SESSION_TTL_MINUTES);
    };
    let minutes: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("SESSION_TTL_MINUTES is not an integer: {raw:?}"))?;
    if !(1..=MAX_SESSION_TTL_MINUTES).contains(&minutes) {
        bail!("SESSION_TTL_MINUTES must be between 1 and {MAX_SESSION_TTL_MINUTES}, got {minutes}");
    }
    Ok(minutes)
}

fn parse_bind_addr(host: &str, port: &str) -> anyhow::Result<SocketAddr> {
    format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid APP_HOST/APP_PORT: {host}:{port}"))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_split_and_trimmed() {
        let origins = parse_origins(" http://a.test , ,http://b.test");
        assert_eq!(origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn default_origins_parse() {
        assert_eq!(parse_origins(DEFAULT_CORS_ORIGINS).len(), 2);
    }

    #[test]
    fn session_ttl_defaults_and_accepts_range() {
        assert_eq!(parse_ttl_minutes(None).unwrap(), DEFAULT_SESSION_TTL_MINUTES);
        assert_eq!(parse_ttl_minutes(Some("90")).unwrap(), 90);
        assert_eq!(
            parse_ttl_minutes(Some(&MAX_SESSION_TTL_MINUTES.to_string())).unwrap(),
            MAX_SESSION_TTL_MINUTES
        );
    }

    #[test]
    fn session_ttl_out_of_range_is_rejected() {
        assert!(parse_ttl_minutes(Some("0")).is_err());
        assert!(parse_ttl_minutes(Some("-5")).is_err());
        assert!(parse_ttl_minutes(Some("abc")).is_err());
        assert!(parse_ttl_minutes(Some(&(MAX_SESSION_TTL_MINUTES + 1).to_string())).is_err());
        assert!(parse_ttl_minutes(Some(&(i64::MAX / 2).to_string())).is_err());
    }

    #[test]
    fn bind_addr_from_host_and_port() {
        let addr = parse_bind_addr("127.0.0.1", "9090").unwrap();
        assert_eq!(addr.port(), 9090);
        assert!(addr.ip().is_loopback());
        assert!(parse_bind_addr("0.0.0.0", "http").is_err());
    }
}
