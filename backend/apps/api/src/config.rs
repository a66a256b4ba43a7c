//! Server Configuration
//!
//! Read once at startup from the process environment (after `.env` is loaded).

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::{Context, anyhow, bail};
use auth::AuthConfig;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_TOKEN_TTL: &str = "7d";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` runs on the in-process store
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub bind_addr: IpAddr,
    pub port: u16,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), cfg!(debug_assertions))
    }

    /// `dev_mode` allows a missing `JWT_SECRET`
    pub fn from_lookup<F>(lookup: F, dev_mode: bool) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is not a number: {raw}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let port = match var("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT is not a valid port: {raw}"))?,
            None => DEFAULT_PORT,
        };

        let bind_addr = match var("BIND_ADDR") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("BIND_ADDR is not an IP address: {raw}"))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let token_ttl_raw = var("JWT_EXPIRES_IN").unwrap_or_else(|| DEFAULT_TOKEN_TTL.to_owned());
        let token_ttl = parse_duration(&token_ttl_raw)
            .ok_or_else(|| anyhow!("JWT_EXPIRES_IN is not a duration: {token_ttl_raw}"))?;

        let mut auth = match var("JWT_SECRET") {
            Some(secret) => AuthConfig {
                token_secret: secret.into_bytes(),
                ..AuthConfig::default()
            },
            None if dev_mode => {
                tracing::warn!("JWT_SECRET not set, using a random secret for this process");
                AuthConfig::with_random_secret()
            }
            None => bail!("JWT_SECRET must be set in production"),
        };
        auth.token_ttl = token_ttl;
        auth.password_pepper = var("PASSWORD_PEPPER").map(String::into_bytes);

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_owned())
            .split(',')
            .map(|origin| origin.trim().to_owned())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url: var("DATABASE_URL"),
            database_max_connections,
            bind_addr,
            port,
            frontend_origins,
            auth,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

/// `"90"`, `"90s"`, `"15m"`, `"12h"`, `"7d"`
fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (digits, unit) = match raw.char_indices().last()? {
        (i, c) if c.is_ascii_alphabetic() => (&raw[..i], c.to_ascii_lowercase()),
        _ => (raw, 's'),
    };

    let amount: u64 = digits.trim().parse().ok()?;
    let seconds = match unit {
        's' => amount,
        'm' => amount.checked_mul(60)?,
        'h' => amount.checked_mul(3600)?,
        'd' => amount.checked_mul(86_400)?,
        _ => return None,
    };
    (seconds > 0).then(|| Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("7d"), Some(Duration::from_secs(604_800)));
        assert_eq!(parse_duration("12h"), Some(Duration::from_secs(43_200)));
        assert_eq!(parse_duration("15m"), Some(Duration::from_secs(900)));
        assert_eq!(parse_duration("90"), Some(Duration::from_secs(90)));
        assert_eq!(parse_duration("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("0"), None);
        assert_eq!(parse_duration("7w"), None);
        assert_eq!(parse_duration("soon"), None);
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn test_defaults_in_dev_mode() {
        let config = AppConfig::from_lookup(lookup(&[]), true).unwrap();

        assert!(config.database_url.is_none());
        assert_eq!(config.port, 3000);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
        assert_eq!(config.auth.token_ttl, Duration::from_secs(604_800));
        assert_eq!(config.auth.token_secret.len(), 32);
        assert_eq!(
            config.frontend_origins,
            vec!["http://localhost:5173", "http://127.0.0.1:5173"]
        );
    }

    #[test]
    fn test_secret_required_outside_dev_mode() {
        assert!(AppConfig::from_lookup(lookup(&[]), false).is_err());

        let config =
            AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s3cret"), ("PORT", "8080")]), false)
                .unwrap();
        assert_eq!(config.auth.token_secret, b"s3cret");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_values_fail() {
        assert!(AppConfig::from_lookup(lookup(&[("PORT", "eighty")]), true).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("JWT_EXPIRES_IN", "forever")]), true).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("BIND_ADDR", "localhost")]), true).is_err());
    }
}
