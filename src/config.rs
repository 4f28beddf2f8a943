// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup into a typed
//! [`Config`] struct.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `ENV` | Environment (`development` or `production`) | `development` |
//! | `DATA_DIR` | Directory for the embedded wallet database | `/data` |
//! | `STELLAR_HORIZON_URL` | Horizon endpoint | `https://horizon-testnet.stellar.org` |
//! | `STELLAR_NETWORK` | `testnet` or `mainnet` | `testnet` |
//! | `FRIENDBOT_URL` | Friendbot funding endpoint (testnet) | `https://horizon-testnet.stellar.org/friendbot` |
//! | `ENCRYPTION_KEY` | 32-byte key for seed encryption | Required |
//! | `JWT_SECRET` | HMAC signing secret | dev default |
//! | `JWT_EXPIRATION` | Token lifetime (`24h`, `30m`, `900s`) | `24h` |
//! | `JWT_ISSUER` | Expected `iss` claim | `quasarflow-api` |
//! | `API_BASE_URL` | Public base URL; its host is the challenge domain | `http://localhost:8080` |
//! | `ALLOWED_ORIGINS` | Comma-separated CORS origins | localhost defaults |
//! | `CSP_CONNECT_SOURCES` | Extra CSP `connect-src` entries | Horizon endpoints |
//! | `CHALLENGE_TTL` | Ownership challenge lifetime | `5m` |
//! | `RATE_LIMIT_REQUESTS_PER_SECOND` | Token bucket refill rate | `100` |
//! | `RATE_LIMIT_BURST` | Token bucket capacity | `200` |
//! | `RATE_LIMIT_CLEANUP_INTERVAL` | Idle-client eviction interval | `10m` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::time::Duration;

/// Environment variable name for the wallet database directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind host.
    pub host: String,
    /// Server bind port.
    pub port: u16,
    /// Deployment environment (`development` or `production`).
    pub environment: String,
    /// Directory holding the embedded wallet database.
    pub data_dir: String,

    /// Horizon endpoint used by the ledger client.
    pub horizon_url: String,
    /// Stellar network this deployment targets.
    pub network: String,
    /// Friendbot endpoint for testnet funding.
    pub friendbot_url: String,

    /// Raw 32-byte key for AES-256-GCM seed encryption.
    pub encryption_key: String,
    /// HMAC secret for JWT signing.
    pub jwt_secret: String,
    /// Token lifetime.
    pub jwt_expiration: Duration,
    /// Expected `iss` claim on every token.
    pub jwt_issuer: String,

    /// Public base URL of this API; the host part binds challenges to
    /// this service so they cannot be replayed against another one.
    pub api_base_url: String,
    /// CORS allowed origins.
    pub allowed_origins: Vec<String>,
    /// Additional CSP `connect-src` entries.
    pub csp_connect_sources: Vec<String>,

    /// Lifetime of an issued ownership challenge.
    pub challenge_ttl: Duration,

    /// Token bucket refill rate per client.
    pub rate_limit_requests_per_second: f64,
    /// Token bucket capacity per client.
    pub rate_limit_burst: u32,
    /// Interval between idle-client eviction sweeps.
    pub rate_limit_cleanup_interval: Duration,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Fails only when a required variable (`ENCRYPTION_KEY`) is missing
    /// or a value cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let encryption_key = env::var("ENCRYPTION_KEY")
            .map_err(|_| ConfigError::MissingRequired("ENCRYPTION_KEY"))?;

        Ok(Self {
            host: get_env("HOST", "0.0.0.0"),
            port: get_env("PORT", "8080")
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT"))?,
            environment: get_env("ENV", "development"),
            data_dir: get_env(DATA_DIR_ENV, "/data"),

            horizon_url: get_env("STELLAR_HORIZON_URL", "https://horizon-testnet.stellar.org"),
            network: get_env("STELLAR_NETWORK", "testnet"),
            friendbot_url: get_env(
                "FRIENDBOT_URL",
                "https://horizon-testnet.stellar.org/friendbot",
            ),

            encryption_key,
            jwt_secret: get_env("JWT_SECRET", "default-jwt-secret-change-in-production"),
            jwt_expiration: parse_duration(&get_env("JWT_EXPIRATION", "24h"))
                .ok_or(ConfigError::Invalid("JWT_EXPIRATION"))?,
            jwt_issuer: get_env("JWT_ISSUER", "quasarflow-api"),

            api_base_url: get_env("API_BASE_URL", "http://localhost:8080"),
            allowed_origins: get_env_list(
                "ALLOWED_ORIGINS",
                &["http://localhost:3000", "http://localhost:8080"],
            ),
            csp_connect_sources: get_env_list(
                "CSP_CONNECT_SOURCES",
                &[
                    "https://horizon-testnet.stellar.org",
                    "https://horizon.stellar.org",
                ],
            ),

            challenge_ttl: parse_duration(&get_env("CHALLENGE_TTL", "5m"))
                .ok_or(ConfigError::Invalid("CHALLENGE_TTL"))?,

            rate_limit_requests_per_second: get_env("RATE_LIMIT_REQUESTS_PER_SECOND", "100")
                .parse()
                .map_err(|_| ConfigError::Invalid("RATE_LIMIT_REQUESTS_PER_SECOND"))?,
            rate_limit_burst: get_env("RATE_LIMIT_BURST", "200")
                .parse()
                .map_err(|_| ConfigError::Invalid("RATE_LIMIT_BURST"))?,
            rate_limit_cleanup_interval: parse_duration(&get_env(
                "RATE_LIMIT_CLEANUP_INTERVAL",
                "10m",
            ))
            .ok_or(ConfigError::Invalid("RATE_LIMIT_CLEANUP_INTERVAL"))?,
        })
    }

    /// Whether HSTS headers should be emitted. Tied to the environment so
    /// local HTTP development does not pin browsers to HTTPS.
    pub fn hsts_enabled(&self) -> bool {
        self.environment == "production"
    }

    /// The domain embedded in ownership challenges: the host of
    /// `api_base_url`, falling back to the raw string if it does not parse.
    pub fn challenge_domain(&self) -> String {
        url::Url::parse(&self.api_base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| self.api_base_url.clone())
    }
}

/// Configuration loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingRequired(&'static str),

    #[error("environment variable {0} has an invalid value")]
    Invalid(&'static str),
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_list(key: &str, default: &[&str]) -> Vec<String> {
    match env::var(key) {
        Ok(value) => value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => default.iter().map(|s| s.to_string()).collect(),
    }
}

/// Parse a duration string with an `s`, `m`, or `h` suffix.
/// A bare number is treated as seconds.
fn parse_duration(value: &str) -> Option<Duration> {
    let value = value.trim();
    let (number, multiplier) = match value.chars().last()? {
        'h' => (&value[..value.len() - 1], 3600),
        'm' => (&value[..value.len() - 1], 60),
        's' => (&value[..value.len() - 1], 1),
        _ => (value, 1),
    };
    let amount: u64 = number.parse().ok()?;
    Some(Duration::from_secs(amount * multiplier))
}

/// A fixed configuration for unit tests across the crate.
#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 8080,
        environment: "development".to_string(),
        data_dir: "/tmp".to_string(),
        horizon_url: "https://horizon-testnet.stellar.org".to_string(),
        network: "testnet".to_string(),
        friendbot_url: "https://horizon-testnet.stellar.org/friendbot".to_string(),
        encryption_key: "0123456789abcdef0123456789abcdef".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_expiration: Duration::from_secs(3600),
        jwt_issuer: "quasarflow-api".to_string(),
        api_base_url: "http://localhost:8080".to_string(),
        allowed_origins: vec!["http://localhost:3000".to_string()],
        csp_connect_sources: vec!["https://horizon-testnet.stellar.org".to_string()],
        challenge_ttl: Duration::from_secs(300),
        rate_limit_requests_per_second: 100.0,
        rate_limit_burst: 200,
        rate_limit_cleanup_interval: Duration::from_secs(600),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_supports_suffixes() {
        assert_eq!(parse_duration("24h"), Some(Duration::from_secs(86400)));
        assert_eq!(parse_duration("10m"), Some(Duration::from_secs(600)));
        assert_eq!(parse_duration("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("45"), Some(Duration::from_secs(45)));
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration(""), None);
    }

    #[test]
    fn challenge_domain_extracts_host() {
        let mut config = test_config();
        config.api_base_url = "https://api.example.com:8443/base".to_string();
        assert_eq!(config.challenge_domain(), "api.example.com");

        config.api_base_url = "not a url".to_string();
        assert_eq!(config.challenge_domain(), "not a url");
    }

    #[test]
    fn hsts_only_in_production() {
        let mut config = test_config();
        assert!(!config.hsts_enabled());
        config.environment = "production".to_string();
        assert!(config.hsts_enabled());
    }
}
