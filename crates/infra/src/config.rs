//! Configuration loading and representation.
//!
//! Everything comes from environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `BIND_ADDR` | `0.0.0.0:8080` | HTTP listen address |
//! | `JWT_SECRET` | insecure dev secret | HS256 secret for session tokens |
//! | `USE_PERSISTENT_STORES` | `false` | Use Postgres instead of in-memory stores |
//! | `DATABASE_URL` | none | Required when `USE_PERSISTENT_STORES=true` |
//! | `DATABASE_MAX_CONNECTIONS` | `10` | Pool size |
//! | `SEED_DEMO_CATALOG` | `true` | Stock an empty catalog with demo products |

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEV_JWT_SECRET: &str = "dev-secret";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has invalid value '{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    /// `true` when `JWT_SECRET` was not provided and the dev default is in use.
    pub using_dev_jwt_secret: bool,
    /// `Some` when persistent stores are enabled.
    pub database: Option<DatabaseConfig>,
    pub seed_demo_catalog: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map instead of the env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "BIND_ADDR",
                value: bind_addr.clone(),
                reason: e.to_string(),
            })?;

        let (jwt_secret, using_dev_jwt_secret) = match get("JWT_SECRET") {
            Some(secret) => (secret, false),
            None => (DEV_JWT_SECRET.to_string(), true),
        };

        let use_persistent =
            parse_bool("USE_PERSISTENT_STORES", get("USE_PERSISTENT_STORES"), false)?;
        let database = if use_persistent {
            let url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
            let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
                Some(raw) => raw
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| ConfigError::Invalid {
                        key: "DATABASE_MAX_CONNECTIONS",
                        value: raw.clone(),
                        reason: "expected a positive integer".to_string(),
                    })?,
                None => DEFAULT_MAX_CONNECTIONS,
            };
            Some(DatabaseConfig {
                url,
                max_connections,
            })
        } else {
            None
        };

        let seed_demo_catalog =
            parse_bool("SEED_DEMO_CATALOG", get("SEED_DEMO_CATALOG"), true)?;

        Ok(Self {
            bind_addr,
            jwt_secret,
            using_dev_jwt_secret,
            database,
            seed_demo_catalog,
        })
    }
}

fn parse_bool(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .to_ascii_lowercase()
            .parse::<bool>()
            .map_err(|e| ConfigError::Invalid {
                key,
                value,
                reason: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_are_in_memory_dev_settings() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert!(config.using_dev_jwt_secret);
        assert_eq!(config.database, None);
        assert!(config.seed_demo_catalog);
    }

    #[test]
    fn persistent_stores_require_a_database_url() {
        let err = config_from(&[("USE_PERSISTENT_STORES", "true")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn persistent_config_is_read() {
        let config = config_from(&[
            ("USE_PERSISTENT_STORES", "TRUE"),
            ("DATABASE_URL", "postgres://localhost/freshcart"),
            ("DATABASE_MAX_CONNECTIONS", "4"),
            ("JWT_SECRET", "s3cret"),
            ("SEED_DEMO_CATALOG", "false"),
            ("BIND_ADDR", "127.0.0.1:3000"),
        ])
        .unwrap();

        assert_eq!(
            config.database,
            Some(DatabaseConfig {
                url: "postgres://localhost/freshcart".to_string(),
                max_connections: 4,
            })
        );
        assert_eq!(config.jwt_secret, "s3cret");
        assert!(!config.using_dev_jwt_secret);
        assert!(!config.seed_demo_catalog);
        assert_eq!(config.bind_addr.port(), 3000);
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(matches!(
            config_from(&[("BIND_ADDR", "not-an-address")]),
            Err(ConfigError::Invalid { key: "BIND_ADDR", .. })
        ));
        assert!(matches!(
            config_from(&[("SEED_DEMO_CATALOG", "maybe")]),
            Err(ConfigError::Invalid { key: "SEED_DEMO_CATALOG", .. })
        ));
        assert!(matches!(
            config_from(&[
                ("USE_PERSISTENT_STORES", "true"),
                ("DATABASE_URL", "postgres://localhost/freshcart"),
                ("DATABASE_MAX_CONNECTIONS", "0"),
            ]),
            Err(ConfigError::Invalid { key: "DATABASE_MAX_CONNECTIONS", .. })
        ));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config_from(&[("JWT_SECRET", "  "), ("BIND_ADDR", "")]).unwrap();
        assert!(config.using_dev_jwt_secret);
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
    }
}
