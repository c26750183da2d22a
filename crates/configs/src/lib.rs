//! # configs
//!
//! Layered runtime settings for the `mins` server.
//!
//! Precedence, lowest first:
//! 1. built-in defaults
//! 2. `config/default.toml` (optional)
//! 3. `config/{MINS_ENV}.toml` (optional, `MINS_ENV` defaults to `development`)
//! 4. `MINS__SECTION__KEY` environment variables, after `.env` is loaded

use std::collections::HashMap;

use config::{Config, Environment, File};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "MINS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: &'static str },
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: SecretString,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// An `EnvFilter` directive, e.g. `info` or `api_adapters=debug,info`.
    pub level: String,
    pub json: bool,
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Settings {
    /// Reads `.env`, the optional TOML files and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        let profile = std::env::var("MINS_ENV").unwrap_or_else(|_| "development".into());
        Self::build(&profile, None)
    }

    /// Same layering as [`Settings::load`], with the environment layer read
    /// from `overrides` instead of the process when given.
    pub fn build(profile: &str, overrides: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let environment = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .source(overrides);

        let settings: Settings = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("database.url", "sqlite://mins.db")?
            .set_default("database.max_connections", 5)?
            .set_default("auth.jwt_secret", "")?
            .set_default("auth.access_ttl_secs", 300)?
            .set_default("auth.refresh_ttl_secs", 86_400)?
            .set_default("log.level", "info")?
            .set_default("log.json", false)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{profile}")).required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.expose_secret().trim().is_empty() {
            return Err(ConfigError::Invalid { key: "auth.jwt_secret", reason: "must not be empty" });
        }
        if self.auth.access_ttl_secs <= 0 {
            return Err(ConfigError::Invalid { key: "auth.access_ttl_secs", reason: "must be positive" });
        }
        if self.auth.refresh_ttl_secs <= 0 {
            return Err(ConfigError::Invalid { key: "auth.refresh_ttl_secs", reason: "must be positive" });
        }
        if self.database.url.is_empty() {
            return Err(ConfigError::Invalid { key: "database.url", reason: "must not be empty" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn defaults_apply_once_a_secret_is_set() {
        let settings = Settings::build("test", env(&[("MINS__AUTH__JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(settings.server.bind_address(), "127.0.0.1:8000");
        assert_eq!(settings.auth.access_ttl_secs, 300);
        assert_eq!(settings.auth.refresh_ttl_secs, 86_400);
        assert_eq!(settings.log.level, "info");
        assert!(!settings.log.json);
        assert_eq!(settings.auth.jwt_secret.expose_secret(), "s3cret");
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = Settings::build(
            "test",
            env(&[
                ("MINS__AUTH__JWT_SECRET", "s3cret"),
                ("MINS__SERVER__PORT", "9090"),
                ("MINS__DATABASE__URL", "sqlite::memory:"),
                ("MINS__LOG__JSON", "true"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.database.url, "sqlite::memory:");
        assert!(settings.log.json);
    }

    #[test]
    fn empty_secret_is_rejected() {
        let err = Settings::build("test", env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "auth.jwt_secret", .. }));
    }

    #[test]
    fn non_positive_ttl_is_rejected() {
        let err = Settings::build(
            "test",
            env(&[("MINS__AUTH__JWT_SECRET", "s3cret"), ("MINS__AUTH__ACCESS_TTL_SECS", "0")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "auth.access_ttl_secs", .. }));
    }

    #[test]
    fn secret_is_redacted_in_debug_output() {
        let settings = Settings::build("test", env(&[("MINS__AUTH__JWT_SECRET", "s3cret")])).unwrap();
        assert!(!format!("{settings:?}").contains("s3cret"));
    }
}
