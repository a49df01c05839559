//! Process configuration, read once from the environment and cached.

use std::{net::SocketAddr, str::FromStr};

use once_cell::sync::OnceCell;
use secrecy::SecretString;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_APP_NAME: &str = "ServiceMaster API";
pub const DEFAULT_VERSION: &str = "1.0.0";
pub const DEFAULT_ALGORITHM: &str = "HS256";
pub const DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES: u32 = 30;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

static SETTINGS: OnceCell<Settings> = OnceCell::new();

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("invalid listen address: {0}")]
    Address(#[from] std::net::AddrParseError),
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub app_name: String,
    pub version: String,
    pub database_url: String,
    pub secret_key: SecretString,
    pub algorithm: String,
    pub access_token_expire_minutes: u32,
    pub debug_mode: bool,
    pub host: String,
    pub port: u16,
}

impl Settings {
    /// Process-wide settings. The first call loads `.env` (if any) and the
    /// environment; later calls return the same instance.
    pub fn global() -> Result<&'static Settings, ConfigError> {
        SETTINGS.get_or_try_init(|| {
            if let Ok(path) = dotenvy::dotenv() {
                debug!(path = %path.display(), "loaded .env");
            }
            Self::from_env()
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup, applying defaults for
    /// every optional key.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        Ok(Self {
            app_name: lookup("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            version: lookup("VERSION").unwrap_or_else(|| DEFAULT_VERSION.to_string()),
            database_url: required("DATABASE_URL")?,
            secret_key: SecretString::from(required("SECRET_KEY")?),
            algorithm: lookup("ALGORITHM").unwrap_or_else(|| DEFAULT_ALGORITHM.to_string()),
            access_token_expire_minutes: parse_or(
                &lookup,
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                DEFAULT_ACCESS_TOKEN_EXPIRE_MINUTES,
            )?,
            debug_mode: parse_bool(&lookup, "DEBUG_MODE")?,
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
        })
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn parse_bool<F>(lookup: &F, key: &'static str) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid { key, value }),
    }
}
