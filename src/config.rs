use actix_web::cookie::Key;
use std::fmt;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_APP_NAME: &str = "Rendezvous";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 8;

/// Which seed set to load on startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Production,
    Staging,
}

impl AppEnv {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "prod" | "production" => Some(AppEnv::Production),
            "staging" | "dev" | "development" => Some(AppEnv::Staging),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "Missing required environment variable {key}"),
            ConfigError::Invalid { key, value } => write!(f, "Invalid value for {key}: '{value}'"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Runtime configuration, read from the environment (and `.env` via dotenvy).
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub session_key: Key,
    pub app_env: AppEnv,
    pub app_name: String,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. `from_env` passes the
    /// process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let app_env = match lookup("APP_ENV") {
            Some(v) => AppEnv::parse(&v).ok_or(ConfigError::Invalid { key: "APP_ENV", value: v })?,
            None => AppEnv::Production,
        };

        let app_name = lookup("APP_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or(ConfigError::Invalid { key: "DB_MAX_CONNECTIONS", value: v })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let session_key = session_key_from(lookup("SESSION_KEY"));

        Ok(Self { database_url, bind_addr, session_key, app_env, app_name, max_connections })
    }
}

/// Session encryption key. A SESSION_KEY of 64+ bytes keeps sessions valid
/// across restarts; anything else falls back to a random key.
pub fn session_key_from(value: Option<String>) -> Key {
    match value {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    }
}
