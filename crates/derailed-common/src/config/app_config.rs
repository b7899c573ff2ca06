//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub gateway: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub snowflake: SnowflakeConfig,
    pub heartbeat: HeartbeatConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Listening socket configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Token signing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_token_expiry")]
    pub token_expiry: i64,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

/// Heartbeat timing
///
/// Each connection picks its interval uniformly from
/// `[min_interval_ms, max_interval_ms]` and is closed if
/// `interval + grace_ms` elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HeartbeatConfig {
    #[serde(default = "default_heartbeat_min")]
    pub min_interval_ms: u64,
    #[serde(default = "default_heartbeat_max")]
    pub max_interval_ms: u64,
    #[serde(default = "default_heartbeat_grace")]
    pub grace_ms: u64,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_heartbeat_min(),
            max_interval_ms: default_heartbeat_max(),
            grace_ms: default_heartbeat_grace(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "derailed-gateway".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_token_expiry() -> i64 {
    2_592_000 // 30 days
}

fn default_heartbeat_min() -> u64 {
    42_000
}

fn default_heartbeat_max() -> u64 {
    48_000
}

fn default_heartbeat_grace() -> u64 {
    2_000
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env: lookup("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            gateway: ServerConfig {
                host: lookup("GATEWAY_HOST").unwrap_or_else(default_host),
                port: parse_var(&lookup, "GATEWAY_PORT")?
                    .ok_or(ConfigError::MissingVar("GATEWAY_PORT"))?,
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var(&lookup, "DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            },
            jwt: JwtConfig {
                secret: lookup("JWT_SECRET").ok_or(ConfigError::MissingVar("JWT_SECRET"))?,
                token_expiry: parse_var(&lookup, "JWT_TOKEN_EXPIRY")?
                    .unwrap_or_else(default_token_expiry),
            },
            snowflake: SnowflakeConfig {
                worker_id: parse_var(&lookup, "WORKER_ID")?.unwrap_or(0),
            },
            heartbeat: HeartbeatConfig {
                min_interval_ms: parse_var(&lookup, "HEARTBEAT_MIN_INTERVAL_MS")?
                    .unwrap_or_else(default_heartbeat_min),
                max_interval_ms: parse_var(&lookup, "HEARTBEAT_MAX_INTERVAL_MS")?
                    .unwrap_or_else(default_heartbeat_max),
                grace_ms: parse_var(&lookup, "HEARTBEAT_GRACE_MS")?
                    .unwrap_or_else(default_heartbeat_grace),
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.heartbeat.min_interval_ms > self.heartbeat.max_interval_ms {
            return Err(ConfigError::InvalidValue(
                "HEARTBEAT_MIN_INTERVAL_MS",
                format!(
                    "{} exceeds HEARTBEAT_MAX_INTERVAL_MS ({})",
                    self.heartbeat.min_interval_ms, self.heartbeat.max_interval_ms
                ),
            ));
        }
        if self.snowflake.worker_id >= 1024 {
            return Err(ConfigError::InvalidValue(
                "WORKER_ID",
                self.snowflake.worker_id.to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse `key` if it is set; a value that does not parse is an error
fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.parse().map_err(|_| ConfigError::InvalidValue(key, v)))
        .transpose()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
