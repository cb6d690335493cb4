//! Configuration management for the sync server

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:8000",
    "http://localhost:3000",
    "http://127.0.0.1:8000",
    "http://127.0.0.1:3000",
];

/// Batches carry whole client-side blobs, so allow far more than axum's 2 MiB
const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    /// Largest accepted request body, in bytes
    pub max_body_bytes: usize,
}

#[derive(Clone)]
pub struct AuthConfig {
    /// Shared bearer secret expected on every `/api/sync` request
    pub token: String,
}

// Keep the secret out of debug output and logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig").field("token", &"<redacted>").finish()
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("SYNC_AUTH_TOKEN must be set to a non-empty value")]
    MissingAuthToken,

    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Invalid listen address {0}")]
    InvalidAddress(String),
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8420,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            url: "sqlite:./sync.db".to_string(),
            max_connections: 5,
        }
    }
}

impl Config {
    /// Build a configuration with defaults for everything except the token
    pub fn with_token(token: impl Into<String>) -> Self {
        Config {
            server: ServerConfig::default(),
            auth: AuthConfig {
                token: token.into(),
            },
            database: DatabaseConfig::default(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("SYNC_AUTH_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingAuthToken)?;

        let server_defaults = ServerConfig::default();
        let db_defaults = DatabaseConfig::default();

        Ok(Config {
            server: ServerConfig {
                host: lookup("SYNC_HOST").unwrap_or(server_defaults.host),
                port: parse_var(&lookup, "SYNC_PORT", server_defaults.port)?,
                cors_origins: match lookup("SYNC_CORS_ORIGINS") {
                    Some(raw) => raw
                        .split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect(),
                    None => server_defaults.cors_origins,
                },
                max_body_bytes: parse_var(
                    &lookup,
                    "SYNC_MAX_BODY_BYTES",
                    server_defaults.max_body_bytes,
                )?,
            },
            auth: AuthConfig { token },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").unwrap_or(db_defaults.url),
                max_connections: parse_var(
                    &lookup,
                    "SYNC_DB_MAX_CONNECTIONS",
                    db_defaults.max_connections,
                )?,
            },
        })
    }

    /// Socket address the server binds to
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.server.host, self.server.port);
        raw.parse().map_err(|_| ConfigError::InvalidAddress(raw))
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        None => Ok(default),
    }
}
