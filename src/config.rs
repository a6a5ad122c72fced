//! Layered application configuration.
//!
//! Sources, later ones winning: built-in defaults, an optional YAML file,
//! the plain `API_HOST`, `API_PORT`, and `DATABASE_URL` variables, then
//! `TASKTRACK__SECTION__KEY` variables (for example
//! `TASKTRACK__MIRROR__ENABLED=false`).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix of structured environment overrides.
pub const ENV_PREFIX: &str = "TASKTRACK__";

/// Plain environment variables and the keys they set.
const LEGACY_ENV: [(&str, &str); 3] = [
    ("API_HOST", "server.host"),
    ("API_PORT", "server.port"),
    ("DATABASE_URL", "database.url"),
];

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    #[error("invalid configuration: {0}")]
    Load(Box<figment::Error>),

    /// The configured host and port do not form a socket address.
    #[error("invalid listen address '{0}'")]
    ListenAddress(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Resolves the listen address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ListenAddress`] when `host` is not an IP
    /// address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::ListenAddress(raw))
    }
}

/// `PostgreSQL` settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,
    /// Pool size.
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection.
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/tasktrack".to_owned(),
            max_connections: 10,
            connect_timeout_secs: 5,
        }
    }
}

impl DatabaseConfig {
    /// Pool checkout timeout.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Mirror log settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Whether mutations are mirrored at all.
    pub enabled: bool,
    /// Directory holding `users.jsonl` and `tasks.jsonl`.
    pub dir: PathBuf,
    /// Seed an empty store from the log at startup.
    pub replay_on_empty: bool,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("mirror"),
            replay_on_empty: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Pretty,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Record store.
    pub database: DatabaseConfig,
    /// Mirror log.
    pub mirror: MirrorConfig,
    /// Logging.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads defaults, then `config_path` if given, then the environment.
    ///
    /// A missing file is an error only when a path was given explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when the file cannot be parsed or a
    /// value has the wrong type.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Yaml::file_exact(path));
        }
        let config = figment
            .merge(legacy_env())
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }

    /// Serializes the effective configuration as YAML-compatible JSON.
    ///
    /// # Errors
    ///
    /// Returns the encoder error; the config types always serialize.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn legacy_env() -> Env {
    Env::raw()
        .only(&LEGACY_ENV.map(|(var, _)| var))
        .map(|var| {
            LEGACY_ENV
                .iter()
                .find(|(name, _)| var.as_str().eq_ignore_ascii_case(name))
                .map_or_else(|| var.as_str().into(), |(_, key)| (*key).into())
        })
}
