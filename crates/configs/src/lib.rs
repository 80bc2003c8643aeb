//! # configs
//!
//! Layered settings: `config/default.toml`, then `config/local.toml`, then
//! `SHOWCASE__SECTION__KEY` environment variables (after `.env` is loaded).
//! Every field has a default, so an empty environment yields a runnable
//! in-memory server.

use std::net::SocketAddr;
use std::path::PathBuf;

use config::{Config, Environment, File};
use domains::ApprovalPolicy;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseBackend {
    #[default]
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaBackend {
    #[default]
    Inline,
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiBackend {
    #[default]
    Heuristic,
    Http,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerSettings {
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("server address: {e}")))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub backend: DatabaseBackend,
    /// e.g. `sqlite://data/showcase.db?mode=rwc`
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
    pub backend: MediaBackend,
    pub root: PathBuf,
    pub url_prefix: String,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self {
            backend: MediaBackend::Inline,
            root: PathBuf::from("./data/uploads"),
            url_prefix: "/media".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    pub backend: AiBackend,
    pub endpoint: Option<String>,
    pub api_key: Option<SecretString>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModerationSettings {
    pub approval: ApprovalPolicy,
    /// When set, admin routes require a matching `x-admin-token` header.
    pub admin_token: Option<SecretString>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub format: LogFormat,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub media: MediaSettings,
    pub ai: AiSettings,
    pub moderation: ModerationSettings,
    pub log: LogSettings,
    /// Seed the sample builds into an empty store at startup.
    pub seed_samples: bool,
}

impl Settings {
    /// Loads `.env`, the config files and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }

        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("SHOWCASE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.backend == DatabaseBackend::Sqlite && self.database.url.is_none() {
            return Err(ConfigError::Invalid(
                "database.url is required for the sqlite backend".into(),
            ));
        }
        if self.ai.backend == AiBackend::Http && self.ai.endpoint.is_none() {
            return Err(ConfigError::Invalid(
                "ai.endpoint is required for the http backend".into(),
            ));
        }
        if self.media.backend == MediaBackend::Local && self.media.url_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "media.url_prefix is required for the local backend".into(),
            ));
        }
        self.server.addr()?;
        Ok(())
    }
}
