//! # Application Configuration
//!
//! Loads the server configuration from a `config.yml` file layered with
//! environment variables. Top-level keys are overridden by their upper-case
//! environment names (`PORT`, `DB_URL`, ...); nested keys by
//! `DOPAMINE_...` variables (e.g. `DOPAMINE_YOUTUBE__API_KEY`).

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The path to the SQLite database file holding prediction history.
    #[serde(default = "default_db_url")]
    pub db_url: String,
    /// The path to the serialized classifier artifact.
    #[serde(default = "default_model_path")]
    pub model_path: String,
    /// Video platform API access. Without an API key the `/analyze-url`
    /// route reports a configuration error.
    #[serde(default)]
    pub youtube: YouTubeConfig,
    /// Streaming chat relay settings. Without an API key the `/chat` route
    /// reports a configuration error.
    #[serde(default)]
    pub chat: ChatConfig,
    /// SMTP settings for the passcode login mail. Optional; without it the
    /// `/send-otp` route reports a configuration error.
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

fn default_port() -> u16 {
    5000
}

fn default_db_url() -> String {
    "db/predictions.db".to_string()
}

fn default_model_path() -> String {
    "dopamine_model.json".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct YouTubeConfig {
    /// Overrides the public endpoint; used by tests to point at a mock.
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChatConfig {
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model_name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmtpConfig {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub from_email: String,
}

fn default_smtp_port() -> u16 {
    587
}

/// Loads the application configuration.
///
/// When `config_path_override` is `None`, `config.yml` next to the crate
/// manifest is used; the file is optional, in which case defaults plus
/// environment variables apply. An explicitly requested file must exist.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    match config_path_override {
        Some(path) => {
            if !std::path::Path::new(path).exists() {
                return Err(ConfigError::NotFound(format!(
                    "Config file not found at '{path}'."
                )));
            }
            builder = builder.add_source(File::new(path, FileFormat::Yaml));
        }
        None => {
            let default_path = format!("{}/config.yml", env!("CARGO_MANIFEST_DIR"));
            if std::path::Path::new(&default_path).exists() {
                builder = builder.add_source(File::new(&default_path, FileFormat::Yaml));
            }
        }
    }

    let settings = builder
        // Top-level keys like PORT and DB_URL.
        .add_source(Environment::default())
        // Prefixed variables for nested overrides.
        .add_source(
            Environment::with_prefix("DOPAMINE")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
