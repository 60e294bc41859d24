use crate::sender::{ClientConfig, DEFAULT_ENDPOINT};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Environment error: {0}")]
    EnvError(String),
    #[error("Logging initialization failed: {0}")]
    LoggingInit(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(ConfigError::EnvError(format!("Invalid LOG_LEVEL: {s}"))),
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(author, version, about, long_about = None)]
#[serde(default)]
pub struct Config {
    /// Customer token embedded in the collector path
    #[arg(long, env = "LOGGLY_TOKEN", default_value = "", hide_env_values = true)]
    pub token: String,

    /// Collector base URL
    #[arg(long, env = "LOGGLY_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Tags attached to every event (comma separated)
    #[arg(long = "default-tags", env = "LOGGLY_TAGS", value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Request timeout in seconds
    #[arg(long, env = "LOGGLY_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[arg(long, env = "LOGGLY_CONNECTION_TIMEOUT_SECS", default_value = "10")]
    pub connection_timeout_secs: u64,

    /// User-Agent sent with every request
    #[arg(long, env = "LOGGLY_USER_AGENT", default_value = concat!("loggly-shipper/", env!("CARGO_PKG_VERSION")))]
    pub user_agent: String,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Configuration file path (optional)
    #[arg(long, env = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Derived fields (not CLI arguments)
    #[serde(skip)]
    #[arg(skip)]
    pub timeout: Duration,

    #[serde(skip)]
    #[arg(skip)]
    pub connection_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            tags: Vec::new(),
            timeout_secs: 30,
            connection_timeout_secs: 10,
            user_agent: format!("loggly-shipper/{}", env!("CARGO_PKG_VERSION")),
            log_level: LogLevel::Info,
            config_file: None,
            timeout: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
        }
    }
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let mut config = Config::try_parse_from(args)
            .map_err(|e| ConfigError::InvalidConfig(e.to_string()))?;
        config.post_process();
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(inline) = std::env::var("LOGGLY_CONFIG") {
            return Self::from_toml_str(&inline);
        }

        let mut config = Config::default();

        load_env_string("LOGGLY_TOKEN", &mut config.token);
        load_env_string("LOGGLY_ENDPOINT", &mut config.endpoint);
        if let Ok(tags) = std::env::var("LOGGLY_TAGS") {
            config.tags = split_tags(&tags);
        }
        load_env_var("LOGGLY_TIMEOUT_SECS", &mut config.timeout_secs)?;
        load_env_var(
            "LOGGLY_CONNECTION_TIMEOUT_SECS",
            &mut config.connection_timeout_secs,
        )?;
        load_env_string("LOGGLY_USER_AGENT", &mut config.user_agent);
        load_env_var("LOG_LEVEL", &mut config.log_level)?;
        if let Ok(path) = std::env::var("CONFIG_FILE") {
            config.config_file = Some(PathBuf::from(path));
        }

        config.post_process();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content)?;
        config.post_process();
        config.validate()?;
        Ok(config)
    }

    /// Replace this config with the contents of `config_file`, when one is set.
    pub fn resolve(self) -> Result<Self, ConfigError> {
        match &self.config_file {
            Some(path) => Self::from_file(path),
            None => Ok(self),
        }
    }

    pub fn post_process(&mut self) {
        self.timeout = Duration::from_secs(self.timeout_secs);
        self.connection_timeout = Duration::from_secs(self.connection_timeout_secs);
        self.tags = self
            .tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();
    }

    /// The token is deliberately not checked here: an empty token is reported
    /// per event as a configuration error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.endpoint).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid endpoint URL '{}': {}", self.endpoint, e))
        })?;

        if url.cannot_be_a_base() {
            return Err(ConfigError::InvalidUrl(format!(
                "Endpoint URL '{}' cannot carry a path",
                self.endpoint
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        if self.connection_timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "Connection timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            endpoint: self.endpoint.clone(),
            token: self.token.clone(),
            tags: self.tags.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            connection_timeout: Duration::from_secs(self.connection_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

/// Load and parse an environment variable, keeping the default when unset.
fn load_env_var<T>(name: &str, target: &mut T) -> Result<(), ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(value) = std::env::var(name) {
        *target = value
            .parse()
            .map_err(|e| ConfigError::EnvError(format!("Invalid {name}: {e}")))?;
    }
    Ok(())
}

fn load_env_string(name: &str, target: &mut String) {
    if let Ok(value) = std::env::var(name) {
        *target = value;
    }
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
