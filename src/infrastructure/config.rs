//! Runtime configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `TUSERS_*` environment variables. Command-line flags go on top through
//! [`Config::apply_overrides`] before calling [`Config::validate`].

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const ENV_BASE_URL: &str = "TUSERS_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "TUSERS_TIMEOUT_SECS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Settings for the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the API; `/users` is appended to it
    pub base_url: String,
    /// Whole-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connection establishment timeout in seconds
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            connect_timeout_secs: 5,
            user_agent: format!("tusers/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Config {
    /// Loads defaults, the optional file at `path`, and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`load`](Self::load), reading environment variables through `lookup`.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Parses a TOML file. Missing keys keep their defaults.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use tusers::infrastructure::Config;
    ///
    /// let config = Config::from_file(Path::new("tusers.toml")).unwrap();
    /// println!("{}", config.base_url);
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies `TUSERS_*` overrides looked up through `lookup`.
    ///
    /// `TUSERS_TIMEOUT_SECS` sets the request timeout.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.request_timeout_secs = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: ENV_TIMEOUT_SECS.to_string(),
                message: format!("expected a whole number of seconds, got {:?}", raw),
            })?;
        }
        Ok(())
    }

    /// Applies command-line flags, which win over every other source.
    pub fn apply_overrides(&mut self, base_url: Option<String>, timeout_secs: Option<u64>) {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if let Some(timeout_secs) = timeout_secs {
            self.request_timeout_secs = timeout_secs;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "base_url".to_string(),
                message: format!("must start with http:// or https://, got {:?}", self.base_url),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "request_timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "connect_timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
