//! Configuration loader and validator for the report tool.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub app: App,
    pub apaleo: Apaleo,
}

/// Run-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct App {
    /// Upper bound on concurrent revenue requests.
    pub workers: usize,
    /// Per-request timeout applied to every API call.
    pub timeout_seconds: u64,
    pub output_dir: String,
}

/// apaleo endpoints. Credentials are never read from here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Apaleo {
    pub identity_url: String,
    pub api_url: String,
}

impl App {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: App {
                workers: 10,
                timeout_seconds: 10,
                output_dir: ".".into(),
            },
            apaleo: Apaleo {
                identity_url: "https://identity.apaleo.com/".into(),
                api_url: "https://api.apaleo.com/".into(),
            },
        }
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, the built-in defaults are used.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let cfg = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            serde_yaml::from_str(&content)?
        }
        None => Config::default(),
    };
    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.app.workers == 0 {
        return Err(ConfigError::Invalid("app.workers must be > 0"));
    }
    if cfg.app.timeout_seconds == 0 {
        return Err(ConfigError::Invalid("app.timeout_seconds must be > 0"));
    }
    if cfg.app.output_dir.trim().is_empty() {
        return Err(ConfigError::Invalid("app.output_dir must be non-empty"));
    }
    if reqwest::Url::parse(&cfg.apaleo.identity_url).is_err() {
        return Err(ConfigError::Invalid("apaleo.identity_url must be an absolute URL"));
    }
    if reqwest::Url::parse(&cfg.apaleo.api_url).is_err() {
        return Err(ConfigError::Invalid("apaleo.api_url must be an absolute URL"));
    }
    Ok(())
}

/// Example YAML matching `Config::default()`.
pub fn example() -> &'static str {
    r#"app:
  workers: 10
  timeout_seconds: 10
  output_dir: "."

apaleo:
  identity_url: "https://identity.apaleo.com/"
  api_url: "https://api.apaleo.com/"
"#
}
