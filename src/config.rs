use crate::ai_sql::config::CompletionSettings;
use crate::ai_sql::error::{AiError, AiResult};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    #[default]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

fn default_file_output() -> bool {
    true
}

fn default_log_file_name() -> String {
    "aisql.log".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    /// Write logs to a file in the config directory; stderr otherwise
    #[serde(default = "default_file_output")]
    pub file_output: bool,
    #[serde(default = "default_log_file_name")]
    pub file_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file_output: default_file_output(),
            file_name: default_log_file_name(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub completion: CompletionSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// `$HOME/.config/aisql`
    pub fn get_config_dir() -> io::Result<PathBuf> {
        home_dir()
            .map(|home| home.join(".config").join("aisql"))
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Home directory not found"))
    }

    pub fn default_config_path() -> io::Result<PathBuf> {
        Ok(Self::get_config_dir()?.join("config.toml"))
    }

    /// Load from `path`, or from the default location when `path` is None.
    ///
    /// A missing default file yields the defaults; a missing explicit file,
    /// an unreadable file or invalid TOML is a startup error.
    pub fn load(path: Option<&Path>) -> AiResult<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_config_path() {
                Ok(path) => (path, false),
                Err(_) => return Ok(Self::default()),
            },
        };

        if !explicit && !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            AiError::StartupConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_toml(&contents)
            .map_err(|e| AiError::StartupConfig(format!("Invalid config file {}: {}", path.display(), e)))
    }

    pub fn from_toml(contents: &str) -> Result<Self, String> {
        let config: Config = toml::from_str(contents).map_err(|e| e.to_string())?;
        config.completion.validate()?;
        Ok(config)
    }
}
