use kitchenbook_core::AdminMatch;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Directory holding one JSON file per stored collection
    pub data_dir: ConfigValue<PathBuf>,
    /// How users are matched against kitchen admin rosters
    pub admin_match: ConfigValue<AdminMatch>,
    /// Pantry items expiring within this many days are flagged
    pub expiry_warning_days: ConfigValue<i64>,
    /// Default log filter when RUST_LOG is not set
    pub log_level: ConfigValue<String>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    admin_match: Option<AdminMatch>,
    expiry_warning_days: Option<i64>,
    log_level: Option<String>,
}

pub const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 3;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut data_dir = ConfigValue::new(Self::default_data_dir(), ConfigSource::Default);
        let mut admin_match = ConfigValue::new(AdminMatch::default(), ConfigSource::Default);
        let mut expiry_warning_days =
            ConfigValue::new(DEFAULT_EXPIRY_WARNING_DAYS, ConfigSource::Default);
        let mut log_level = ConfigValue::new(DEFAULT_LOG_LEVEL.to_string(), ConfigSource::Default);
        let mut config_file = None;

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            if let Some(dir) = file_config.data_dir {
                // Relative paths are relative to the config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                data_dir = ConfigValue::new(resolved, ConfigSource::File);
            }
            if let Some(policy) = file_config.admin_match {
                admin_match = ConfigValue::new(policy, ConfigSource::File);
            }
            if let Some(days) = file_config.expiry_warning_days {
                expiry_warning_days = ConfigValue::new(days, ConfigSource::File);
            }
            if let Some(level) = file_config.log_level {
                log_level = ConfigValue::new(level, ConfigSource::File);
            }
        }

        if let Ok(dir) = std::env::var("KITCHEN_DATA_DIR") {
            data_dir = ConfigValue::new(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(policy) = std::env::var("KITCHEN_ADMIN_MATCH") {
            let policy = policy
                .parse()
                .map_err(|e| ConfigError::InvalidEnv("KITCHEN_ADMIN_MATCH", e))?;
            admin_match = ConfigValue::new(policy, ConfigSource::Environment);
        }
        if let Ok(days) = std::env::var("KITCHEN_EXPIRY_WARNING_DAYS") {
            let days = days.trim().parse().map_err(|_| {
                ConfigError::InvalidEnv(
                    "KITCHEN_EXPIRY_WARNING_DAYS",
                    format!("'{}' is not a whole number of days", days),
                )
            })?;
            expiry_warning_days = ConfigValue::new(days, ConfigSource::Environment);
        }
        if let Ok(level) = std::env::var("KITCHEN_LOG") {
            log_level = ConfigValue::new(level, ConfigSource::Environment);
        }

        Ok(Self {
            data_dir,
            admin_match,
            expiry_warning_days,
            log_level,
            config_file,
        })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/kitchenbook/
    /// - macOS: ~/Library/Application Support/kitchenbook/
    /// - Windows: %APPDATA%/kitchenbook/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kitchenbook")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/kitchenbook/
    /// - macOS: ~/Library/Application Support/kitchenbook/
    /// - Windows: %APPDATA%/kitchenbook/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kitchenbook")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidEnv(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::InvalidEnv(var, e) => write!(f, "Invalid {}: {}", var, e),
        }
    }
}

impl std::error::Error for ConfigError {}
