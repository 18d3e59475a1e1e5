use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

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

/// Connection settings for the message store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub server_url: String,
    pub timeout_secs: u64,
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Base URL of the message store
    pub server_url: ConfigValue<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: ConfigValue<u64>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    server_url: Option<String>,
    timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: ConfigValue::new(DEFAULT_SERVER_URL.to_string(), ConfigSource::Default),
            timeout_secs: ConfigValue::new(DEFAULT_TIMEOUT_SECS, ConfigSource::Default),
            config_file: None,
        }
    }
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            config.apply_file(path)?;
        }

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies the values present in a YAML config file.
    fn apply_file(&mut self, path: PathBuf) -> Result<(), ConfigError> {
        let contents =
            std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError(path.clone(), e))?;
        let file_config: ConfigFile = serde_yaml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

        if let Some(url) = file_config.server_url {
            self.server_url = ConfigValue::new(url, ConfigSource::File);
        }
        if let Some(secs) = file_config.timeout_secs {
            self.timeout_secs = ConfigValue::new(secs, ConfigSource::File);
        }
        self.config_file = Some(path);
        Ok(())
    }

    /// Applies `MSGSYNC_*` overrides read through `lookup`.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(url) = lookup("MSGSYNC_SERVER_URL") {
            self.server_url = ConfigValue::new(url, ConfigSource::Environment);
        }
        if let Some(raw) = lookup("MSGSYNC_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MSGSYNC_TIMEOUT_SECS", raw.clone()))?;
            self.timeout_secs = ConfigValue::new(secs, ConfigSource::Environment);
        }
        Ok(())
    }

    pub fn store(&self) -> StoreConfig {
        StoreConfig {
            server_url: self.server_url.value.clone(),
            timeout_secs: self.timeout_secs.value,
        }
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/msgsync/
    /// - macOS: ~/Library/Application Support/msgsync/
    /// - Windows: %APPDATA%/msgsync/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("msgsync")
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
    InvalidValue(&'static str, String),
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
            ConfigError::InvalidValue(key, value) => {
                write!(f, "Invalid value for {}: '{}'", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server_url.value, "http://localhost:8000");
        assert_eq!(config.server_url.source, ConfigSource::Default);
        assert_eq!(config.timeout_secs.value, 10);
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "server_url: http://store.local:9000").unwrap();
        writeln!(file, "timeout_secs: 3").unwrap();

        let mut config = Config::default();
        config.apply_file(config_path.clone()).unwrap();

        assert_eq!(config.server_url.value, "http://store.local:9000");
        assert_eq!(config.server_url.source, ConfigSource::File);
        assert_eq!(config.timeout_secs.value, 3);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_partial_file_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "timeout_secs: 30").unwrap();

        let mut config = Config::default();
        config.apply_file(config_path).unwrap();

        assert_eq!(config.server_url.source, ConfigSource::Default);
        assert_eq!(config.timeout_secs.value, 30);
        assert_eq!(config.timeout_secs.source, ConfigSource::File);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(|key| match key {
                "MSGSYNC_SERVER_URL" => Some("http://env:1234".to_string()),
                "MSGSYNC_TIMEOUT_SECS" => Some("25".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.server_url.value, "http://env:1234");
        assert_eq!(config.server_url.source, ConfigSource::Environment);
        assert_eq!(config.timeout_secs.value, 25);
        assert_eq!(config.timeout_secs.source, ConfigSource::Environment);
    }

    #[test]
    fn test_invalid_timeout_env() {
        let mut config = Config::default();
        let err = config
            .apply_env(|key| (key == "MSGSYNC_TIMEOUT_SECS").then(|| "soon".to_string()))
            .unwrap_err();

        assert!(err.to_string().contains("MSGSYNC_TIMEOUT_SECS"));
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_store_config() {
        let config = Config::default();
        assert_eq!(
            config.store(),
            StoreConfig {
                server_url: "http://localhost:8000".to_string(),
                timeout_secs: 10,
            }
        );
    }
}
