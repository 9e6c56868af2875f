use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides `weather.api_key`
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Values accepted by the OpenWeatherMap `units` parameter
pub const SUPPORTED_UNITS: [&str; 3] = ["metric", "imperial", "standard"];

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// OpenWeatherMap settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Shell and card deck preferences
    #[serde(default)]
    pub ui: UiConfig,

    /// Local key-value store settings
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key (`OPENWEATHER_API_KEY` wins when set)
    #[serde(default)]
    pub api_key: String,

    /// API root; every endpoint path is appended to it
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unit system passed as `units=`
    #[serde(default = "default_units")]
    pub units: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openweathermap.org".to_string()
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            units: default_units(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl WeatherConfig {
    /// Check if an API key is present (not empty, not a placeholder)
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.api_key.starts_with("YOUR_")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Cards shown per page
    pub page_size: usize,

    /// Suggestions shown after ranking
    pub suggestion_limit: usize,

    /// Quiet period before a suggestion lookup fires
    pub debounce_ms: u64,

    /// Status line lifetime
    pub status_clear_secs: u64,

    /// Heading style rotation interval
    pub font_rotation_ms: u64,

    /// Delay before the first page indicator refresh
    pub page_indicator_delay_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            suggestion_limit: 5,
            debounce_ms: 300,
            status_clear_secs: 5,
            font_rotation_ms: 300,
            page_indicator_delay_ms: 400,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// File inside `config_dir` holding the key-value store
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file_name: "storage.json".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("skycards");

        Self {
            config_dir,
            weather: WeatherConfig::default(),
            ui: UiConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing.
    /// The API key environment override is applied after reading.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.weather.api_key = key;
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);

        if !self.weather.has_api_key() {
            result.add_warning(
                "weather.api_key",
                format!("No API key configured - set {} or edit config.toml", API_KEY_ENV),
            );
        }

        if !SUPPORTED_UNITS.contains(&self.weather.units.trim().to_lowercase().as_str()) {
            result.add_error(
                "weather.units",
                format!(
                    "Units must be one of {}, got: {:?}",
                    SUPPORTED_UNITS.join(", "),
                    self.weather.units
                ),
            );
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if self.ui.page_size == 0 {
            result.add_error("ui.page_size", "Page size must be greater than 0");
        } else if self.ui.page_size > 100 {
            result.add_warning("ui.page_size", "Page size is unusually large (>100)");
        }

        if self.ui.suggestion_limit == 0 {
            result.add_error("ui.suggestion_limit", "Suggestion limit must be greater than 0");
        }

        if self.ui.font_rotation_ms == 0 {
            result.add_error("ui.font_rotation_ms", "Heading rotation period must be greater than 0");
        }

        if self.ui.status_clear_secs == 0 {
            result.add_warning(
                "ui.status_clear_secs",
                "Status messages will clear immediately (0 seconds)",
            );
        }

        if self.storage.file_name.trim().is_empty() {
            result.add_error("storage.file_name", "Storage file name must not be empty");
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if let Some(0) = url.port() {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Path of the key-value store file
    pub fn storage_path(&self) -> PathBuf {
        self.config_dir.join(&self.storage.file_name)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skycards");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        // Default config should be valid (only warnings, no errors)
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_missing_api_key_is_warning() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.api_key"));
    }

    #[test]
    fn test_placeholder_api_key_not_configured() {
        let mut config = Config::default();
        config.weather.api_key = "YOUR_API_KEY".to_string();
        assert!(!config.weather.has_api_key());
        config.weather.api_key = "abc123".to_string();
        assert!(config.weather.has_api_key());
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.weather.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.weather.base_url = "ftp://api.openweathermap.org".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_unknown_units() {
        let mut config = Config::default();
        config.weather.units = "kelvin".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.units"));
    }

    #[test]
    fn test_zero_page_size() {
        let mut config = Config::default();
        config.ui.page_size = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "ui.page_size"));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.ui.page_size, 10);
        assert_eq!(config.weather.units, "metric");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "config_dir = \"/tmp/skycards\"\n\n[weather]\napi_key = \"k\"\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.weather.api_key, "k");
        assert_eq!(config.weather.base_url, "https://api.openweathermap.org");
        assert_eq!(config.ui.debounce_ms, 300);
        assert_eq!(config.storage_path(), PathBuf::from("/tmp/skycards/storage.json"));
    }
}
