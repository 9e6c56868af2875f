use anyhow::Result;
use std::sync::Arc;

use crate::config::ValidationResult;
use crate::Config;

/// Main application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
    validation: ValidationResult,
}

impl App {
    /// Create a new application instance from the on-disk config
    pub fn new() -> Result<Self> {
        let (config, validation) = Config::load_validated()?;
        Ok(Self {
            config: Arc::new(config),
            validation,
        })
    }

    /// Create an application instance around an already-built config
    pub fn with_config(config: Config) -> Result<Self> {
        let validation = config.validate();
        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }
        Ok(Self {
            config: Arc::new(config),
            validation,
        })
    }

    /// Prepare the config directory the local store lives in
    pub fn initialize(&mut self) -> Result<()> {
        tracing::info!(
            "Initializing application in {}",
            self.config.config_dir.display()
        );

        std::fs::create_dir_all(&self.config.config_dir)?;

        if !self.config.weather.has_api_key() {
            tracing::warn!("No OpenWeatherMap API key configured; lookups will fail");
        }

        tracing::info!("Application initialized successfully");
        Ok(())
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the config for long-lived services
    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }

    /// Warnings collected while validating the config
    pub fn warnings(&self) -> &[crate::config::ConfigValidationError] {
        &self.validation.warnings
    }
}
