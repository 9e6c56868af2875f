//! Shared application services.
//!
//! `AppServices` owns everything the shell needs from the outside world:
//! the loaded configuration, the weather client, the local store, and the
//! shutdown signal that stops background timers.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use skycards_core::Config;
use skycards_weather::{ProviderOptions, Units, WeatherProvider};

use crate::storage::{FileStore, KeyValueStore};

pub struct AppServices {
    config: Arc<Config>,

    /// OpenWeatherMap client built from `[weather]`
    provider: Arc<WeatherProvider>,

    /// Backing store for saved cities and theme
    store: Arc<dyn KeyValueStore>,

    shutdown: CancellationToken,
}

impl AppServices {
    /// Build services with the file-backed store at `config.storage_path()`
    pub fn init(config: Arc<Config>) -> Result<Self> {
        let path = config.storage_path();
        tracing::info!("Local store at {}", path.display());
        Self::with_store(config, Arc::new(FileStore::new(path)))
    }

    /// Build services around an existing store
    pub fn with_store(config: Arc<Config>, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let units: Units = config
            .weather
            .units
            .parse()
            .context("Invalid weather.units")?;

        let provider = WeatherProvider::new(ProviderOptions {
            api_key: config.weather.api_key.clone(),
            base_url: config.weather.base_url.clone(),
            units,
            timeout: Duration::from_secs(config.weather.request_timeout_secs),
        })
        .context("Failed to create weather client")?;

        tracing::info!(
            "Weather client initialized with base_url: {}",
            config.weather.base_url
        );

        Ok(Self {
            config,
            provider: Arc::new(provider),
            store,
            shutdown: CancellationToken::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn provider(&self) -> Arc<WeatherProvider> {
        self.provider.clone()
    }

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    /// Token cancelled by [`AppServices::shutdown`]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    pub fn shutdown(&self) {
        tracing::info!("AppServices shutdown initiated");
        self.shutdown.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn builds_from_default_config() {
        let services =
            AppServices::with_store(Arc::new(Config::default()), Arc::new(MemoryStore::new()))
                .unwrap();
        assert_eq!(services.provider().units(), Units::Metric);
        assert_eq!(services.config().ui.page_size, 10);
    }

    #[test]
    fn rejects_unknown_units() {
        let mut config = Config::default();
        config.weather.units = "kelvin".to_string();
        let result = AppServices::with_store(Arc::new(config), Arc::new(MemoryStore::new()));
        assert!(result.is_err());
    }

    #[test]
    fn shutdown_cancels_token() {
        let services =
            AppServices::with_store(Arc::new(Config::default()), Arc::new(MemoryStore::new()))
                .unwrap();
        let token = services.shutdown_token();
        services.shutdown();
        assert!(token.is_cancelled());
    }

    #[test]
    fn init_uses_file_store_in_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            config_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let services = AppServices::init(Arc::new(config)).unwrap();
        services.store().set_item("theme", "dark").unwrap();
        assert!(dir.path().join("storage.json").exists());
    }
}
