pub mod app;
pub mod config;
pub mod error;

pub use app::App;
pub use config::{Config, StorageConfig, UiConfig, ValidationResult, WeatherConfig};
pub use error::{AppError, NetworkError, ReqwestErrorExt, StorageError, WeatherError};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Logs go to stderr so they never interleave with rendered cards
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("SkyCards core initialized");
    Ok(())
}
