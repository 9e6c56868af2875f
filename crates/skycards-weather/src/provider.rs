//! OpenWeatherMap HTTP client: forward geocoding plus the three
//! current-weather lookups (city name, ZIP, coordinates).

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::geocode::GEOCODE_LIMIT;
use crate::query::Query;
use crate::types::{GeoCandidate, Units, WeatherError, WeatherRecord};

pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";
const GEOCODE_PATH: &str = "/geo/1.0/direct";
const WEATHER_PATH: &str = "/data/2.5/weather";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Settings for building a [`WeatherProvider`]
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    pub api_key: String,
    pub base_url: String,
    pub units: Units,
    pub timeout: Duration,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: OPENWEATHER_BASE_URL.to_string(),
            units: Units::default(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
    units: Units,
}

impl WeatherProvider {
    pub fn new(options: ProviderOptions) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(options.timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            api_key: options.api_key,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            units: options.units,
        })
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Up to ten raw geocoding matches for `query`, unranked.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_suggestions(&self, query: &str) -> Result<Vec<GeoCandidate>, WeatherError> {
        let params = [
            ("q", query.to_string()),
            ("limit", GEOCODE_LIMIT.to_string()),
        ];
        self.get_json(GEOCODE_PATH, &params, query).await
    }

    #[instrument(skip(self), level = "info")]
    pub async fn fetch_by_city(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
        self.get_weather(&[("q", city.to_string())], city).await
    }

    #[instrument(skip(self), level = "info")]
    pub async fn fetch_by_zip(&self, zip: &str, country: &str) -> Result<WeatherRecord, WeatherError> {
        let zip_param = format!("{},{}", zip, country);
        self.get_weather(&[("zip", zip_param.clone())], &zip_param)
            .await
    }

    #[instrument(skip(self), level = "info")]
    pub async fn fetch_by_coords(&self, lat: f64, lon: f64) -> Result<WeatherRecord, WeatherError> {
        self.get_weather(
            &[("lat", lat.to_string()), ("lon", lon.to_string())],
            &format!("{},{}", lat, lon),
        )
        .await
    }

    /// Issue exactly one weather request for a classified query
    pub async fn resolve(&self, query: &Query) -> Result<WeatherRecord, WeatherError> {
        match query {
            Query::Coordinates(c) => self.fetch_by_coords(c.lat, c.lon).await,
            Query::Zip { zip, country } => self.fetch_by_zip(zip, country).await,
            Query::City(name) if name.is_empty() => {
                Err(WeatherError::InvalidQuery("empty search".to_string()))
            }
            Query::City(name) => self.fetch_by_city(name).await,
        }
    }

    async fn get_weather(
        &self,
        params: &[(&str, String)],
        what: &str,
    ) -> Result<WeatherRecord, WeatherError> {
        let mut params = params.to_vec();
        params.push(("units", self.units.as_param().to_string()));
        self.get_json(WEATHER_PATH, &params, what).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        what: &str,
    ) -> Result<T, WeatherError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::debug!("{} returned {} for {}: {}", path, status, what, message);
            return Err(match status {
                StatusCode::NOT_FOUND => WeatherError::LocationNotFound(what.to_string()),
                StatusCode::UNAUTHORIZED => WeatherError::InvalidApiKey,
                _ => WeatherError::Status {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!("Unexpected response shape from {}: {}", path, e);
            WeatherError::Parse(e.to_string())
        })
    }
}
