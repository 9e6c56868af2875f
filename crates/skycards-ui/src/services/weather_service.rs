//! Weather backend: async suggestion lookups.
//! Network work runs on spawned tasks; results come back over the shell's
//! event channel tagged with the generation they were issued under.

use std::sync::Arc;
use std::time::Duration;

use skycards_core::{NetworkError, ReqwestErrorExt};
use skycards_weather::{rank_suggestions, Suggestion, WeatherProvider};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use super::UiEvent;

/// Error type for weather operations
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherError {
    Network(NetworkError),
    NotFound(String),
    InvalidApiKey,
    EmptyQuery,
    NoSuggestion(usize),
}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherError::Network(e) => write!(f, "Weather error: {}", e),
            WeatherError::NotFound(s) => write!(f, "Location not found: {}", s),
            WeatherError::InvalidApiKey => write!(f, "Weather API key rejected"),
            WeatherError::EmptyQuery => write!(f, "Nothing to search for"),
            WeatherError::NoSuggestion(n) => write!(f, "No suggestion number {}", n),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<skycards_weather::WeatherError> for WeatherError {
    fn from(e: skycards_weather::WeatherError) -> Self {
        use skycards_weather::WeatherError as Provider;
        match e {
            Provider::Network(e) => WeatherError::Network(e.into_network_error()),
            Provider::LocationNotFound(q) => WeatherError::NotFound(q),
            Provider::InvalidApiKey => WeatherError::InvalidApiKey,
            Provider::InvalidQuery(_) => WeatherError::EmptyQuery,
            Provider::Status { status, message } => {
                WeatherError::Network(NetworkError::ServerError { status, message })
            }
            Provider::Parse(s) => WeatherError::Network(NetworkError::InvalidResponse(s)),
        }
    }
}

/// Messages sent from async operations back to the shell
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Ranked suggestions for `query`, issued as `generation`
    SuggestionsDone {
        generation: u64,
        query: String,
        result: Result<Vec<Suggestion>, WeatherError>,
    },
}

/// Geocode `query` and rank the matches down to `limit` suggestions
pub async fn fetch_suggestions(
    provider: &WeatherProvider,
    query: &str,
    limit: usize,
) -> Result<Vec<Suggestion>, WeatherError> {
    let candidates = provider.fetch_suggestions(query).await?;
    tracing::debug!("Geocoder returned {} candidates for {}", candidates.len(), query);
    Ok(rank_suggestions(candidates, query, limit))
}

/// Wait out `delay`, then look up suggestions and send `SuggestionsDone`.
/// Aborting the returned handle before the delay elapses cancels the lookup.
pub fn request_suggestions(
    tx: &UnboundedSender<UiEvent>,
    provider: Arc<WeatherProvider>,
    query: String,
    generation: u64,
    delay: Duration,
    limit: usize,
) -> JoinHandle<()> {
    let tx = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        let result = fetch_suggestions(&provider, &query, limit).await;
        if let Err(e) = &result {
            tracing::error!("Geocoding error: {}", e);
        }

        let _ = tx.send(UiEvent::Weather(WeatherServiceMessage::SuggestionsDone {
            generation,
            query,
            result,
        }));
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weather_error_display() {
        assert!(format!("{}", WeatherError::Network(NetworkError::Timeout)).contains("timed out"));
        assert!(format!("{}", WeatherError::NotFound("Atlantis".into())).contains("Atlantis"));
        assert!(format!("{}", WeatherError::NoSuggestion(7)).contains('7'));
    }

    #[test]
    fn provider_errors_map_to_ui_errors() {
        use skycards_weather::WeatherError as Provider;
        assert_eq!(
            WeatherError::from(Provider::LocationNotFound("x".into())),
            WeatherError::NotFound("x".into())
        );
        assert_eq!(WeatherError::from(Provider::InvalidApiKey), WeatherError::InvalidApiKey);
        assert_eq!(
            WeatherError::from(Provider::Status {
                status: 500,
                message: "boom".into()
            }),
            WeatherError::Network(NetworkError::ServerError {
                status: 500,
                message: "boom".into()
            })
        );
        assert!(matches!(
            WeatherError::from(Provider::Parse("eof".into())),
            WeatherError::Network(NetworkError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn client_timeout_is_kept_as_timeout() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let provider = WeatherProvider::new(skycards_weather::ProviderOptions {
            api_key: "test-key".into(),
            base_url: server.uri(),
            units: skycards_weather::Units::Metric,
            timeout: Duration::from_millis(200),
        })
        .unwrap();

        let err = fetch_suggestions(&provider, "Lon", 5).await.unwrap_err();
        assert_eq!(err, WeatherError::Network(NetworkError::Timeout));
    }
}
