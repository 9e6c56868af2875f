use crate::services::weather_service::WeatherError as UiWeatherError;
use skycards_core::{AppError, WeatherError};

impl From<UiWeatherError> for AppError {
    fn from(e: UiWeatherError) -> Self {
        match e {
            UiWeatherError::Network(e) => AppError::Network(e),
            UiWeatherError::NotFound(s) => AppError::Weather(WeatherError::LocationNotFound(s)),
            UiWeatherError::InvalidApiKey => AppError::Weather(WeatherError::InvalidApiKey),
            UiWeatherError::EmptyQuery | UiWeatherError::NoSuggestion(_) => {
                AppError::Weather(WeatherError::LocationNotFound(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skycards_core::NetworkError;

    #[test]
    fn not_found_uses_status_line_text() {
        let app: AppError = UiWeatherError::NotFound("Atlantis".into()).into();
        assert_eq!(app.user_message(), "Error: Location not found");
    }

    #[test]
    fn rejected_key_points_at_settings() {
        let app: AppError = UiWeatherError::InvalidApiKey.into();
        assert!(app.user_message().contains("API key"));
    }

    #[test]
    fn network_failure_is_a_network_error() {
        let app: AppError =
            UiWeatherError::Network(NetworkError::ConnectionFailed("connection reset".into()))
                .into();
        assert!(matches!(app, AppError::Network(NetworkError::ConnectionFailed(_))));
        assert!(app.user_message().contains("Unable to connect"));
    }

    #[test]
    fn timeout_keeps_its_own_message() {
        let app: AppError = UiWeatherError::Network(NetworkError::Timeout).into();
        assert_eq!(app.user_message(), "The request timed out. Please try again.");
    }

    #[test]
    fn server_outage_says_try_later() {
        let app: AppError = UiWeatherError::Network(NetworkError::ServerError {
            status: 503,
            message: "down".into(),
        })
        .into();
        assert!(app.user_message().contains("later"));
    }
}
