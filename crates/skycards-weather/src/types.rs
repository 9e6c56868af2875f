use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit system requested from the API (`units=` query parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
            Self::Standard => "standard",
        }
    }

    /// Suffix for temperatures in this unit system
    pub fn temperature_symbol(&self) -> &'static str {
        match self {
            Self::Metric => "°C",
            Self::Imperial => "°F",
            Self::Standard => "K",
        }
    }

    /// Suffix for wind speeds in this unit system
    pub fn wind_symbol(&self) -> &'static str {
        match self {
            Self::Imperial => "mph",
            Self::Metric | Self::Standard => "m/s",
        }
    }
}

impl FromStr for Units {
    type Err = WeatherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            "standard" => Ok(Self::Standard),
            other => Err(WeatherError::InvalidQuery(format!("unknown units: {}", other))),
        }
    }
}

/// Identifier of a displayed/saved city: `"<cityName>-<countryCode>"`.
///
/// Joins the card deck, the rendered card and the persisted list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CityKey(String);

impl CityKey {
    pub fn new(name: &str, country: &str) -> Self {
        Self(format!("{}-{}", name, country))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split into `(name, country)` on the last `-`, so hyphenated city
    /// names like `Winston-Salem-US` keep their name intact.
    pub fn parts(&self) -> (&str, Option<&str>) {
        match self.0.rsplit_once('-') {
            Some((name, "")) if !name.is_empty() => (name, None),
            Some((name, country)) if !name.is_empty() => (name, Some(country)),
            _ => (self.0.as_str(), None),
        }
    }

    /// Free-text query that resolves this key again, country included
    pub fn replay_query(&self) -> String {
        match self.parts() {
            (name, Some(country)) => format!("{},{}", name, country),
            (name, None) => name.to_string(),
        }
    }
}

impl fmt::Display for CityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CityKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CityKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Geographic coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions as returned by `/data/2.5/weather`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub name: String,
    pub sys: SunAndCountry,
    pub main: Readings,
    pub wind: Wind,
    #[serde(default)]
    pub weather: Vec<ConditionText>,
    #[serde(default)]
    pub coord: Option<Coordinates>,
    /// Shift in seconds from UTC for the reported location
    #[serde(default)]
    pub timezone: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunAndCountry {
    #[serde(default)]
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u32,
    pub pressure: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionText {
    pub description: String,
    #[serde(default)]
    pub main: String,
}

impl WeatherRecord {
    pub fn city_key(&self) -> CityKey {
        CityKey::new(&self.name, &self.sys.country)
    }

    /// First condition description, or empty when the API sent none
    pub fn description(&self) -> &str {
        self.weather
            .first()
            .map(|w| w.description.as_str())
            .unwrap_or("")
    }

    fn offset(&self) -> FixedOffset {
        self.timezone
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }

    /// Sunrise in the location's own UTC offset
    pub fn sunrise_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::from_timestamp(self.sys.sunrise, 0).map(|t| t.with_timezone(&self.offset()))
    }

    /// Sunset in the location's own UTC offset
    pub fn sunset_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::from_timestamp(self.sys.sunset, 0).map(|t| t.with_timezone(&self.offset()))
    }
}

/// One row of `/geo/1.0/direct`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoCandidate {
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl GeoCandidate {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Location not found: {0}")]
    LocationNotFound(String),
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("API returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn london() -> WeatherRecord {
        serde_json::from_value(serde_json::json!({
            "coord": {"lon": -0.1257, "lat": 51.5085},
            "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d"}],
            "main": {"temp": 14.6, "feels_like": 14.1, "temp_min": 13.0, "temp_max": 15.9, "pressure": 1012, "humidity": 77},
            "wind": {"speed": 4.63, "deg": 240},
            "sys": {"country": "GB", "sunrise": 1697609520, "sunset": 1697647380},
            "timezone": 3600,
            "name": "London"
        }))
        .unwrap()
    }

    #[test]
    fn test_record_parses_api_shape() {
        let record = london();
        assert_eq!(record.name, "London");
        assert_eq!(record.sys.country, "GB");
        assert_eq!(record.main.humidity, 77);
        assert_eq!(record.description(), "broken clouds");
        assert_eq!(record.coord.map(|c| c.lat), Some(51.5085));
    }

    #[test]
    fn test_city_key_from_record() {
        assert_eq!(london().city_key().as_str(), "London-GB");
    }

    #[test]
    fn test_description_empty_without_conditions() {
        let mut record = london();
        record.weather.clear();
        assert_eq!(record.description(), "");
    }

    #[test]
    fn test_sunrise_uses_location_offset() {
        let record = london();
        // 1697609520 is 06:12 UTC; London is UTC+1 in October
        let sunrise = record.sunrise_at().unwrap();
        assert_eq!(sunrise.format("%H:%M").to_string(), "07:12");
    }

    #[test]
    fn test_city_key_parts_keep_hyphenated_names() {
        let key = CityKey::from("Winston-Salem-US");
        assert_eq!(key.parts(), ("Winston-Salem", Some("US")));
        assert_eq!(key.replay_query(), "Winston-Salem,US");
    }

    #[test]
    fn test_city_key_without_country() {
        let key = CityKey::from("Nowhere");
        assert_eq!(key.parts(), ("Nowhere", None));
        assert_eq!(key.replay_query(), "Nowhere");

        let dangling = CityKey::new("Atlantis", "");
        assert_eq!(dangling.replay_query(), "Atlantis");
    }

    #[test]
    fn test_units_from_str() {
        assert_eq!("Metric".parse::<Units>().unwrap(), Units::Metric);
        assert_eq!("imperial".parse::<Units>().unwrap(), Units::Imperial);
        assert!("kelvin".parse::<Units>().is_err());
        assert_eq!(Units::Imperial.temperature_symbol(), "°F");
        assert_eq!(Units::Metric.wind_symbol(), "m/s");
    }
}
