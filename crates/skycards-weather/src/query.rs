//! Classification of free-form search text into one of the three
//! `/data/2.5/weather` lookups.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::Coordinates;

/// Country used for bare five-digit ZIP lookups
pub const ZIP_COUNTRY: &str = "US";

static COORDS_RE: OnceLock<Regex> = OnceLock::new();
static ZIP_RE: OnceLock<Regex> = OnceLock::new();

#[allow(clippy::expect_used)]
fn coords_re() -> &'static Regex {
    COORDS_RE.get_or_init(|| {
        Regex::new(r"^(-?[0-9]+\.?[0-9]*),\s*(-?[0-9]+\.?[0-9]*)$").expect("coordinate pattern is valid")
    })
}

#[allow(clippy::expect_used)]
fn zip_re() -> &'static Regex {
    ZIP_RE.get_or_init(|| Regex::new(r"^[0-9]{5}$").expect("zip pattern is valid"))
}

/// True for exactly five ASCII digits
pub fn is_zip(text: &str) -> bool {
    zip_re().is_match(text)
}

/// A resolved search request
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Coordinates(Coordinates),
    Zip { zip: String, country: String },
    City(String),
}

impl Query {
    /// Classify trimmed search text. Coordinates win over ZIP, ZIP over city.
    pub fn classify(text: &str) -> Self {
        let text = text.trim();

        if let Some(caps) = coords_re().captures(text) {
            let lat = caps[1].parse::<f64>();
            let lon = caps[2].parse::<f64>();
            if let (Ok(lat), Ok(lon)) = (lat, lon) {
                return Self::Coordinates(Coordinates { lat, lon });
            }
        }

        if is_zip(text) {
            return Self::Zip {
                zip: text.to_string(),
                country: ZIP_COUNTRY.to_string(),
            };
        }

        Self::City(text.to_string())
    }

    /// Short form used in logs
    pub fn describe(&self) -> String {
        match self {
            Self::Coordinates(c) => format!("coords {},{}", c.lat, c.lon),
            Self::Zip { zip, country } => format!("zip {},{}", zip, country),
            Self::City(name) => format!("city {}", name),
        }
    }
}

impl From<Coordinates> for Query {
    fn from(c: Coordinates) -> Self {
        Self::Coordinates(c)
    }
}
