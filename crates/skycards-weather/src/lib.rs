//! Weather lookups for SkyCards
//!
//! Current conditions and forward geocoding via the OpenWeatherMap API,
//! plus the query classification and suggestion ranking that sit in front
//! of it.

pub mod geocode;
pub mod provider;
pub mod query;
pub mod types;

pub use geocode::{rank_suggestions, Suggestion, SuggestionKind};
pub use provider::{ProviderOptions, WeatherProvider};
pub use query::Query;
pub use types::*;
