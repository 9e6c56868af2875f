//! The card deck: ordered, deduplicated weather cards with pagination.
//!
//! Order is explicit here (index 0 is the front of the deck); the renderer
//! only ever draws `visible()`. The key list mirrors the persisted saved
//! list and keeps first-insertion order, which reordering never touches.

use skycards_weather::{CityKey, Units, WeatherRecord};

use crate::saved_cities::SavedCities;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Lower-cased descriptions with a dedicated icon
const WEATHER_ICONS: [(&str, &str); 10] = [
    ("clear sky", "sunny"),
    ("scattered clouds", "cloudy"),
    ("broken clouds", "partly-cloudy"),
    ("overcast clouds", "cloudy"),
    ("shower rain", "rain"),
    ("rain", "rain"),
    ("light rain", "rain"),
    ("thunderstorm", "thunderstorm"),
    ("snow", "snow"),
    ("mist", "rain"),
];

/// Icon id for a weather description. Unmapped descriptions come back
/// lower-cased and unchanged.
pub fn icon_for(description: &str) -> String {
    let key = description.to_lowercase();
    WEATHER_ICONS
        .iter()
        .find(|(d, _)| *d == key)
        .map(|(_, icon)| icon.to_string())
        .unwrap_or(key)
}

/// JS-style `Math.round`: halves go towards positive infinity
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Values that are patched in place when a city is refreshed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFields {
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    pub daylight: String,
}

impl CardFields {
    pub fn from_record(record: &WeatherRecord, units: Units) -> Self {
        let degrees = units.temperature_symbol();
        let clock = |t: Option<chrono::DateTime<chrono::FixedOffset>>| {
            t.map(|t| t.format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".to_string())
        };

        Self {
            temperature: format!("{}{}", round_half_up(record.main.temp), degrees),
            feels_like: format!("{}{}", round_half_up(record.main.feels_like), degrees),
            humidity: format!("{}%", record.main.humidity),
            wind: format!("{} {}", record.wind.speed, units.wind_symbol()),
            pressure: format!("{} hPa", record.main.pressure),
            daylight: format!(
                "{} - {}",
                clock(record.sunrise_at()),
                clock(record.sunset_at())
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub key: CityKey,
    /// `"London, GB"`
    pub title: String,
    pub description: String,
    pub icon: String,
    pub fields: CardFields,
}

impl Card {
    fn new(key: CityKey, record: &WeatherRecord, units: Units) -> Self {
        Self {
            key,
            title: format!("{}, {}", record.name, record.sys.country),
            description: record.description().to_string(),
            icon: icon_for(record.description()),
            fields: CardFields::from_record(record, units),
        }
    }
}

/// Outcome of [`WeatherDisplay::add_or_update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardChange {
    Added,
    Updated,
}

pub struct WeatherDisplay {
    cards: Vec<Card>,
    known: Vec<CityKey>,
    page_size: usize,
    page: usize,
    units: Units,
    saved: SavedCities,
}

impl WeatherDisplay {
    pub fn new(saved: SavedCities, page_size: usize, units: Units) -> Self {
        Self {
            cards: Vec::new(),
            known: Vec::new(),
            page_size: page_size.max(1),
            page: 0,
            units,
            saved,
        }
    }

    /// Keys persisted by a previous session, in saved order
    pub fn load_city_list(&self) -> Vec<CityKey> {
        self.saved.load()
    }

    pub fn add_or_update(&mut self, record: &WeatherRecord) -> CardChange {
        let key = record.city_key();

        if let Some(idx) = self.position(&key) {
            let mut card = self.cards.remove(idx);
            card.fields = CardFields::from_record(record, self.units);
            self.cards.insert(0, card);
            tracing::debug!("Updated card {}", key);
            return CardChange::Updated;
        }

        self.known.push(key.clone());
        self.saved.save(&self.known);

        self.cards.insert(0, Card::new(key.clone(), record, self.units));
        self.page = 0;
        tracing::info!("Added card {}", key);
        CardChange::Added
    }

    /// Drop the card for `key`. Returns false if no such card was shown.
    pub fn remove(&mut self, key: &CityKey) -> bool {
        let Some(idx) = self.position(key) else {
            return false;
        };

        self.cards.remove(idx);
        self.known.retain(|k| k != key);
        self.saved.save(&self.known);

        self.page = self.page.min(self.total_pages() - 1);
        tracing::info!("Removed card {}", key);
        true
    }

    pub fn clear_all(&mut self) {
        self.cards.clear();
        self.known.clear();
        self.page = 0;
        self.saved.clear();
    }

    /// Never zero, even for an empty deck
    pub fn total_pages(&self) -> usize {
        self.cards.len().div_ceil(self.page_size).max(1)
    }

    pub fn next_page(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        self.page = (self.page + 1) % self.total_pages();
    }

    pub fn prev_page(&mut self) {
        if self.cards.is_empty() {
            return;
        }
        let total = self.total_pages() as isize;
        self.page = (self.page as isize - 1).rem_euclid(total) as usize;
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// `"<page>/<total>"`, one-based
    pub fn page_label(&self) -> String {
        format!("{}/{}", self.page + 1, self.total_pages())
    }

    /// Cards on the current page, front first
    pub fn visible(&self) -> &[Card] {
        let start = (self.page * self.page_size).min(self.cards.len());
        let end = (start + self.page_size).min(self.cards.len());
        &self.cards[start..end]
    }

    #[cfg(test)]
    pub(crate) fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[cfg(test)]
    pub(crate) fn card(&self, key: &CityKey) -> Option<&Card> {
        self.cards.iter().find(|c| &c.key == key)
    }

    /// Keys in first-insertion order, as persisted
    #[cfg(test)]
    pub(crate) fn saved_keys(&self) -> &[CityKey] {
        &self.known
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    fn position(&self, key: &CityKey) -> Option<usize> {
        self.cards.iter().position(|c| &c.key == key)
    }
}
