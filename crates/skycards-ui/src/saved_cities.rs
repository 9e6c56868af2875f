//! Persistence adapter for the pinned city list.
//!
//! Every operation logs and swallows store failures: a broken store
//! degrades to "nothing saved", it never aborts the caller.

use std::sync::Arc;

use skycards_weather::CityKey;

use crate::storage::KeyValueStore;

pub const SAVED_CITIES_KEY: &str = "savedCities";

#[derive(Clone)]
pub struct SavedCities {
    store: Arc<dyn KeyValueStore>,
}

impl SavedCities {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Store `keys` as a JSON array, replacing the previous list
    pub fn save(&self, keys: &[CityKey]) {
        let json = match serde_json::to_string(keys) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!("Error serializing saved cities: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.set_item(SAVED_CITIES_KEY, &json) {
            tracing::error!("Error saving cities: {}", e);
        }
    }

    /// The stored list, or empty when absent, unreadable or corrupt
    pub fn load(&self) -> Vec<CityKey> {
        let raw = match self.store.get_item(SAVED_CITIES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::error!("Error loading cities: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(keys) => keys,
            Err(e) => {
                tracing::error!("Ignoring malformed saved city list: {}", e);
                Vec::new()
            }
        }
    }

    pub fn clear(&self) {
        match self.store.remove_item(SAVED_CITIES_KEY) {
            Ok(()) => tracing::info!("Cities cleared successfully"),
            Err(e) => tracing::error!("Error clearing cities: {}", e),
        }
    }
}
