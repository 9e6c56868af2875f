//! Light/dark theme state, persisted under the `theme` key.

use std::fmt;
use std::sync::Arc;

use crate::storage::KeyValueStore;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Anything other than the two known values reads as the default
    pub fn parse(value: &str) -> Self {
        match value {
            "dark" => Self::Dark,
            _ => Self::Light,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ThemeState {
    store: Arc<dyn KeyValueStore>,
    current: Theme,
}

impl ThemeState {
    /// Read the persisted theme (default light), then apply it
    pub fn init(store: Arc<dyn KeyValueStore>) -> Self {
        let current = match store.get_item(THEME_KEY) {
            Ok(Some(value)) => Theme::parse(&value),
            Ok(None) => Theme::default(),
            Err(e) => {
                tracing::error!("Error reading theme: {}", e);
                Theme::default()
            }
        };

        let mut state = Self { store, current };
        state.apply(current);
        state
    }

    fn apply(&mut self, theme: Theme) {
        self.current = theme;
        if let Err(e) = self.store.set_item(THEME_KEY, theme.as_str()) {
            tracing::error!("Error saving theme: {}", e);
        }
        tracing::debug!("Theme applied: {}", theme);
    }

    pub fn toggle(&mut self) -> Theme {
        self.apply(self.current.flipped());
        self.current
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Caption for the toggle button
    pub fn toggle_label(&self) -> String {
        format!("Switch to {} theme", self.current.flipped())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::BrokenStore;
    use crate::storage::MemoryStore;

    #[test]
    fn defaults_to_light_and_persists_it() {
        let store = Arc::new(MemoryStore::new());
        let theme = ThemeState::init(store.clone());
        assert_eq!(theme.current(), Theme::Light);
        assert_eq!(store.get_item(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn reads_persisted_dark() {
        let store = Arc::new(MemoryStore::new());
        store.set_item(THEME_KEY, "dark").unwrap();
        assert_eq!(ThemeState::init(store).current(), Theme::Dark);
    }

    #[test]
    fn unknown_value_falls_back_to_light() {
        let store = Arc::new(MemoryStore::new());
        store.set_item(THEME_KEY, "sepia").unwrap();
        assert_eq!(ThemeState::init(store.clone()).current(), Theme::Light);
        assert_eq!(store.get_item(THEME_KEY).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn toggle_flips_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let mut theme = ThemeState::init(store.clone());

        assert_eq!(theme.toggle(), Theme::Dark);
        assert_eq!(store.get_item(THEME_KEY).unwrap().as_deref(), Some("dark"));
        assert_eq!(theme.toggle_label(), "Switch to light theme");

        assert_eq!(theme.toggle(), Theme::Light);
        assert_eq!(theme.toggle_label(), "Switch to dark theme");
    }

    #[test]
    fn broken_store_still_toggles_in_memory() {
        let mut theme = ThemeState::init(Arc::new(BrokenStore));
        assert_eq!(theme.current(), Theme::Light);
        assert_eq!(theme.toggle(), Theme::Dark);
    }
}
