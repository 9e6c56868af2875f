//! Search box state: debounced suggestions and query resolution.
//!
//! Every keystroke bumps a generation counter. A suggestion result is only
//! shown if it carries the latest generation, so a slow response for an
//! older prefix can never overwrite a newer one, and dismissing the box
//! invalidates anything still in flight.

use std::sync::Arc;
use std::time::Duration;

use skycards_weather::{Query, Suggestion, WeatherProvider, WeatherRecord};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::models::status_model::{StatusLine, LOADING, LOCATION_NOT_FOUND};
use crate::services::{request_suggestions, UiEvent, WeatherError, WeatherServiceMessage};

/// Shortest trimmed input that triggers a suggestion lookup
pub const MIN_QUERY_CHARS: usize = 2;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

pub struct SearchManager {
    provider: Arc<WeatherProvider>,
    events: UnboundedSender<UiEvent>,
    status: StatusLine,
    debounce: Duration,
    limit: usize,
    pending: Option<JoinHandle<()>>,
    generation: u64,
    input: String,
    suggestions: Vec<Suggestion>,
}

impl SearchManager {
    pub fn new(
        provider: Arc<WeatherProvider>,
        events: UnboundedSender<UiEvent>,
        status: StatusLine,
        debounce: Duration,
        limit: usize,
    ) -> Self {
        Self {
            provider,
            events,
            status,
            debounce,
            limit,
            pending: None,
            generation: 0,
            input: String::new(),
            suggestions: Vec::new(),
        }
    }

    /// Keystroke handler. Cancels the pending lookup; schedules a new one
    /// for inputs of two or more characters, otherwise hides suggestions.
    pub fn on_input_change(&mut self, text: &str) {
        self.input = text.to_string();
        self.cancel_pending();
        self.generation += 1;

        let query = text.trim();
        if query.chars().count() >= MIN_QUERY_CHARS {
            self.pending = Some(request_suggestions(
                &self.events,
                self.provider.clone(),
                query.to_string(),
                self.generation,
                self.debounce,
                self.limit,
            ));
        } else {
            self.hide();
        }
    }

    /// Apply a background result. Returns true if it was current and
    /// changed what the box shows.
    pub fn apply(&mut self, message: WeatherServiceMessage) -> bool {
        match message {
            WeatherServiceMessage::SuggestionsDone {
                generation,
                query,
                result,
            } => {
                if generation != self.generation {
                    tracing::debug!(
                        "Discarding stale suggestions for {} (generation {} < {})",
                        query,
                        generation,
                        self.generation
                    );
                    return false;
                }

                self.pending = None;
                match result {
                    Ok(list) => self.suggestions = list,
                    Err(_) => self.hide(),
                }
                true
            }
        }
    }

    /// Outside click: hide the box and drop anything still in flight
    pub fn dismiss(&mut self) {
        self.cancel_pending();
        self.generation += 1;
        self.hide();
    }

    pub fn hide(&mut self) {
        self.suggestions.clear();
    }

    /// Pick suggestion `index` (zero-based): fill the search field with its
    /// label and resolve weather at its coordinates.
    pub async fn select(&mut self, index: usize) -> Result<WeatherRecord, WeatherError> {
        let suggestion = self
            .suggestions
            .get(index)
            .cloned()
            .ok_or(WeatherError::NoSuggestion(index + 1))?;

        self.input = suggestion.label.clone();
        self.dismiss();
        self.resolve_query(&Query::from(suggestion.coordinates()))
            .await
    }

    /// Classify free text (coordinates, ZIP or city) and fetch its weather
    ///
    /// # Errors
    /// Returns `WeatherError::EmptyQuery` for blank text, otherwise whatever
    /// the lookup failed with.
    pub async fn resolve(&self, text: &str) -> Result<WeatherRecord, WeatherError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(WeatherError::EmptyQuery);
        }
        self.resolve_query(&Query::classify(text)).await
    }

    /// One weather request with "Loading..." / error status around it
    pub async fn resolve_query(&self, query: &Query) -> Result<WeatherRecord, WeatherError> {
        self.status.set(LOADING);
        tracing::info!("Resolving {}", query.describe());

        match self.provider.resolve(query).await {
            Ok(record) => {
                self.status.clear();
                Ok(record)
            }
            Err(e) => {
                tracing::error!("Search error: {}", e);
                self.status.set(LOCATION_NOT_FOUND);
                Err(e.into())
            }
        }
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn is_showing_suggestions(&self) -> bool {
        !self.suggestions.is_empty()
    }

    /// Current contents of the search field
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the field text without scheduling a lookup
    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchManager {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
