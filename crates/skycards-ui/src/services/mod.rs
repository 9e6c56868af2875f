pub mod timer_service;
pub mod weather_service;

pub use timer_service::{spawn_heading_rotation, spawn_page_indicator_refresh, TimerMessage};
pub use weather_service::{
    fetch_suggestions, request_suggestions, WeatherError, WeatherServiceMessage,
};

/// Everything a background task can report to the shell loop
#[derive(Debug)]
pub enum UiEvent {
    Weather(WeatherServiceMessage),
    Timer(TimerMessage),
}
