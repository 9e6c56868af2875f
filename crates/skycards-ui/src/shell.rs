//! Line-driven application shell.
//!
//! Reads commands from an async line source, applies them to the search,
//! deck and theme models, and redraws after every change. Background work
//! (debounced suggestions, cosmetic timers) reports back over one channel.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use skycards_core::AppError;
use skycards_weather::{CityKey, Coordinates, Query, WeatherRecord};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::app_services::AppServices;
use crate::models::display_model::{CardChange, WeatherDisplay};
use crate::models::search_model::SearchManager;
use crate::models::status_model::StatusLine;
use crate::models::theme_model::ThemeState;
use crate::render::{render, Screen, HEADING_STYLE_COUNT};
use crate::saved_cities::SavedCities;
use crate::services::{
    spawn_heading_rotation, spawn_page_indicator_refresh, TimerMessage, UiEvent, WeatherError,
};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub const HELP: &str = "\
Commands:
  <text>             search and add a card (city, ZIP or \"lat, lon\")
  ?<text>            type into the search box and show suggestions
  <empty line>       search for what the search box holds
  /pick N            choose suggestion N
  /coords LAT LON    add the card for a map position
  /next, /prev       change page
  /close KEY|N       remove a card by key or by its number on this page
  /clear             remove every card
  /theme             switch between light and dark
  /help              show this text
  /quit              exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Empty,
    Input(String),
    Search(String),
    Pick(usize),
    Coords(Coordinates),
    Theme,
    Next,
    Prev,
    Close(String),
    Clear,
    Help,
    Quit,
    /// Unparseable line; carries the message to show
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some(text) = line.strip_prefix('?') {
            return Command::Input(text.to_string());
        }

        let Some(rest) = line.trim().strip_prefix('/') else {
            return if line.trim().is_empty() {
                Command::Empty
            } else {
                Command::Search(line.trim().to_string())
            };
        };

        let mut words = rest.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        match (name, args.as_slice()) {
            ("pick", [n]) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Command::Pick(n),
                _ => Command::Invalid(format!("Not a suggestion number: {}", n)),
            },
            ("coords", [lat, lon]) => match (lat.parse::<f64>(), lon.parse::<f64>()) {
                (Ok(lat), Ok(lon)) => Command::Coords(Coordinates { lat, lon }),
                _ => Command::Invalid(format!("Not a coordinate pair: {} {}", lat, lon)),
            },
            ("close", [target]) => Command::Close(target.to_string()),
            ("theme", []) => Command::Theme,
            ("next", []) => Command::Next,
            ("prev", []) => Command::Prev,
            ("clear", []) => Command::Clear,
            ("help", []) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            _ => Command::Invalid(format!("Unknown command: /{} (try /help)", rest.trim())),
        }
    }

    /// Input and suggestion picks happen inside the search box; everything
    /// else counts as a click elsewhere on the page.
    fn is_outside_click(&self) -> bool {
        !matches!(self, Command::Input(_) | Command::Pick(_) | Command::Empty)
    }
}

/// Timings for the cosmetic timers
#[derive(Debug, Clone, Copy)]
pub struct ShellTimers {
    pub heading_period: Duration,
    pub page_indicator_delay: Duration,
}

pub struct Shell<W: Write> {
    out: W,
    clear_between_frames: bool,
    search: SearchManager,
    display: WeatherDisplay,
    theme: ThemeState,
    status: StatusLine,
    events_tx: UnboundedSender<UiEvent>,
    events_rx: UnboundedReceiver<UiEvent>,
    heading_index: Arc<AtomicUsize>,
    page_indicator_ready: bool,
    timers: ShellTimers,
    cancel: CancellationToken,
}

impl<W: Write> Shell<W> {
    pub fn new(services: &AppServices, out: W) -> Self {
        let ui = &services.config().ui;
        let provider = services.provider();
        let (events_tx, events_rx) = unbounded_channel();

        let status = StatusLine::new(Duration::from_secs(ui.status_clear_secs));
        let search = SearchManager::new(
            provider.clone(),
            events_tx.clone(),
            status.clone(),
            Duration::from_millis(ui.debounce_ms),
            ui.suggestion_limit,
        );
        let display = WeatherDisplay::new(
            SavedCities::new(services.store()),
            ui.page_size,
            provider.units(),
        );

        Self {
            out,
            clear_between_frames: false,
            search,
            display,
            theme: ThemeState::init(services.store()),
            status,
            events_tx,
            events_rx,
            heading_index: Arc::new(AtomicUsize::new(0)),
            page_indicator_ready: false,
            timers: ShellTimers {
                heading_period: Duration::from_millis(ui.font_rotation_ms),
                page_indicator_delay: Duration::from_millis(ui.page_indicator_delay_ms),
            },
            cancel: services.shutdown_token().child_token(),
        }
    }

    /// Clear the terminal before each redraw instead of appending frames
    pub fn clear_between_frames(mut self, clear: bool) -> Self {
        self.clear_between_frames = clear;
        self
    }

    /// Restore saved cards, then process input lines and background events
    /// until `/quit`, end of input, or shutdown.
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> Result<()> {
        self.start_timers();
        self.restore_saved().await;
        self.redraw()?;

        let mut lines = input.lines();
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if !self.handle_line(&line).await? {
                        break;
                    }
                    self.redraw()?;
                }
                Some(event) = self.events_rx.recv() => {
                    if self.handle_event(event) {
                        self.redraw()?;
                    }
                }
            }
        }

        self.cancel.cancel();
        Ok(())
    }

    fn start_timers(&self) {
        spawn_heading_rotation(
            self.heading_index.clone(),
            HEADING_STYLE_COUNT,
            self.timers.heading_period,
            self.cancel.clone(),
        );
        spawn_page_indicator_refresh(
            &self.events_tx,
            self.timers.page_indicator_delay,
            self.cancel.clone(),
        );
    }

    /// Re-fetch every saved key one after another, in saved order
    async fn restore_saved(&mut self) {
        let keys = self.display.load_city_list();
        if keys.is_empty() {
            return;
        }

        tracing::info!("Restoring {} saved cities", keys.len());
        for key in keys {
            match self.search.resolve(&key.replay_query()).await {
                Ok(record) => {
                    self.display.add_or_update(&record);
                }
                Err(e) => tracing::warn!("Could not restore {}: {}", key, e),
            }
        }
    }

    /// Apply one input line. Returns false when the shell should stop.
    pub async fn handle_line(&mut self, line: &str) -> Result<bool> {
        let command = Command::parse(line);
        if command.is_outside_click() {
            self.search.dismiss();
        }

        match command {
            // Enter submits whatever the search field holds
            Command::Empty => {
                let text = self.search.input().trim().to_string();
                if !text.is_empty() {
                    self.search.dismiss();
                    let result = self.search.resolve(&text).await;
                    self.accept(result)?;
                }
            }
            Command::Input(text) => self.search.on_input_change(&text),
            Command::Search(text) => {
                self.search.set_input(&text);
                let result = self.search.resolve(&text).await;
                self.accept(result)?;
            }
            Command::Pick(n) => {
                let result = self.search.select(n - 1).await;
                self.accept(result)?;
            }
            Command::Coords(coordinates) => {
                let result = self.search.resolve_query(&Query::from(coordinates)).await;
                self.accept(result)?;
            }
            Command::Theme => {
                let theme = self.theme.toggle();
                tracing::debug!("Theme toggled to {}", theme);
            }
            Command::Next => {
                self.display.next_page();
                self.page_indicator_ready = true;
            }
            Command::Prev => {
                self.display.prev_page();
                self.page_indicator_ready = true;
            }
            Command::Close(target) => {
                let key = self.close_target(&target);
                if !self.display.remove(&key) {
                    writeln!(self.out, "No card {}", target)?;
                }
            }
            Command::Clear => self.display.clear_all(),
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Quit => return Ok(false),
            Command::Invalid(message) => writeln!(self.out, "{}", message)?,
        }

        Ok(true)
    }

    /// Returns true if the event changed what is on screen
    pub fn handle_event(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::Weather(message) => self.search.apply(message),
            UiEvent::Timer(TimerMessage::PageIndicatorDue) => {
                self.page_indicator_ready = true;
                true
            }
        }
    }

    fn accept(&mut self, result: Result<WeatherRecord, WeatherError>) -> std::io::Result<()> {
        match result {
            Ok(record) => {
                if self.display.add_or_update(&record) == CardChange::Updated {
                    tracing::debug!("{} was already shown", record.city_key());
                }
                Ok(())
            }
            // The status line already says so
            Err(WeatherError::NotFound(_)) | Err(WeatherError::EmptyQuery) => Ok(()),
            Err(e @ WeatherError::NoSuggestion(_)) => writeln!(self.out, "{}", e),
            Err(e) => {
                let error = AppError::from(e);
                tracing::warn!("{}", error);
                writeln!(self.out, "{}", error.user_message())
            }
        }
    }

    /// A one-based number picks from the visible page; anything else is a key
    fn close_target(&self, target: &str) -> CityKey {
        let visible = self.display.visible();
        match target.parse::<usize>() {
            Ok(n) if n >= 1 && n <= visible.len() => visible[n - 1].key.clone(),
            _ => CityKey::from(target),
        }
    }

    fn redraw(&mut self) -> std::io::Result<()> {
        let status = self.status.text();
        let toggle_label = self.theme.toggle_label();
        let page_label = self
            .page_indicator_ready
            .then(|| self.display.page_label());

        let frame = render(&Screen {
            theme: self.theme.current(),
            heading_index: self.heading_index.load(Ordering::Relaxed),
            toggle_label: &toggle_label,
            status: &status,
            input: self.search.input(),
            suggestions: self.search.suggestions(),
            cards: self.display.visible(),
            page_label: page_label.as_deref(),
        });

        if self.clear_between_frames {
            write!(self.out, "{}", CLEAR_SCREEN)?;
        } else {
            writeln!(self.out)?;
        }
        write!(self.out, "{}", frame)?;
        self.out.flush()
    }

    pub fn display(&self) -> &WeatherDisplay {
        &self.display
    }

    pub fn search(&self) -> &SearchManager {
        &self.search
    }

    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn into_writer(self) -> W {
        self.out
    }
}
