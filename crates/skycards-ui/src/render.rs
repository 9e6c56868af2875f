//! Plain-text rendering of the widget for a terminal.
//!
//! Everything here is a pure function of the state it is handed; the shell
//! decides when to redraw.

use console::Style;
use skycards_weather::{Suggestion, SuggestionKind};

use crate::models::display_model::Card;
use crate::models::theme_model::Theme;

/// Number of heading styles the rotation cycles through
pub const HEADING_STYLE_COUNT: usize = 7;

pub const HEADING: &str = "SkyCards";

/// Display glyph for an icon id. Unknown ids are shown as-is.
pub fn glyph(icon: &str) -> &str {
    match icon {
        "sunny" => "☀",
        "cloudy" => "☁",
        "partly-cloudy" => "⛅",
        "rain" => "🌧",
        "thunderstorm" => "⛈",
        "snow" => "❄",
        other => other,
    }
}

struct Palette {
    accent: Style,
    text: Style,
    dim: Style,
    error: Style,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            accent: Style::new().blue(),
            text: Style::new().black(),
            dim: Style::new().black().dim(),
            error: Style::new().red().bold(),
        },
        Theme::Dark => Palette {
            accent: Style::new().cyan(),
            text: Style::new().white(),
            dim: Style::new().white().dim(),
            error: Style::new().yellow().bold(),
        },
    }
}

/// Heading style `index` (wrapped) on top of the theme's accent colour
pub fn heading_style(theme: Theme, index: usize) -> Style {
    let base = palette(theme).accent;
    match index % HEADING_STYLE_COUNT {
        0 => base.bold(),
        1 => base.italic(),
        2 => base.underlined(),
        3 => base.bold().italic(),
        4 => base.dim(),
        5 => base.reverse(),
        _ => base.bold().underlined(),
    }
}

/// Everything the screen shows, borrowed from the shell's models
pub struct Screen<'a> {
    pub theme: Theme,
    pub heading_index: usize,
    pub toggle_label: &'a str,
    pub status: &'a str,
    pub input: &'a str,
    pub suggestions: &'a [Suggestion],
    pub cards: &'a [Card],
    /// `None` until the page indicator has been refreshed once
    pub page_label: Option<&'a str>,
}

pub fn render(screen: &Screen<'_>) -> String {
    let palette = palette(screen.theme);
    let mut out = String::new();

    out.push_str(&format!(
        "{}   {}\n",
        heading_style(screen.theme, screen.heading_index).apply_to(HEADING),
        palette.dim.apply_to(format!("[/theme] {}", screen.toggle_label))
    ));

    if !screen.status.is_empty() {
        let style = if screen.status.starts_with("Error") {
            &palette.error
        } else {
            &palette.dim
        };
        out.push_str(&format!("{}\n", style.apply_to(screen.status)));
    }

    if !screen.input.is_empty() {
        out.push_str(&format!("{} {}\n", palette.dim.apply_to("search:"), screen.input));
    }
    out.push_str(&render_suggestions(screen.suggestions, &palette));

    for (n, card) in screen.cards.iter().enumerate() {
        out.push_str(&render_card(n + 1, card, &palette));
    }

    if let Some(label) = screen.page_label {
        out.push_str(&format!(
            "{}\n",
            palette.dim.apply_to(format!("< /prev  {}  /next >", label))
        ));
    }

    out
}

fn render_suggestions(suggestions: &[Suggestion], palette: &Palette) -> String {
    let mut out = String::new();
    for (n, s) in suggestions.iter().enumerate() {
        let kind = match s.kind {
            SuggestionKind::Zip => palette.accent.apply_to(s.kind.label()),
            SuggestionKind::Location => palette.dim.apply_to(s.kind.label()),
        };
        out.push_str(&format!("  {}. {}  [{}]\n", n + 1, s.label, kind));
    }
    out
}

fn render_card(n: usize, card: &Card, palette: &Palette) -> String {
    let f = &card.fields;
    format!(
        "{} {}  {}\n    {} {}\n    {} {}  feels like {}\n    humidity {}  wind {}  pressure {}\n    sun {}\n",
        palette.dim.apply_to(format!("[{}]", n)),
        palette.accent.apply_to(&card.title).bold(),
        palette.dim.apply_to("x"),
        glyph(&card.icon),
        palette.text.apply_to(&card.description),
        palette.dim.apply_to("temp"),
        palette.text.apply_to(&f.temperature).bold(),
        f.feels_like,
        f.humidity,
        f.wind,
        f.pressure,
        f.daylight,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::display_model::CardFields;
    use console::strip_ansi_codes;
    use skycards_weather::{rank_suggestions, CityKey, GeoCandidate};

    fn card(icon: &str) -> Card {
        Card {
            key: CityKey::from("London-GB"),
            title: "London, GB".to_string(),
            description: "clear sky".to_string(),
            icon: icon.to_string(),
            fields: CardFields {
                temperature: "15°C".to_string(),
                feels_like: "14°C".to_string(),
                humidity: "60%".to_string(),
                wind: "3.6 m/s".to_string(),
                pressure: "1013 hPa".to_string(),
                daylight: "06:12 - 16:43".to_string(),
            },
        }
    }

    fn screen<'a>(cards: &'a [Card], suggestions: &'a [Suggestion]) -> Screen<'a> {
        Screen {
            theme: Theme::Light,
            heading_index: 0,
            toggle_label: "Switch to dark theme",
            status: "",
            input: "",
            suggestions,
            cards,
            page_label: Some("1/1"),
        }
    }

    #[test]
    fn known_and_unknown_glyphs() {
        assert_eq!(glyph("sunny"), "☀");
        assert_eq!(glyph("volcanic ash"), "volcanic ash");
    }

    #[test]
    fn heading_styles_wrap() {
        console::set_colors_enabled(true);
        let a = heading_style(Theme::Dark, 2).force_styling(true).apply_to("x").to_string();
        let b = heading_style(Theme::Dark, 2 + HEADING_STYLE_COUNT)
            .force_styling(true)
            .apply_to("x")
            .to_string();
        assert_eq!(a, b);
    }

    #[test]
    fn card_text_is_rendered() {
        let cards = [card("sunny")];
        let text = strip_ansi_codes(&render(&screen(&cards, &[]))).to_string();

        assert!(text.contains("[1] London, GB"));
        assert!(text.contains("☀ clear sky"));
        assert!(text.contains("temp 15°C  feels like 14°C"));
        assert!(text.contains("humidity 60%  wind 3.6 m/s  pressure 1013 hPa"));
        assert!(text.contains("sun 06:12 - 16:43"));
        assert!(text.contains("1/1"));
    }

    #[test]
    fn suggestions_and_status_lines() {
        let suggestions = rank_suggestions(
            vec![GeoCandidate {
                name: "Paris".to_string(),
                state: Some("Texas".to_string()),
                country: "US".to_string(),
                lat: 33.66,
                lon: -95.55,
            }],
            "Paris",
            5,
        );
        let mut s = screen(&[], &suggestions);
        s.status = "Loading...";
        s.input = "Paris";
        s.page_label = None;

        let text = strip_ansi_codes(&render(&s)).to_string();
        assert!(text.contains("Loading..."));
        assert!(text.contains("search: Paris"));
        assert!(text.contains("1. Paris, Texas, US  [location]"));
        assert!(!text.contains("/next"));
    }
}
