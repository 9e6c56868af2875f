//! Ranking of forward-geocoding candidates into search suggestions.
//!
//! The geocoder returns up to ten raw matches for a partial query. They are
//! deduplicated, ordered so exact name matches and well-known countries come
//! first, and cut down to a handful of labelled suggestions.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::query::is_zip;
use crate::types::{Coordinates, GeoCandidate};

/// Candidates requested from the geocoder per lookup
pub const GEOCODE_LIMIT: usize = 10;

/// Suggestions kept after ranking
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Countries ranked ahead of all others, in priority order
pub const PREFERRED_COUNTRIES: [&str; 9] = ["US", "GB", "CA", "AU", "DE", "FR", "IT", "ES", "JP"];

/// What a suggestion points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    Zip,
    Location,
}

impl SuggestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Zip => "ZIP",
            Self::Location => "location",
        }
    }
}

/// A ranked, display-ready geocoding match
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub label: String,
    pub kind: SuggestionKind,
    pub candidate: GeoCandidate,
}

impl Suggestion {
    fn from_candidate(candidate: GeoCandidate) -> Self {
        Self {
            label: format_label(&candidate),
            kind: kind_of(&candidate),
            candidate,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        self.candidate.coordinates()
    }
}

/// `"name, [state,] country"`
pub fn format_label(candidate: &GeoCandidate) -> String {
    let mut parts = vec![candidate.name.as_str()];
    if let Some(state) = candidate.state.as_deref().filter(|s| !s.is_empty()) {
        parts.push(state);
    }
    parts.push(candidate.country.as_str());
    parts.join(", ")
}

fn kind_of(candidate: &GeoCandidate) -> SuggestionKind {
    if candidate.country == "US" && is_zip(&candidate.name) {
        SuggestionKind::Zip
    } else {
        SuggestionKind::Location
    }
}

/// Drop repeated `(name, country, state, lat, lon)` tuples, keeping the first.
pub fn dedup_candidates(candidates: Vec<GeoCandidate>) -> Vec<GeoCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| {
            seen.insert((
                c.name.clone(),
                c.country.clone(),
                c.state.clone().unwrap_or_default(),
                c.lat.to_bits(),
                c.lon.to_bits(),
            ))
        })
        .collect()
}

fn country_rank(country: &str) -> Option<usize> {
    PREFERRED_COUNTRIES.iter().position(|c| *c == country)
}

/// Relevance ordering: exact name match, then preferred-country index.
/// Unlisted countries tie with each other below every listed one.
fn compare(a: &GeoCandidate, b: &GeoCandidate, query: &str) -> Ordering {
    let a_exact = a.name.to_lowercase() == query;
    let b_exact = b.name.to_lowercase() == query;

    b_exact.cmp(&a_exact).then_with(|| {
        match (country_rank(&a.country), country_rank(&b.country)) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    })
}

/// Stable relevance sort of `candidates` for `query`
pub fn rank_candidates(mut candidates: Vec<GeoCandidate>, query: &str) -> Vec<GeoCandidate> {
    let query = query.trim().to_lowercase();
    candidates.sort_by(|a, b| compare(a, b, &query));
    candidates
}

/// Dedup, rank and truncate raw geocoder output into suggestions
pub fn rank_suggestions(candidates: Vec<GeoCandidate>, query: &str, limit: usize) -> Vec<Suggestion> {
    let unique = dedup_candidates(candidates);
    rank_candidates(unique, query)
        .into_iter()
        .take(limit)
        .map(Suggestion::from_candidate)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, country: &str) -> GeoCandidate {
        GeoCandidate {
            name: name.to_string(),
            state: None,
            country: country.to_string(),
            lat: 0.0,
            lon: 0.0,
        }
    }

    fn with_state(name: &str, state: &str, country: &str, lat: f64) -> GeoCandidate {
        GeoCandidate {
            name: name.to_string(),
            state: Some(state.to_string()),
            country: country.to_string(),
            lat,
            lon: 0.0,
        }
    }

    fn countries(list: &[GeoCandidate]) -> Vec<&str> {
        list.iter().map(|c| c.country.as_str()).collect()
    }

    #[test]
    fn preferred_country_breaks_exact_match_tie() {
        let ranked = rank_candidates(vec![candidate("Paris", "FR"), candidate("Paris", "US")], "Paris");
        assert_eq!(countries(&ranked), vec!["US", "FR"]);
    }

    #[test]
    fn exact_match_beats_preferred_country() {
        let ranked = rank_candidates(
            vec![candidate("Parisville", "US"), candidate("paris", "MX")],
            "PARIS",
        );
        assert_eq!(ranked[0].name, "paris");
    }

    #[test]
    fn unlisted_countries_rank_last_and_stay_stable() {
        let ranked = rank_candidates(
            vec![
                candidate("Springfield", "NZ"),
                candidate("Springfield", "BR"),
                candidate("Springfield", "JP"),
                candidate("Springfield", "GB"),
            ],
            "Springfield",
        );
        assert_eq!(countries(&ranked), vec!["GB", "JP", "NZ", "BR"]);
    }

    #[test]
    fn dedup_keeps_exactly_one_copy() {
        let dup = with_state("Portland", "Oregon", "US", 45.5);
        let unique = dedup_candidates(vec![dup.clone(), dup.clone(), dup]);
        assert_eq!(unique.len(), 1);
    }

    #[test]
    fn dedup_distinguishes_state_and_coordinates() {
        let unique = dedup_candidates(vec![
            with_state("Portland", "Oregon", "US", 45.5),
            with_state("Portland", "Maine", "US", 43.6),
            with_state("Portland", "Oregon", "US", 45.6),
        ]);
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn suggestions_truncate_to_limit() {
        let raw = (0..10)
            .map(|i| GeoCandidate {
                lat: i as f64,
                ..candidate("Berlin", "DE")
            })
            .collect();
        let suggestions = rank_suggestions(raw, "Berlin", DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(suggestions.len(), 5);
        assert_eq!(suggestions[0].candidate.lat, 0.0);
    }

    #[test]
    fn labels_include_optional_state() {
        assert_eq!(format_label(&candidate("London", "GB")), "London, GB");
        assert_eq!(
            format_label(&with_state("London", "Ontario", "CA", 42.9)),
            "London, Ontario, CA"
        );
    }

    #[test]
    fn zip_kind_only_for_us_five_digit_names() {
        let suggestions = rank_suggestions(
            vec![candidate("10001", "US"), candidate("10001", "FR"), candidate("Boston", "US")],
            "10001",
            5,
        );
        let kinds: Vec<_> = suggestions.iter().map(|s| s.kind.label()).collect();
        assert_eq!(kinds, vec!["ZIP", "location", "location"]);
    }
}
