//! Typed view over the enrichment service's text fields.
//!
//! Every helper is total: unknown (`"N/A"`), empty or malformed input
//! yields `None` or an empty list.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::types::{EnrichmentTitle, NOT_AVAILABLE};

/// Rating source name of the critics' percentage score.
const ROTTEN_TOMATOES: &str = "Rotten Tomatoes";

#[allow(clippy::expect_used)]
static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid integer pattern"));

#[allow(clippy::expect_used)]
static LEADING_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d+(?:\.\d+)?)").expect("valid decimal pattern"));

/// Scores parsed from a title record; each source is independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ratings {
    /// IMDb rating (0-10).
    pub imdb: Option<f64>,
    /// Rotten Tomatoes percentage (0-100).
    pub rotten_tomatoes: Option<u32>,
    /// Metacritic score (0-100).
    pub metacritic: Option<u32>,
}

/// Parsed enrichment fields of one title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    /// Scores by source.
    pub ratings: Ratings,
    /// Runtime in minutes.
    pub runtime_minutes: Option<u32>,
    /// Box office gross in whole currency units.
    pub box_office: Option<u64>,
    /// Genre names.
    pub genres: Vec<String>,
    /// Lead actors.
    pub cast: Vec<String>,
    /// Directors.
    pub directors: Vec<String>,
    /// Writers.
    pub writers: Vec<String>,
}

impl EnrichmentResult {
    /// Parses every text field of `title`.
    #[must_use]
    pub fn from_title(title: &EnrichmentTitle) -> Self {
        Self {
            ratings: extract_ratings(title),
            runtime_minutes: parse_runtime(&title.runtime),
            box_office: title.box_office.as_deref().and_then(parse_box_office),
            genres: parse_list(&title.genre),
            cast: parse_list(&title.actors),
            directors: parse_list(&title.director),
            writers: parse_list(&title.writer),
        }
    }
}

/// A raw title record together with its parsed view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTitle {
    /// Record as returned by the service.
    pub raw: EnrichmentTitle,
    /// Parsed fields.
    pub parsed: EnrichmentResult,
}

impl From<EnrichmentTitle> for EnrichedTitle {
    fn from(raw: EnrichmentTitle) -> Self {
        let parsed = EnrichmentResult::from_title(&raw);
        Self { raw, parsed }
    }
}

fn known(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty() && value != NOT_AVAILABLE).then_some(value)
}

fn first_integer<T: std::str::FromStr>(value: &str) -> Option<T> {
    INTEGER.find(value).and_then(|m| m.as_str().parse().ok())
}

/// IMDb, Rotten Tomatoes and Metacritic scores of `title`.
#[must_use]
pub fn extract_ratings(title: &EnrichmentTitle) -> Ratings {
    let imdb = known(&title.imdb_rating)
        .and_then(|v| LEADING_DECIMAL.captures(v))
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok());

    let metacritic = known(&title.metascore).and_then(first_integer);

    let rotten_tomatoes = title
        .ratings
        .iter()
        .find(|r| r.source == ROTTEN_TOMATOES)
        .and_then(|r| known(&r.value))
        .and_then(|v| first_integer(v.trim_end_matches('%')));

    Ratings {
        imdb,
        rotten_tomatoes,
        metacritic,
    }
}

/// First integer of a runtime such as `"126 min"`.
#[must_use]
pub fn parse_runtime(runtime: &str) -> Option<u32> {
    known(runtime).and_then(first_integer)
}

/// Amount of a dollar field such as `"$251,409,241"`.
///
/// Only `$` and `,` are stripped; anything else left over makes it absent.
#[must_use]
pub fn parse_box_office(box_office: &str) -> Option<u64> {
    let cleaned: String = known(box_office)?
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    cleaned.trim().parse().ok()
}

/// Items of a comma-separated field such as `"Jack Nicholson, Michael Keaton"`.
#[must_use]
pub fn parse_list(list: &str) -> Vec<String> {
    known(list).map_or_else(Vec::new, |v| {
        v.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(String::from)
            .collect()
    })
}
