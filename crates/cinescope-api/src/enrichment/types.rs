//! Enrichment API response types.
//!
//! The enrichment service returns every value as text, with `"N/A"` for
//! unknown fields. Records keep that raw shape; see [`super::parse`] for the
//! typed view.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Marker the enrichment service uses for unknown values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Title kind filter accepted by the enrichment search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentKind {
    /// Feature film.
    Movie,
    /// TV series.
    Series,
    /// Single episode.
    Episode,
}

impl EnrichmentKind {
    /// Query parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
        }
    }
}

impl fmt::Display for EnrichmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rating entry (`{"Source": "...", "Value": "..."}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnrichmentRating {
    /// Rating source (e.g. "Rotten Tomatoes").
    pub source: String,
    /// Rating value as text (e.g. "72%", "7.5/10").
    pub value: String,
}

/// Full title record from a lookup by ID or by title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct EnrichmentTitle {
    /// Title.
    pub title: String,
    /// Year or year range (e.g. "1992–1995").
    pub year: String,
    /// Certification.
    pub rated: String,
    /// Release date.
    pub released: String,
    /// Runtime (e.g. "126 min").
    pub runtime: String,
    /// Comma-separated genres.
    pub genre: String,
    /// Comma-separated directors.
    pub director: String,
    /// Comma-separated writers.
    pub writer: String,
    /// Comma-separated lead actors.
    pub actors: String,
    /// Plot text.
    pub plot: String,
    /// Languages.
    pub language: String,
    /// Countries.
    pub country: String,
    /// Awards summary.
    pub awards: String,
    /// Poster URL.
    pub poster: String,
    /// Ratings by source.
    pub ratings: Vec<EnrichmentRating>,
    /// Metacritic score (0-100) as text.
    pub metascore: String,
    /// IMDb rating (0-10) as text.
    #[serde(rename = "imdbRating")]
    pub imdb_rating: String,
    /// IMDb vote count as text.
    #[serde(rename = "imdbVotes")]
    pub imdb_votes: String,
    /// IMDb ID.
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Kind ("movie", "series", "episode").
    #[serde(rename = "Type")]
    pub kind: String,
    /// DVD release date.
    #[serde(rename = "DVD")]
    pub dvd: Option<String>,
    /// Box office gross (e.g. "$251,409,241").
    pub box_office: Option<String>,
    /// Production company.
    pub production: Option<String>,
    /// Website.
    pub website: Option<String>,
    /// Number of seasons (series only).
    #[serde(rename = "totalSeasons")]
    pub total_seasons: Option<String>,
}

/// Result of a title search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentSearch {
    /// Matches on this page.
    #[serde(rename = "Search", default)]
    pub search: Vec<EnrichmentSearchItem>,
    /// Total number of matches as text.
    #[serde(rename = "totalResults", default)]
    pub total_results: String,
}

/// One search match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentSearchItem {
    /// Title.
    #[serde(rename = "Title")]
    pub title: String,
    /// Year or year range.
    #[serde(rename = "Year", default)]
    pub year: String,
    /// IMDb ID.
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    /// Kind ("movie", "series", "episode").
    #[serde(rename = "Type", default)]
    pub kind: String,
    /// Poster URL.
    #[serde(rename = "Poster", default)]
    pub poster: String,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_parse_title_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/enrichment/title_tt0096895.json");

        // Act
        let title: EnrichmentTitle = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(title.title, "Batman");
        assert_eq!(title.imdb_id, "tt0096895");
        assert_eq!(title.kind, "movie");
        assert_eq!(title.ratings.len(), 3);
        assert_eq!(title.ratings[1].source, "Rotten Tomatoes");
        assert_eq!(title.box_office.as_deref(), Some("$251,409,241"));
    }

    #[test]
    fn test_parse_search_fixture() {
        // Arrange
        let json = include_str!("../../../../fixtures/enrichment/search_batman.json");

        // Act
        let search: EnrichmentSearch = serde_json::from_str(json).unwrap();

        // Assert
        assert!(!search.search.is_empty());
        assert_eq!(search.search[0].imdb_id, "tt0372784");
        assert_eq!(search.total_results, "632");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        // Arrange
        let json = r#"{"Title":"Minimal","imdbID":"tt0000001","Response":"True"}"#;

        // Act
        let title: EnrichmentTitle = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(title.title, "Minimal");
        assert!(title.runtime.is_empty());
        assert!(title.ratings.is_empty());
        assert!(title.box_office.is_none());
    }

    #[test]
    fn test_kind_as_str() {
        // Arrange & Act & Assert
        assert_eq!(EnrichmentKind::Series.as_str(), "series");
        assert_eq!(EnrichmentKind::Episode.to_string(), "episode");
    }
}
