//! Catalog API request parameter types.

use super::types::MediaType;

/// Default sort order for discovery.
const DEFAULT_SORT: &str = "popularity.desc";

/// Parameters for `search/movie` and `search/tv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Search query (required).
    pub query: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Release year (movies) or first air date year (series).
    pub year: Option<u32>,
    /// Include adult content.
    pub include_adult: bool,
    /// Response language (e.g. "en-US"); the upstream default when unset.
    pub language: Option<String>,
}

impl SearchParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            year: None,
            include_adult: false,
            language: None,
        }
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Sets the year filter.
    #[must_use]
    pub const fn year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    /// Includes adult content.
    #[must_use]
    pub const fn include_adult(mut self, include: bool) -> Self {
        self.include_adult = include;
        self
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Query pairs for `media`; the year key differs between movies and series.
    pub(crate) fn to_query(&self, media: MediaType) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&str, String)> = vec![
            ("query", self.query.clone()),
            ("page", self.page.to_string()),
            ("include_adult", self.include_adult.to_string()),
        ];
        if let Some(year) = self.year {
            let key = match media {
                MediaType::Movie => "year",
                MediaType::Tv => "first_air_date_year",
            };
            query.push((key, year.to_string()));
        }
        if let Some(ref language) = self.language {
            query.push(("language", language.clone()));
        }
        query
    }
}

/// Parameters for `discover/movie` and `discover/tv`.
///
/// Unset filters are left out of the request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoverParams {
    /// Result page (default: 1).
    pub page: Option<u32>,
    /// Sort order (default: `popularity.desc`).
    pub sort_by: Option<String>,
    /// Release year (movies only).
    pub year: Option<u32>,
    /// Comma (AND) or pipe (OR) separated genre IDs.
    pub with_genres: Option<String>,
    /// Primary release year (movies only).
    pub primary_release_year: Option<u32>,
    /// First air date year (series only).
    pub first_air_date_year: Option<u32>,
    /// Minimum vote average.
    pub vote_average_gte: Option<f64>,
    /// Maximum vote average.
    pub vote_average_lte: Option<f64>,
    /// Minimum runtime in minutes.
    pub with_runtime_gte: Option<u32>,
    /// Maximum runtime in minutes.
    pub with_runtime_lte: Option<u32>,
    /// Include adult content.
    pub include_adult: bool,
}

impl DiscoverParams {
    /// Query pairs for `media`; filters that do not apply to it are skipped.
    pub(crate) fn to_query(&self, media: MediaType) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&str, String)> = vec![
            ("page", self.page.unwrap_or(1).to_string()),
            (
                "sort_by",
                self.sort_by
                    .clone()
                    .unwrap_or_else(|| String::from(DEFAULT_SORT)),
            ),
            ("include_adult", self.include_adult.to_string()),
        ];

        match media {
            MediaType::Movie => {
                push_opt(&mut query, "year", self.year);
                push_opt(&mut query, "primary_release_year", self.primary_release_year);
            }
            MediaType::Tv => {
                push_opt(&mut query, "first_air_date_year", self.first_air_date_year);
            }
        }
        if let Some(ref genres) = self.with_genres {
            query.push(("with_genres", genres.clone()));
        }
        push_opt(&mut query, "vote_average.gte", self.vote_average_gte);
        push_opt(&mut query, "vote_average.lte", self.vote_average_lte);
        push_opt(&mut query, "with_runtime.gte", self.with_runtime_gte);
        push_opt(&mut query, "with_runtime.lte", self.with_runtime_lte);
        query
    }
}

fn push_opt<T: ToString>(
    query: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: Option<T>,
) {
    if let Some(value) = value {
        query.push((key, value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(query: &[(&'static str, String)]) -> Vec<&'static str> {
        query.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn test_search_defaults_omit_year_and_language() {
        // Arrange
        let params = SearchParams::new("batman");

        // Act
        let query = params.to_query(MediaType::Movie);

        // Assert
        assert_eq!(
            query,
            vec![
                ("query", String::from("batman")),
                ("page", String::from("1")),
                ("include_adult", String::from("false")),
            ]
        );
    }

    #[test]
    fn test_search_year_key_depends_on_media_type() {
        // Arrange
        let params = SearchParams::new("batman").year(1989).page(2);

        // Act
        let movie = params.to_query(MediaType::Movie);
        let tv = params.to_query(MediaType::Tv);

        // Assert
        assert!(movie.contains(&("year", String::from("1989"))));
        assert!(tv.contains(&("first_air_date_year", String::from("1989"))));
        assert!(tv.contains(&("page", String::from("2"))));
    }

    #[test]
    fn test_discover_defaults() {
        // Arrange
        let params = DiscoverParams::default();

        // Act
        let query = params.to_query(MediaType::Movie);

        // Assert
        assert_eq!(keys(&query), vec!["page", "sort_by", "include_adult"]);
        assert!(query.contains(&("sort_by", String::from("popularity.desc"))));
    }

    #[test]
    fn test_discover_omits_unset_and_inapplicable_filters() {
        // Arrange
        let params = DiscoverParams {
            year: Some(2020),
            first_air_date_year: Some(2019),
            vote_average_gte: Some(7.5),
            with_genres: Some(String::from("28,12")),
            ..DiscoverParams::default()
        };

        // Act
        let movie = params.to_query(MediaType::Movie);
        let tv = params.to_query(MediaType::Tv);

        // Assert
        assert!(movie.contains(&("year", String::from("2020"))));
        assert!(!keys(&movie).contains(&"first_air_date_year"));
        assert!(tv.contains(&("first_air_date_year", String::from("2019"))));
        assert!(!keys(&tv).contains(&"year"));
        assert!(movie.contains(&("vote_average.gte", String::from("7.5"))));
        assert!(!keys(&movie).contains(&"vote_average.lte"));
        assert!(movie.contains(&("with_genres", String::from("28,12"))));
    }
}
