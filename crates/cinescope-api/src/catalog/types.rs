//! Catalog API response types.

use std::fmt;

use serde::{Deserialize, Serialize};

// --- Media type ---

/// Media kind served by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Feature film.
    Movie,
    /// TV series.
    Tv,
}

impl MediaType {
    /// Path segment used by the catalog API.
    #[must_use]
    pub const fn as_path(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

/// Trending time window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeWindow {
    /// Last 24 hours.
    #[default]
    Day,
    /// Last 7 days.
    Week,
}

impl TimeWindow {
    /// Path segment used by the catalog API.
    #[must_use]
    pub const fn as_path(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

// --- Listings ---

/// Paginated listing (`{page, results, total_pages, total_results}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    /// Current page number.
    pub page: u32,
    /// Items of this page.
    pub results: Vec<T>,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
    /// Total number of results.
    #[serde(default)]
    pub total_results: u32,
}

/// A movie as returned by listing and search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    /// Catalog movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

/// A TV series as returned by listing and search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Catalog series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    #[serde(default)]
    pub original_name: Option<String>,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
    /// Origin countries (ISO 3166-1).
    #[serde(default)]
    pub origin_country: Vec<String>,
    /// First air date (YYYY-MM-DD).
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

/// Either kind of listing item, behind one accessor surface.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaResult {
    /// A movie.
    Movie(MovieSummary),
    /// A TV series.
    Series(SeriesSummary),
}

impl MediaResult {
    /// Discriminant.
    #[must_use]
    pub const fn media_type(&self) -> MediaType {
        match self {
            Self::Movie(_) => MediaType::Movie,
            Self::Series(_) => MediaType::Tv,
        }
    }

    /// Catalog ID.
    #[must_use]
    pub const fn id(&self) -> u64 {
        match self {
            Self::Movie(m) => m.id,
            Self::Series(s) => s.id,
        }
    }

    /// Movie title or series name.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Movie(m) => &m.title,
            Self::Series(s) => &s.name,
        }
    }

    /// Release date or first air date.
    #[must_use]
    pub fn release_date(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.release_date.as_deref(),
            Self::Series(s) => s.first_air_date.as_deref(),
        }
    }

    /// Four-digit year of [`Self::release_date`].
    #[must_use]
    pub fn year(&self) -> Option<u32> {
        self.release_date().and_then(year_of)
    }

    /// Poster image path.
    #[must_use]
    pub fn poster_path(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.poster_path.as_deref(),
            Self::Series(s) => s.poster_path.as_deref(),
        }
    }

    /// Vote average.
    #[must_use]
    pub const fn vote_average(&self) -> f64 {
        match self {
            Self::Movie(m) => m.vote_average,
            Self::Series(s) => s.vote_average,
        }
    }

    /// Vote count.
    #[must_use]
    pub const fn vote_count(&self) -> u32 {
        match self {
            Self::Movie(m) => m.vote_count,
            Self::Series(s) => s.vote_count,
        }
    }

    /// Popularity score.
    #[must_use]
    pub const fn popularity(&self) -> f64 {
        match self {
            Self::Movie(m) => m.popularity,
            Self::Series(s) => s.popularity,
        }
    }

    /// Genre IDs.
    #[must_use]
    pub fn genre_ids(&self) -> &[u32] {
        match self {
            Self::Movie(m) => &m.genre_ids,
            Self::Series(s) => &s.genre_ids,
        }
    }

    /// Adult flag.
    #[must_use]
    pub const fn is_adult(&self) -> bool {
        match self {
            Self::Movie(m) => m.adult,
            Self::Series(s) => s.adult,
        }
    }

    /// Original language (ISO 639-1).
    #[must_use]
    pub fn original_language(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.original_language.as_deref(),
            Self::Series(s) => s.original_language.as_deref(),
        }
    }
}

impl From<MovieSummary> for MediaResult {
    fn from(movie: MovieSummary) -> Self {
        Self::Movie(movie)
    }
}

impl From<SeriesSummary> for MediaResult {
    fn from(series: SeriesSummary) -> Self {
        Self::Series(series)
    }
}

/// Extracts the year from a `YYYY-MM-DD` date.
#[must_use]
pub fn year_of(date: &str) -> Option<u32> {
    date.get(..4).and_then(|y| y.parse().ok())
}

// --- Genres ---

/// Genre entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

/// Response from `genre/{type}/list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreList {
    /// Genres.
    pub genres: Vec<Genre>,
}

// --- Related resources ---

/// Response from `{type}/{id}/credits`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credits {
    /// Cast members.
    #[serde(default)]
    pub cast: Vec<CastMember>,
    /// Crew members.
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// Cast entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    /// Person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Character played.
    #[serde(default)]
    pub character: Option<String>,
    /// Billing order.
    #[serde(default)]
    pub order: Option<u32>,
    /// Profile image path.
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Crew entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    /// Person ID.
    pub id: u64,
    /// Person name.
    pub name: String,
    /// Job title (e.g. "Director").
    #[serde(default)]
    pub job: Option<String>,
    /// Department.
    #[serde(default)]
    pub department: Option<String>,
}

/// Response from `{type}/{id}/videos`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoList {
    /// Videos.
    #[serde(default)]
    pub results: Vec<Video>,
}

/// Trailer, teaser or clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    /// Video ID.
    pub id: String,
    /// Hosting-site key.
    pub key: String,
    /// Title.
    pub name: String,
    /// Hosting site (e.g. "YouTube").
    pub site: String,
    /// Kind (e.g. "Trailer").
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether it is an official upload.
    #[serde(default)]
    pub official: bool,
}

// --- Details ---

/// Response from `movie/{id}` with related resources attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    /// Catalog movie ID.
    pub id: u64,
    /// External IMDb ID.
    #[serde(default)]
    pub imdb_id: Option<String>,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Original language.
    #[serde(default)]
    pub original_language: Option<String>,
    /// Tagline.
    #[serde(default)]
    pub tagline: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Release date.
    #[serde(default)]
    pub release_date: Option<String>,
    /// Runtime in minutes.
    #[serde(default)]
    pub runtime: Option<u32>,
    /// Release status (e.g. "Released").
    #[serde(default)]
    pub status: Option<String>,
    /// Budget in USD.
    #[serde(default)]
    pub budget: u64,
    /// Revenue in USD.
    #[serde(default)]
    pub revenue: u64,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Adult flag.
    #[serde(default)]
    pub adult: bool,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Cast and crew, when the credits call succeeded.
    #[serde(default)]
    pub credits: Option<Credits>,
    /// Videos, when the videos call succeeded.
    #[serde(default)]
    pub videos: Option<VideoList>,
    /// Similar movies, when that call succeeded.
    #[serde(default)]
    pub similar: Option<PagedResponse<MovieSummary>>,
    /// Recommended movies, when that call succeeded.
    #[serde(default)]
    pub recommendations: Option<PagedResponse<MovieSummary>>,
}

/// Response from `tv/{id}` with related resources attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TvDetails {
    /// Catalog series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    #[serde(default)]
    pub original_name: Option<String>,
    /// Original language.
    #[serde(default)]
    pub original_language: Option<String>,
    /// Origin countries.
    #[serde(default)]
    pub origin_country: Vec<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// First air date.
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Last air date.
    #[serde(default)]
    pub last_air_date: Option<String>,
    /// Total number of episodes.
    #[serde(default)]
    pub number_of_episodes: u32,
    /// Total number of seasons.
    #[serde(default)]
    pub number_of_seasons: u32,
    /// Status (e.g. "Ended").
    #[serde(default)]
    pub status: Option<String>,
    /// Whether the show is still in production.
    #[serde(default)]
    pub in_production: bool,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Poster image path.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Backdrop image path.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Cast and crew, when the credits call succeeded.
    #[serde(default)]
    pub credits: Option<Credits>,
    /// Videos, when the videos call succeeded.
    #[serde(default)]
    pub videos: Option<VideoList>,
    /// Similar series, when that call succeeded.
    #[serde(default)]
    pub similar: Option<PagedResponse<SeriesSummary>>,
    /// Recommended series, when that call succeeded.
    #[serde(default)]
    pub recommendations: Option<PagedResponse<SeriesSummary>>,
}

impl TvDetails {
    /// Name used for title lookups: localized, falling back to the original.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.original_name.as_deref().unwrap_or_default()
        } else {
            &self.name
        }
    }
}

/// Full details of either media type.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaDetails {
    /// Movie details.
    Movie(Box<MovieDetails>),
    /// Series details.
    Tv(Box<TvDetails>),
}

impl MediaDetails {
    /// Discriminant.
    #[must_use]
    pub const fn media_type(&self) -> MediaType {
        match self {
            Self::Movie(_) => MediaType::Movie,
            Self::Tv(_) => MediaType::Tv,
        }
    }

    /// Catalog ID.
    #[must_use]
    pub const fn id(&self) -> u64 {
        match self {
            Self::Movie(m) => m.id,
            Self::Tv(t) => t.id,
        }
    }

    /// Movie title or series name.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Movie(m) => &m.title,
            Self::Tv(t) => t.display_name(),
        }
    }

    /// Release date or first air date.
    #[must_use]
    pub fn release_date(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.release_date.as_deref(),
            Self::Tv(t) => t.first_air_date.as_deref(),
        }
    }

    /// Poster image path.
    #[must_use]
    pub fn poster_path(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.poster_path.as_deref(),
            Self::Tv(t) => t.poster_path.as_deref(),
        }
    }
}

// --- Images ---

/// Image category, selecting the size table used by [`image_size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// Poster art.
    Poster,
    /// Backdrop art.
    Backdrop,
    /// Person photo.
    Profile,
    /// Company or network logo.
    Logo,
}

/// Requested image size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageSize {
    /// Thumbnail.
    Small,
    /// Default size.
    #[default]
    Medium,
    /// Large rendition.
    Large,
    /// Original upload.
    Original,
}

/// Catalog size token for `kind` at `size`.
#[must_use]
pub const fn image_size(kind: ImageKind, size: ImageSize) -> &'static str {
    match (kind, size) {
        (_, ImageSize::Original) => "original",
        (ImageKind::Poster, ImageSize::Small) => "w185",
        (ImageKind::Poster, ImageSize::Medium) => "w342",
        (ImageKind::Poster, ImageSize::Large) => "w500",
        (ImageKind::Backdrop, ImageSize::Small) => "w300",
        (ImageKind::Backdrop, ImageSize::Medium) => "w780",
        (ImageKind::Backdrop, ImageSize::Large) => "w1280",
        (ImageKind::Profile, ImageSize::Small) | (ImageKind::Logo, ImageSize::Small) => "w45",
        (ImageKind::Profile, ImageSize::Medium) | (ImageKind::Logo, ImageSize::Large) => "w185",
        (ImageKind::Profile, ImageSize::Large) => "h632",
        (ImageKind::Logo, ImageSize::Medium) => "w92",
    }
}

// --- Guest sessions ---

/// Response from `authentication/guest_session/new`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestSession {
    /// Whether the session was created.
    #[serde(default)]
    pub success: bool,
    /// Session ID passed to rating calls.
    pub guest_session_id: String,
    /// Expiry timestamp as sent by the catalog.
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// Acknowledgement of a write such as `{type}/{id}/rating`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Whether the write was applied.
    #[serde(default)]
    pub success: bool,
    /// Catalog status code.
    #[serde(default)]
    pub status_code: Option<u32>,
    /// Catalog status text.
    #[serde(default)]
    pub status_message: Option<String>,
}
