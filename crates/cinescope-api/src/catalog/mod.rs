//! Catalog API client module.
//!
//! Listings, search, discovery, genres and full details for movies and
//! TV series from the primary catalog service.

mod api;
mod client;
mod params;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CatalogApi, LocalCatalogApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{CatalogClient, CatalogClientBuilder};
pub use params::{DiscoverParams, SearchParams};
pub use types::{
    CastMember, Credits, CrewMember, Genre, GenreList, GuestSession, ImageKind, ImageSize,
    MediaDetails, MediaResult, MediaType, MovieDetails, MovieSummary, PagedResponse,
    SeriesSummary, StatusResponse, TimeWindow, TvDetails, Video, VideoList, image_size, year_of,
};
