//! `CatalogApi` trait definition.
#![allow(clippy::future_not_send)]

use super::params::{DiscoverParams, SearchParams};
use super::types::{
    GenreList, MediaType, MovieDetails, MovieSummary, PagedResponse, SeriesSummary, TimeWindow,
    TvDetails,
};
use crate::error::ApiResult;

/// Catalog API trait.
///
/// Abstracts catalog operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CatalogApi: Send)]
pub trait LocalCatalogApi {
    /// Searches movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rate limited, fails or cannot be decoded.
    async fn search_movies(&self, params: &SearchParams) -> ApiResult<PagedResponse<MovieSummary>>;

    /// Searches TV series.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rate limited, fails or cannot be decoded.
    async fn search_tv(&self, params: &SearchParams) -> ApiResult<PagedResponse<SeriesSummary>>;

    /// Trending movies over `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rate limited, fails or cannot be decoded.
    async fn trending_movies(&self, window: TimeWindow)
    -> ApiResult<PagedResponse<MovieSummary>>;

    /// Trending TV series over `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rate limited, fails or cannot be decoded.
    async fn trending_tv(&self, window: TimeWindow) -> ApiResult<PagedResponse<SeriesSummary>>;

    /// Popular movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rate limited, fails or cannot be decoded.
    async fn popular_movies(&self, page: u32) -> ApiResult<PagedResponse<MovieSummary>>;

    /// Popular TV series.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rate limited, fails or cannot be decoded.
    async fn popular_tv(&self, page: u32) -> ApiResult<PagedResponse<SeriesSummary>>;

    /// Top-rated movies.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rate limited, fails or cannot be decoded.
    async fn top_rated_movies(&self, page: u32) -> ApiResult<PagedResponse<MovieSummary>>;

    /// Top-rated TV series.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rate limited, fails or cannot be decoded.
    async fn top_rated_tv(&self, page: u32) -> ApiResult<PagedResponse<SeriesSummary>>;

    /// Upcoming movie releases.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rate limited, fails or cannot be decoded.
    async fn upcoming_movies(&self, page: u32) -> ApiResult<PagedResponse<MovieSummary>>;

    /// Movies now in theatres.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rate limited, fails or cannot be decoded.
    async fn now_playing_movies(&self, page: u32) -> ApiResult<PagedResponse<MovieSummary>>;

    /// Filtered and sorted movie discovery.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rate limited, fails or cannot be decoded.
    async fn discover_movies(
        &self,
        params: &DiscoverParams,
    ) -> ApiResult<PagedResponse<MovieSummary>>;

    /// Filtered and sorted TV discovery.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rate limited, fails or cannot be decoded.
    async fn discover_tv(&self, params: &DiscoverParams) -> ApiResult<PagedResponse<SeriesSummary>>;

    /// Genre list of `media`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rate limited, fails or cannot be decoded.
    async fn genres(&self, media: MediaType) -> ApiResult<GenreList>;

    /// Movie details with credits, videos, similar and recommended titles.
    ///
    /// Related resources are best effort: a failed sub-request leaves its
    /// field `None`.
    ///
    /// # Errors
    ///
    /// Returns the error of the primary details request.
    async fn movie_details(&self, id: u64) -> ApiResult<MovieDetails>;

    /// Series details with credits, videos, similar and recommended titles.
    ///
    /// Related resources are best effort: a failed sub-request leaves its
    /// field `None`.
    ///
    /// # Errors
    ///
    /// Returns the error of the primary details request.
    async fn tv_details(&self, id: u64) -> ApiResult<TvDetails>;
}
