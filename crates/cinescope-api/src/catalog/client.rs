//! `CatalogClient` - catalog API client implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use super::api::LocalCatalogApi;
use super::params::{DiscoverParams, SearchParams};
use super::types::{
    Credits, GenreList, GuestSession, ImageKind, ImageSize, MediaType, MovieDetails,
    MovieSummary, PagedResponse, SeriesSummary, StatusResponse, TimeWindow, TvDetails, VideoList,
    image_size,
};
use crate::cache::SharedCache;
use crate::error::{ApiError, ApiResult, ErrorKind};
use crate::http::{AdapterSettings, CacheMode, DEFAULT_TIMEOUT, HttpAdapter, accept_body};
use crate::rate_limiter::{CATALOG_SERVICE, RateLimitStatus, SharedRateLimiter};

/// Default base URL for the catalog API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default base URL for catalog images.
const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Default User-Agent.
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const INVALID_KEY_MESSAGE: &str = "Invalid catalog API key. Please check your configuration.";
const NOT_FOUND_MESSAGE: &str = "The requested resource was not found.";

/// Catalog API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClient {
    /// Shared request pipeline.
    adapter: HttpAdapter,
    /// Base URL for image links.
    image_base_url: Url,
}

/// Builder for `CatalogClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct CatalogClientBuilder {
    base_url: Option<Url>,
    image_base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    cache: Option<SharedCache>,
    rate_limiter: Option<SharedRateLimiter>,
}

impl CatalogClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            image_base_url: None,
            api_key: None,
            user_agent: None,
            timeout: None,
            cache: None,
            rate_limiter: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Overrides the image base URL.
    #[must_use]
    pub fn image_base_url(mut self, url: Url) -> Self {
        self.image_base_url = Some(url);
        self
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the User-Agent (default: crate name and version).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the request timeout (default: 10s).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Shares a response cache with other clients.
    #[must_use]
    pub fn cache(mut self, cache: SharedCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Shares a rate limiter with other clients.
    #[must_use]
    pub fn rate_limiter(mut self, limiter: SharedRateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_key` is not set or empty.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<CatalogClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .context("api_key is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?
        };
        let image_base_url = if let Some(url) = self.image_base_url {
            url
        } else {
            Url::parse(DEFAULT_IMAGE_BASE_URL).context("invalid default image base URL")?
        };

        let adapter = HttpAdapter::new(AdapterSettings {
            service: CATALOG_SERVICE,
            base_url,
            default_query: vec![("api_key", api_key)],
            user_agent: self
                .user_agent
                .unwrap_or_else(|| String::from(DEFAULT_USER_AGENT)),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            cache: self.cache,
            rate_limiter: self.rate_limiter,
        })?;

        Ok(CatalogClient {
            adapter,
            image_base_url,
        })
    }
}

impl CatalogClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::new()
    }

    /// Full image URL for `path` at the size mapped from `kind` and `size`.
    ///
    /// Returns `None` when `path` is empty.
    #[must_use]
    pub fn image_url(&self, path: &str, kind: ImageKind, size: ImageSize) -> Option<String> {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return None;
        }
        let base = self.image_base_url.as_str().trim_end_matches('/');
        Some(format!("{base}/{}/{path}", image_size(kind, size)))
    }

    /// Drops every cached catalog response.
    pub async fn clear_cache(&self) -> usize {
        self.adapter.clear_cache().await
    }

    /// Rate limit snapshot of the catalog service.
    pub async fn rate_limit_status(&self) -> RateLimitStatus {
        self.adapter.rate_limit_status().await
    }

    /// Primary movie record only, without credits, videos or related titles.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the movie does not exist.
    #[instrument(skip(self))]
    pub async fn movie(&self, id: u64) -> ApiResult<MovieDetails> {
        self.get(&format!("movie/{id}"), &[]).await
    }

    /// Primary series record only, without credits, videos or related titles.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the series does not exist.
    #[instrument(skip(self))]
    pub async fn tv(&self, id: u64) -> ApiResult<TvDetails> {
        self.get(&format!("tv/{id}"), &[]).await
    }

    /// Opens a guest session for rating titles. Never served from cache.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or is rate limited.
    #[instrument(skip_all)]
    pub async fn create_guest_session(&self) -> ApiResult<GuestSession> {
        self.adapter
            .get_json(
                "authentication/guest_session/new",
                &[],
                CacheMode::Bypass,
                accept_body,
            )
            .await
            .map_err(refine_error)
    }

    /// Rates a movie or series as `session` (0.5 to 10.0 in steps of 0.5).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails, the value is rejected
    /// or the title does not exist.
    #[instrument(skip(self, session))]
    pub async fn rate(
        &self,
        media: MediaType,
        id: u64,
        value: f64,
        session: &GuestSession,
    ) -> ApiResult<StatusResponse> {
        let path = format!("{}/{id}/rating", media.as_path());
        self.adapter
            .post_json(
                &path,
                &[("guest_session_id", session.guest_session_id.clone())],
                &serde_json::json!({ "value": value }),
            )
            .await
            .map_err(refine_error)
    }

    /// Cached GET with catalog-specific error refinement.
    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        self.adapter
            .get_json(path, query, CacheMode::Use, accept_body)
            .await
            .map_err(refine_error)
    }

    /// Page listing such as `movie/popular`.
    async fn listing<T: DeserializeOwned>(&self, path: &str, page: u32) -> ApiResult<T> {
        self.get(path, &[("page", page.to_string())]).await
    }

    /// Best-effort related resource (`{base}/{resource}`).
    async fn related<T: DeserializeOwned>(&self, base: &str, resource: &str) -> Option<T> {
        let path = format!("{base}/{resource}");
        match self.get(&path, &[]).await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%path, kind = %e.kind(), error = %e, "related resource unavailable");
                None
            }
        }
    }
}

/// Maps authentication and missing-resource statuses to their own kinds.
fn refine_error(err: ApiError) -> ApiError {
    if err.kind() != ErrorKind::Upstream {
        return err;
    }
    match err.status() {
        Some(401) => err.reclassify(ErrorKind::InvalidCredentials, INVALID_KEY_MESSAGE),
        Some(404) => err.reclassify(ErrorKind::NotFound, NOT_FOUND_MESSAGE),
        _ => err,
    }
}

impl LocalCatalogApi for CatalogClient {
    #[instrument(skip_all)]
    async fn search_movies(&self, params: &SearchParams) -> ApiResult<PagedResponse<MovieSummary>> {
        self.get("search/movie", &params.to_query(MediaType::Movie))
            .await
    }

    #[instrument(skip_all)]
    async fn search_tv(&self, params: &SearchParams) -> ApiResult<PagedResponse<SeriesSummary>> {
        self.get("search/tv", &params.to_query(MediaType::Tv)).await
    }

    #[instrument(skip_all)]
    async fn trending_movies(
        &self,
        window: TimeWindow,
    ) -> ApiResult<PagedResponse<MovieSummary>> {
        let path = format!("trending/movie/{}", window.as_path());
        self.get(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn trending_tv(&self, window: TimeWindow) -> ApiResult<PagedResponse<SeriesSummary>> {
        let path = format!("trending/tv/{}", window.as_path());
        self.get(&path, &[]).await
    }

    #[instrument(skip_all)]
    async fn popular_movies(&self, page: u32) -> ApiResult<PagedResponse<MovieSummary>> {
        self.listing("movie/popular", page).await
    }

    #[instrument(skip_all)]
    async fn popular_tv(&self, page: u32) -> ApiResult<PagedResponse<SeriesSummary>> {
        self.listing("tv/popular", page).await
    }

    #[instrument(skip_all)]
    async fn top_rated_movies(&self, page: u32) -> ApiResult<PagedResponse<MovieSummary>> {
        self.listing("movie/top_rated", page).await
    }

    #[instrument(skip_all)]
    async fn top_rated_tv(&self, page: u32) -> ApiResult<PagedResponse<SeriesSummary>> {
        self.listing("tv/top_rated", page).await
    }

    #[instrument(skip_all)]
    async fn upcoming_movies(&self, page: u32) -> ApiResult<PagedResponse<MovieSummary>> {
        self.listing("movie/upcoming", page).await
    }

    #[instrument(skip_all)]
    async fn now_playing_movies(&self, page: u32) -> ApiResult<PagedResponse<MovieSummary>> {
        self.listing("movie/now_playing", page).await
    }

    #[instrument(skip_all)]
    async fn discover_movies(
        &self,
        params: &DiscoverParams,
    ) -> ApiResult<PagedResponse<MovieSummary>> {
        self.get("discover/movie", &params.to_query(MediaType::Movie))
            .await
    }

    #[instrument(skip_all)]
    async fn discover_tv(&self, params: &DiscoverParams) -> ApiResult<PagedResponse<SeriesSummary>> {
        self.get("discover/tv", &params.to_query(MediaType::Tv))
            .await
    }

    #[instrument(skip_all)]
    async fn genres(&self, media: MediaType) -> ApiResult<GenreList> {
        let path = format!("genre/{media}/list");
        self.get(&path, &[]).await
    }

    #[instrument(skip(self))]
    async fn movie_details(&self, id: u64) -> ApiResult<MovieDetails> {
        let base = format!("movie/{id}");
        let (details, credits, videos, similar, recommendations) = futures::join!(
            self.get::<MovieDetails>(&base, &[]),
            self.related::<Credits>(&base, "credits"),
            self.related::<VideoList>(&base, "videos"),
            self.related::<PagedResponse<MovieSummary>>(&base, "similar"),
            self.related::<PagedResponse<MovieSummary>>(&base, "recommendations"),
        );

        let mut details = details?;
        details.credits = credits;
        details.videos = videos;
        details.similar = similar;
        details.recommendations = recommendations;
        Ok(details)
    }

    #[instrument(skip(self))]
    async fn tv_details(&self, id: u64) -> ApiResult<TvDetails> {
        let base = format!("tv/{id}");
        let (details, credits, videos, similar, recommendations) = futures::join!(
            self.get::<TvDetails>(&base, &[]),
            self.related::<Credits>(&base, "credits"),
            self.related::<VideoList>(&base, "videos"),
            self.related::<PagedResponse<SeriesSummary>>(&base, "similar"),
            self.related::<PagedResponse<SeriesSummary>>(&base, "recommendations"),
        );

        let mut details = details?;
        details.credits = credits;
        details.videos = videos;
        details.similar = similar;
        details.recommendations = recommendations;
        Ok(details)
    }
}
