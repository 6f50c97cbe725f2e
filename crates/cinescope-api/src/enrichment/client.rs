//! `EnrichmentClient` - enrichment API client implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use super::api::LocalEnrichmentApi;
use super::parse::EnrichedTitle;
use super::types::{EnrichmentKind, EnrichmentSearch, EnrichmentTitle};
use crate::cache::SharedCache;
use crate::error::{ApiError, ApiResult, ErrorKind};
use crate::http::{AdapterSettings, CacheMode, DEFAULT_TIMEOUT, HttpAdapter};
use crate::rate_limiter::{ENRICHMENT_SERVICE, RateLimitStatus, SharedRateLimiter};

/// Default base URL for the enrichment API.
const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";

/// Default User-Agent.
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Upstream code attached to in-body failures.
const ENVELOPE_ERROR_CODE: &str = "ENRICHMENT_ERROR";

const INVALID_KEY_MESSAGE: &str = "Invalid enrichment API key. Please check your configuration.";

/// Enrichment API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct EnrichmentClient {
    /// Shared request pipeline.
    adapter: HttpAdapter,
}

/// Builder for `EnrichmentClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct EnrichmentClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
    cache: Option<SharedCache>,
    rate_limiter: Option<SharedRateLimiter>,
}

impl EnrichmentClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
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
    pub fn build(self) -> Result<EnrichmentClient> {
        let api_key = self
            .api_key
            .filter(|key| !key.is_empty())
            .context("api_key is required")?;

        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?
        };

        let adapter = HttpAdapter::new(AdapterSettings {
            service: ENRICHMENT_SERVICE,
            base_url,
            default_query: vec![("apikey", api_key)],
            user_agent: self
                .user_agent
                .unwrap_or_else(|| String::from(DEFAULT_USER_AGENT)),
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            cache: self.cache,
            rate_limiter: self.rate_limiter,
        })?;

        Ok(EnrichmentClient { adapter })
    }
}

impl EnrichmentClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> EnrichmentClientBuilder {
        EnrichmentClientBuilder::new()
    }

    /// Drops every cached enrichment response.
    pub async fn clear_cache(&self) -> usize {
        self.adapter.clear_cache().await
    }

    /// Rate limit snapshot of the enrichment service.
    pub async fn rate_limit_status(&self) -> RateLimitStatus {
        self.adapter.rate_limit_status().await
    }

    /// Cached GET against the service root.
    async fn get<T: DeserializeOwned>(&self, query: &[(&str, String)]) -> ApiResult<T> {
        self.adapter
            .get_json("", query, CacheMode::Use, check_envelope)
            .await
            .map_err(refine_error)
    }
}

/// Rejects `{"Response": "False", "Error": "..."}` bodies.
fn check_envelope(body: &Value) -> ApiResult<()> {
    if body.get("Response").and_then(Value::as_str) != Some("False") {
        return Ok(());
    }
    let message = body
        .get("Error")
        .and_then(Value::as_str)
        .unwrap_or("Unknown enrichment error");
    Err(ApiError::new(ErrorKind::Upstream, message)
        .with_status(400)
        .with_upstream_code(ENVELOPE_ERROR_CODE))
}

fn refine_error(err: ApiError) -> ApiError {
    if err.kind() == ErrorKind::Upstream && err.status() == Some(401) {
        err.reclassify(ErrorKind::InvalidCredentials, INVALID_KEY_MESSAGE)
    } else {
        err
    }
}

fn title_query(
    key: &'static str,
    title: &str,
    year: Option<u32>,
    kind: Option<EnrichmentKind>,
) -> Vec<(&'static str, String)> {
    let mut query = vec![(key, String::from(title))];
    if let Some(year) = year {
        query.push(("y", year.to_string()));
    }
    if let Some(kind) = kind {
        query.push(("type", String::from(kind.as_str())));
    }
    query
}

impl LocalEnrichmentApi for EnrichmentClient {
    #[instrument(skip(self))]
    async fn by_imdb_id(&self, imdb_id: &str) -> ApiResult<EnrichmentTitle> {
        let query = [("i", String::from(imdb_id)), ("plot", String::from("full"))];
        self.get(&query).await
    }

    #[instrument(skip(self))]
    async fn search_by_title(
        &self,
        title: &str,
        year: Option<u32>,
        kind: Option<EnrichmentKind>,
    ) -> ApiResult<EnrichmentSearch> {
        self.get(&title_query("s", title, year, kind)).await
    }

    #[instrument(skip(self))]
    async fn by_title(
        &self,
        title: &str,
        year: Option<u32>,
        kind: Option<EnrichmentKind>,
    ) -> ApiResult<EnrichmentTitle> {
        let mut query = title_query("t", title, year, kind);
        query.push(("plot", String::from("full")));
        self.get(&query).await
    }

    #[instrument(skip(self))]
    async fn enriched(&self, imdb_id: &str) -> ApiResult<EnrichedTitle> {
        self.by_imdb_id(imdb_id).await.map(EnrichedTitle::from)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> EnrichmentClient {
        EnrichmentClient::builder()
            .base_url(format!("{}/", server.uri()).parse().unwrap())
            .api_key("test-key")
            .user_agent("test/0.0.0")
            .timeout(Duration::from_millis(500))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_requires_api_key() {
        // Arrange & Act
        let result = EnrichmentClient::builder().build();

        // Assert
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("api_key is required")
        );
    }

    #[test]
    fn test_check_envelope() {
        // Arrange
        let ok = serde_json::json!({"Response": "True", "Title": "Batman"});
        let failed = serde_json::json!({"Response": "False", "Error": "Movie not found!"});

        // Act
        let err = check_envelope(&failed).unwrap_err();

        // Assert
        assert!(check_envelope(&ok).is_ok());
        assert_eq!(err.kind(), ErrorKind::Upstream);
        assert_eq!(err.status(), Some(400));
        assert_eq!(err.upstream_code(), Some("ENRICHMENT_ERROR"));
        assert_eq!(err.message(), "Movie not found!");
    }

    #[tokio::test]
    async fn test_by_imdb_id_via_http() {
        // Arrange
        let server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/enrichment/title_tt0096895.json");
        Mock::given(method("GET"))
            .and(path("/"))
            .and(query_param("apikey", "test-key"))
            .and(query_param("i", "tt0096895"))
            .and(query_param("plot", "full"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&server)
            .await;
        let client = client(&server);

        // Act
        let title = client.by_imdb_id("tt0096895").await.unwrap();
        let again = client.by_imdb_id("tt0096895").await.unwrap();

        // Assert
        assert_eq!(title.title, "Batman");
        assert_eq!(title, again);
    }

    #[tokio::test]
    async fn test_search_by_title_sends_optional_filters() {
        // Arrange
        let server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/enrichment/search_batman.json");
        Mock::given(method("GET"))
            .and(query_param("s", "batman"))
            .and(query_param("type", "movie"))
            .and(query_param_is_missing("y"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&server)
            .await;
        let client = client(&server);

        // Act
        let search = client
            .search_by_title("batman", None, Some(EnrichmentKind::Movie))
            .await
            .unwrap();

        // Assert
        assert_eq!(search.search[0].title, "Batman Begins");
    }

    #[tokio::test]
    async fn test_by_title_sends_year() {
        // Arrange
        let server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/enrichment/title_tt0096895.json");
        Mock::given(method("GET"))
            .and(query_param("t", "Batman"))
            .and(query_param("y", "1989"))
            .and(query_param("plot", "full"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&server)
            .await;
        let client = client(&server);

        // Act
        let title = client.by_title("Batman", Some(1989), None).await.unwrap();

        // Assert
        assert_eq!(title.imdb_id, "tt0096895");
    }

    #[tokio::test]
    async fn test_failure_envelope_is_error_and_not_cached() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#),
            )
            .expect(2)
            .mount(&server)
            .await;
        let client = client(&server);

        // Act
        let first = client.by_imdb_id("tt0000000").await.unwrap_err();
        let second = client.by_imdb_id("tt0000000").await.unwrap_err();

        // Assert
        assert_eq!(first.message(), "Incorrect IMDb ID.");
        assert_eq!(second.upstream_code(), Some("ENRICHMENT_ERROR"));
        assert_eq!(client.clear_cache().await, 0);
    }

    #[tokio::test]
    async fn test_401_is_invalid_credentials() {
        // Arrange
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"Response":"False","Error":"Invalid API key!"}"#),
            )
            .mount(&server)
            .await;
        let client = client(&server);

        // Act
        let err = client.by_imdb_id("tt0096895").await.unwrap_err();

        // Assert
        assert_eq!(err.kind(), ErrorKind::InvalidCredentials);
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.message(), INVALID_KEY_MESSAGE);
    }

    #[tokio::test]
    async fn test_enriched_parses_fields() {
        // Arrange
        let server = MockServer::start().await;
        let json_body = include_str!("../../../../fixtures/enrichment/title_tt0096895.json");
        Mock::given(method("GET"))
            .and(query_param("i", "tt0096895"))
            .respond_with(ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&server)
            .await;
        let client = client(&server);

        // Act
        let enriched = client.enriched("tt0096895").await.unwrap();

        // Assert
        assert_eq!(enriched.raw.title, "Batman");
        assert_eq!(enriched.parsed.runtime_minutes, Some(126));
        assert_eq!(enriched.parsed.ratings.metacritic, Some(69));
    }
}
