//! Per-service HTTP adapter: default parameters, rate limiting, caching and
//! error normalization around `reqwest`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

use crate::cache::{ResponseCache, SharedCache, cache_key};
use crate::error::{ApiError, ApiResult, ErrorKind};
use crate::rate_limiter::{RateLimitStatus, RateLimiter, SharedRateLimiter};

/// Default request timeout.
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Whether a read consults and populates the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CacheMode {
    /// Serve from cache when fresh, store successful bodies.
    Use,
    /// Always hit the network, never store.
    Bypass,
}

/// Validates a successful body before it is cached or decoded.
pub(crate) type BodyCheck = fn(&Value) -> ApiResult<()>;

/// Accepts every body.
pub(crate) const fn accept_body(_: &Value) -> ApiResult<()> {
    Ok(())
}

/// Settings shared by the catalog and enrichment client builders.
#[derive(Debug, Clone)]
pub(crate) struct AdapterSettings {
    pub service: &'static str,
    pub base_url: Url,
    pub default_query: Vec<(&'static str, String)>,
    pub user_agent: String,
    pub timeout: Duration,
    pub cache: Option<SharedCache>,
    pub rate_limiter: Option<SharedRateLimiter>,
}

/// HTTP adapter for one upstream service.
#[derive(Debug)]
pub(crate) struct HttpAdapter {
    service: &'static str,
    http_client: Client,
    base_url: Url,
    default_query: Vec<(&'static str, String)>,
    cache: SharedCache,
    rate_limiter: SharedRateLimiter,
}

impl HttpAdapter {
    /// Builds the adapter, creating a private cache and limiter when none are shared.
    ///
    /// # Errors
    ///
    /// Returns an error if the `reqwest::Client` cannot be built.
    pub fn new(settings: AdapterSettings) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(&settings.user_agent)
            .timeout(settings.timeout)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            service: settings.service,
            http_client,
            base_url: settings.base_url,
            default_query: settings.default_query,
            cache: settings
                .cache
                .unwrap_or_else(|| Arc::new(Mutex::new(ResponseCache::default()))),
            rate_limiter: settings
                .rate_limiter
                .unwrap_or_else(|| Arc::new(Mutex::new(RateLimiter::with_default_quotas()))),
        })
    }

    /// Base URL requests are resolved against.
    #[cfg(test)]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a GET request and decodes the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] classified by [`ErrorKind`].
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        mode: CacheMode,
        check: BodyCheck,
    ) -> ApiResult<T> {
        let body = self.get_value(path, query, mode, check).await?;
        serde_json::from_value(body).map_err(|e| {
            ApiError::new(
                ErrorKind::Unknown,
                format!("failed to decode {} response: {path}", self.service),
            )
            .with_source(e)
        })
    }

    /// Cache lookup, rate limit, dispatch, normalization and write-through.
    async fn get_value(
        &self,
        path: &str,
        query: &[(&str, String)],
        mode: CacheMode,
        check: BodyCheck,
    ) -> ApiResult<Value> {
        let key = cache_key(&format!("{}:{path}", self.service), query);

        if mode == CacheMode::Use
            && let Some(hit) = self.cache.lock().await.get(&key).cloned()
        {
            tracing::debug!(service = self.service, %path, "cache hit");
            return Ok(hit);
        }

        self.admit().await?;

        let url = self.endpoint(path)?;
        let request = self
            .http_client
            .get(url)
            .query(&self.default_query)
            .query(query);

        tracing::debug!(service = self.service, %path, "GET");
        let body = self.execute(request).await?;
        check(&body)?;

        if mode == CacheMode::Use {
            self.cache.lock().await.set(key, body.clone());
        }
        Ok(body)
    }

    /// Sends a POST request with a JSON body. Never cached.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] classified by [`ErrorKind`].
    pub async fn post_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        query: &[(&str, String)],
        payload: &B,
    ) -> ApiResult<T> {
        self.admit().await?;

        let url = self.endpoint(path)?;
        let request = self
            .http_client
            .post(url)
            .query(&self.default_query)
            .query(query)
            .json(payload);

        tracing::debug!(service = self.service, %path, "POST");
        let body = self.execute(request).await?;
        serde_json::from_value(body).map_err(|e| {
            ApiError::new(
                ErrorKind::Unknown,
                format!("failed to decode {} response: {path}", self.service),
            )
            .with_source(e)
        })
    }

    /// Drops every cached response of this service.
    pub async fn clear_cache(&self) -> usize {
        let prefix = format!("{}:", self.service);
        self.cache.lock().await.remove_prefix(&prefix)
    }

    /// Rate limit snapshot of this service. Counts as a request when allowed.
    pub async fn rate_limit_status(&self) -> RateLimitStatus {
        self.rate_limiter.lock().await.status(self.service)
    }

    /// Consults the rate limiter.
    async fn admit(&self) -> ApiResult<()> {
        let mut limiter = self.rate_limiter.lock().await;
        if limiter.is_allowed(self.service) {
            return Ok(());
        }
        let wait = limiter.time_until_reset(self.service);
        drop(limiter);

        let secs = wait.as_millis().div_ceil(1_000);
        tracing::warn!(
            service = self.service,
            retry_in_ms = wait.as_millis(),
            "rate limit exceeded, request rejected"
        );
        Err(ApiError::rate_limited(u64::try_from(secs).unwrap_or(u64::MAX)))
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| {
                ApiError::new(ErrorKind::Unknown, format!("invalid request path: {path}"))
                    .with_source(e)
            })
    }

    /// Sends `request` and turns the outcome into a JSON body or a normalized error.
    async fn execute(&self, request: reqwest::RequestBuilder) -> ApiResult<Value> {
        let response = request.send().await.map_err(|e| {
            tracing::debug!(service = self.service, error = %e, "transport failure");
            ApiError::network(e)
        })?;

        let status = response.status();
        let text = response.text().await.map_err(ApiError::network)?;

        if !status.is_success() {
            return Err(upstream_error(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            ApiError::new(
                ErrorKind::Unknown,
                format!("{} returned a body that is not JSON", self.service),
            )
            .with_source(e)
        })
    }
}

/// Builds the error for a non-success response.
///
/// Prefers the catalog's `status_message`, then the enrichment `Error`
/// field, then the canonical reason phrase.
fn upstream_error(status: StatusCode, body: &str) -> ApiError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|v| v.get(name))
            .and_then(Value::as_str)
            .map(String::from)
    };

    let message = field("status_message")
        .or_else(|| field("Error"))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map_or_else(|| format!("HTTP {status}"), String::from)
        });

    let mut err = ApiError::new(ErrorKind::Upstream, message).with_status(status.as_u16());
    if let Some(code) = parsed
        .as_ref()
        .and_then(|v| v.get("status_code"))
        .and_then(Value::as_u64)
    {
        err = err.with_upstream_code(code.to_string());
    }
    err
}
