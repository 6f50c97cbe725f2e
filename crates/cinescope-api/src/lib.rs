//! API client library for cinescope.
//!
//! Provides clients for the movie/TV catalog and the ratings enrichment
//! service, a shared response cache and rate limiter, and a service that
//! aggregates both upstreams with partial-failure tolerance.

/// Time-windowed response cache.
pub mod cache;

/// Catalog API client.
pub mod catalog;

/// Enrichment API client.
pub mod enrichment;

/// Normalized error type.
pub mod error;

mod http;

/// Combined catalog and enrichment operations.
pub mod media;

/// Fixed-window rate limiter.
pub mod rate_limiter;

pub use error::{ApiError, ApiResult, ErrorKind};
pub use media::{AllGenres, CombinedSearch, ContentLists, EnhancedDetails, MediaService};
