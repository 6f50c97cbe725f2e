//! `EnrichmentApi` trait definition.
#![allow(clippy::future_not_send)]

use super::parse::EnrichedTitle;
use super::types::{EnrichmentKind, EnrichmentSearch, EnrichmentTitle};
use crate::error::ApiResult;

/// Enrichment API trait.
///
/// Abstracts enrichment operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(EnrichmentApi: Send)]
pub trait LocalEnrichmentApi {
    /// Looks up a title by IMDb ID, with the full plot.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports no match.
    async fn by_imdb_id(&self, imdb_id: &str) -> ApiResult<EnrichmentTitle>;

    /// Searches titles, optionally narrowed by year and kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports no match.
    async fn search_by_title(
        &self,
        title: &str,
        year: Option<u32>,
        kind: Option<EnrichmentKind>,
    ) -> ApiResult<EnrichmentSearch>;

    /// Looks up the best match for a title, with the full plot.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports no match.
    async fn by_title(
        &self,
        title: &str,
        year: Option<u32>,
        kind: Option<EnrichmentKind>,
    ) -> ApiResult<EnrichmentTitle>;

    /// Looks up a title by IMDb ID and parses its text fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports no match.
    async fn enriched(&self, imdb_id: &str) -> ApiResult<EnrichedTitle>;
}
