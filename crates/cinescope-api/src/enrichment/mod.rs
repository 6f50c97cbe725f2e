//! Enrichment API client module.
//!
//! Ratings, plot, crew and box-office data keyed by IMDb ID or title,
//! plus total parsers for the service's text-typed fields.

mod api;
mod client;
mod parse;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{EnrichmentApi, LocalEnrichmentApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{EnrichmentClient, EnrichmentClientBuilder};
pub use parse::{
    EnrichedTitle, EnrichmentResult, Ratings, extract_ratings, parse_box_office, parse_list,
    parse_runtime,
};
#[allow(clippy::module_name_repetitions)]
pub use types::{
    EnrichmentKind, EnrichmentRating, EnrichmentSearch, EnrichmentSearchItem, EnrichmentTitle,
    NOT_AVAILABLE,
};
