//! Aggregation over the catalog and enrichment services.
//!
//! Fan-out operations run their branches concurrently and report each
//! branch independently: a failed branch is logged and becomes `None`,
//! it never fails the whole call or cancels its siblings.

use serde::Serialize;
use tracing::instrument;

use crate::catalog::{
    Genre, LocalCatalogApi, MediaDetails, MediaType, MovieDetails, MovieSummary, PagedResponse,
    SearchParams, SeriesSummary, TimeWindow, TvDetails, year_of,
};
use crate::enrichment::{EnrichedTitle, EnrichmentKind, EnrichmentSearch, LocalEnrichmentApi};
use crate::error::ApiResult;

/// Result of [`MediaService::search_media`].
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedSearch {
    /// Catalog movie matches.
    pub movies: Option<PagedResponse<MovieSummary>>,
    /// Catalog series matches.
    pub tv: Option<PagedResponse<SeriesSummary>>,
    /// Enrichment title matches.
    pub enrichment: Option<EnrichmentSearch>,
}

impl CombinedSearch {
    /// Whether every branch failed.
    #[must_use]
    pub const fn all_failed(&self) -> bool {
        self.movies.is_none() && self.tv.is_none() && self.enrichment.is_none()
    }
}

/// Movie and series listings fetched side by side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentLists {
    /// Movie listing.
    pub movies: Option<PagedResponse<MovieSummary>>,
    /// Series listing.
    pub tv: Option<PagedResponse<SeriesSummary>>,
}

/// Movie and series genre lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllGenres {
    /// Movie genres.
    pub movies: Option<Vec<Genre>>,
    /// Series genres.
    pub tv: Option<Vec<Genre>>,
}

/// Catalog details with best-effort enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedDetails {
    /// Catalog record.
    pub catalog: MediaDetails,
    /// Enrichment record, when it could be found.
    pub enrichment: Option<EnrichedTitle>,
}

/// Combines a catalog and an enrichment client.
#[derive(Debug)]
pub struct MediaService<C, E> {
    catalog: C,
    enrichment: E,
}

impl<C, E> MediaService<C, E>
where
    C: LocalCatalogApi + Sync,
    E: LocalEnrichmentApi + Sync,
{
    /// Creates a service over the two clients.
    pub const fn new(catalog: C, enrichment: E) -> Self {
        Self {
            catalog,
            enrichment,
        }
    }

    /// Catalog client.
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Enrichment client.
    pub const fn enrichment(&self) -> &E {
        &self.enrichment
    }

    /// Searches catalog movies, catalog series and enrichment titles at once.
    #[instrument(skip(self))]
    pub async fn search_media(&self, query: &str, page: u32) -> CombinedSearch {
        let params = SearchParams::new(query).page(page);
        let (movies, tv, enrichment) = futures::join!(
            self.catalog.search_movies(&params),
            self.catalog.search_tv(&params),
            self.enrichment.search_by_title(query, None, None),
        );

        let combined = CombinedSearch {
            movies: settle("catalog movie search", movies),
            tv: settle("catalog series search", tv),
            enrichment: settle("enrichment search", enrichment),
        };
        if combined.all_failed() {
            tracing::warn!(query, "every search branch failed");
        }
        combined
    }

    /// Full catalog details plus enrichment data when it can be found.
    ///
    /// Movies are matched by IMDb ID; series by a title and year search.
    ///
    /// # Errors
    ///
    /// Returns the catalog error when the details themselves cannot be
    /// fetched. Enrichment failures never surface.
    #[instrument(skip(self))]
    pub async fn enhanced_details(&self, id: u64, media: MediaType) -> ApiResult<EnhancedDetails> {
        match media {
            MediaType::Movie => {
                let details = self.catalog.movie_details(id).await?;
                let enrichment = self.enrich_movie(&details).await;
                Ok(EnhancedDetails {
                    catalog: MediaDetails::Movie(Box::new(details)),
                    enrichment,
                })
            }
            MediaType::Tv => {
                let details = self.catalog.tv_details(id).await?;
                let enrichment = self.enrich_series(&details).await;
                Ok(EnhancedDetails {
                    catalog: MediaDetails::Tv(Box::new(details)),
                    enrichment,
                })
            }
        }
    }

    async fn enrich_movie(&self, details: &MovieDetails) -> Option<EnrichedTitle> {
        let imdb_id = details.imdb_id.as_deref().filter(|id| !id.is_empty())?;
        settle("enrichment lookup", self.enrichment.enriched(imdb_id).await)
    }

    async fn enrich_series(&self, details: &TvDetails) -> Option<EnrichedTitle> {
        let name = details.display_name();
        if name.is_empty() {
            return None;
        }
        let year = details.first_air_date.as_deref().and_then(year_of);

        let search = settle(
            "enrichment series search",
            self.enrichment
                .search_by_title(name, year, Some(EnrichmentKind::Series))
                .await,
        )?;
        let first = search.search.first()?;
        settle(
            "enrichment lookup",
            self.enrichment.enriched(&first.imdb_id).await,
        )
    }

    /// Trending movies and series.
    #[instrument(skip(self))]
    pub async fn trending_content(&self, window: TimeWindow) -> ContentLists {
        let (movies, tv) = futures::join!(
            self.catalog.trending_movies(window),
            self.catalog.trending_tv(window),
        );
        ContentLists {
            movies: settle("trending movies", movies),
            tv: settle("trending series", tv),
        }
    }

    /// Popular movies and series.
    #[instrument(skip(self))]
    pub async fn popular_content(&self, page: u32) -> ContentLists {
        let (movies, tv) = futures::join!(
            self.catalog.popular_movies(page),
            self.catalog.popular_tv(page),
        );
        ContentLists {
            movies: settle("popular movies", movies),
            tv: settle("popular series", tv),
        }
    }

    /// Top-rated movies and series.
    #[instrument(skip(self))]
    pub async fn top_rated_content(&self, page: u32) -> ContentLists {
        let (movies, tv) = futures::join!(
            self.catalog.top_rated_movies(page),
            self.catalog.top_rated_tv(page),
        );
        ContentLists {
            movies: settle("top-rated movies", movies),
            tv: settle("top-rated series", tv),
        }
    }

    /// Movie and series genres.
    #[instrument(skip(self))]
    pub async fn all_genres(&self) -> AllGenres {
        let (movies, tv) = futures::join!(
            self.catalog.genres(MediaType::Movie),
            self.catalog.genres(MediaType::Tv),
        );
        AllGenres {
            movies: settle("movie genres", movies).map(|list| list.genres),
            tv: settle("series genres", tv).map(|list| list.genres),
        }
    }
}

/// Keeps a branch's value, logging and dropping its error.
fn settle<T>(branch: &'static str, result: ApiResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(branch, code = %e.kind(), error = %e, "branch failed");
            None
        }
    }
}
