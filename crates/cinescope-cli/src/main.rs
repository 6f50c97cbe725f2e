//! cinescope - movie and TV discovery CLI.

/// Application configuration (TOML).
mod config;
/// Personal watchlist (TOML).
mod watchlist;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::sync::Mutex;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{
    AppConfig, CATALOG_API_KEY_ENV, ENRICHMENT_API_KEY_ENV, resolve_config_path,
    resolve_watchlist_path,
};
use crate::watchlist::{Priority, Watchlist, WatchlistItem};
use cinescope_api::cache::{ResponseCache, SharedCache};
use cinescope_api::catalog::{
    CatalogClient, DiscoverParams, Genre, ImageKind, ImageSize, LocalCatalogApi, MediaDetails,
    MediaType, MovieSummary, PagedResponse, SeriesSummary, TimeWindow,
};
use cinescope_api::enrichment::EnrichmentClient;
use cinescope_api::rate_limiter::{
    CATALOG_SERVICE, ENRICHMENT_SERVICE, RateLimiter, SharedRateLimiter,
};
use cinescope_api::{ContentLists, EnhancedDetails, MediaService};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search movies, series and enrichment titles at once.
    Search(SearchArgs),
    /// Show trending movies and series.
    Trending(TrendingArgs),
    /// Show popular movies and series.
    Popular(PageArgs),
    /// Show top rated movies and series.
    TopRated(PageArgs),
    /// List movie and series genres.
    Genres,
    /// Discover titles by filter.
    Discover(DiscoverArgs),
    /// Show details with ratings from the enrichment service.
    Details(DetailsArgs),
    /// Manage the local watchlist.
    Watchlist(WatchlistCommand),
    /// Write a config file with default settings.
    Init(InitArgs),
}

/// Arguments for the `init` subcommand.
#[derive(clap::Args)]
struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    force: bool,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query.
    query: String,

    /// Result page.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for listing subcommands.
#[derive(clap::Args)]
struct PageArgs {
    /// Result page.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Trending window.
#[derive(Clone, Copy, ValueEnum)]
enum WindowArg {
    /// Last 24 hours.
    Day,
    /// Last 7 days.
    Week,
}

impl From<WindowArg> for TimeWindow {
    fn from(arg: WindowArg) -> Self {
        match arg {
            WindowArg::Day => Self::Day,
            WindowArg::Week => Self::Week,
        }
    }
}

/// Arguments for the `trending` subcommand.
#[derive(clap::Args)]
struct TrendingArgs {
    /// Time window.
    #[arg(long, value_enum, default_value = "day")]
    window: WindowArg,
}

/// Media kind argument.
#[derive(Clone, Copy, ValueEnum)]
enum MediaArg {
    /// Movies.
    Movie,
    /// TV series.
    Tv,
}

impl From<MediaArg> for MediaType {
    fn from(arg: MediaArg) -> Self {
        match arg {
            MediaArg::Movie => Self::Movie,
            MediaArg::Tv => Self::Tv,
        }
    }
}

/// Arguments for the `discover` subcommand.
#[derive(clap::Args)]
struct DiscoverArgs {
    /// Media kind.
    #[arg(value_enum)]
    media: MediaArg,

    /// Result page.
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Sort order (e.g. "vote_average.desc").
    #[arg(long)]
    sort_by: Option<String>,

    /// Genre IDs; comma for AND, pipe for OR.
    #[arg(long)]
    genres: Option<String>,

    /// Release year (movies) or first air date year (series).
    #[arg(long)]
    year: Option<u32>,

    /// Minimum vote average.
    #[arg(long)]
    min_rating: Option<f64>,

    /// Maximum vote average.
    #[arg(long)]
    max_rating: Option<f64>,

    /// Minimum runtime in minutes.
    #[arg(long)]
    min_runtime: Option<u32>,

    /// Maximum runtime in minutes.
    #[arg(long)]
    max_runtime: Option<u32>,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// Catalog ID.
    id: u64,

    /// Look up a series instead of a movie.
    #[arg(long)]
    tv: bool,
}

/// Arguments for the `watchlist` subcommand.
#[derive(clap::Args)]
struct WatchlistCommand {
    /// Watchlist subcommand to run.
    #[command(subcommand)]
    command: WatchlistSubcommands,
}

/// Available watchlist subcommands.
#[derive(Subcommand)]
enum WatchlistSubcommands {
    /// Add a title.
    Add(WatchlistAddArgs),
    /// List saved titles.
    List,
    /// Remove a title by item ID (e.g. "movie-268").
    Remove(WatchlistIdArgs),
    /// Toggle the watched flag by item ID.
    Toggle(WatchlistIdArgs),
}

/// Arguments for the `watchlist add` subcommand.
#[derive(clap::Args)]
struct WatchlistAddArgs {
    /// Catalog ID.
    id: u64,

    /// The ID is a series.
    #[arg(long)]
    tv: bool,

    /// Title; fetched from the catalog when omitted.
    #[arg(long)]
    title: Option<String>,

    /// Release or first air date.
    #[arg(long)]
    release_date: Option<String>,

    /// Viewing priority.
    #[arg(long, value_enum, default_value = "medium")]
    priority: Priority,

    /// Personal rating (1-10).
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    rating: Option<u8>,

    /// Free-form notes.
    #[arg(long)]
    notes: Option<String>,
}

/// Arguments identifying a watchlist item.
#[derive(clap::Args)]
struct WatchlistIdArgs {
    /// Item ID (e.g. "movie-268").
    item: String,
}

type Media = MediaService<CatalogClient, EnrichmentClient>;

/// Loads config from the data directory and applies `CINESCOPE_*` overrides.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or an override is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    let mut config = AppConfig::load(&path)?;
    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}

/// Shared cache and rate limiter for every client of this process.
fn shared_state(config: &AppConfig) -> (SharedCache, SharedRateLimiter) {
    let cache = Arc::new(Mutex::new(ResponseCache::new(config.cache)));
    let limiter = Arc::new(Mutex::new(RateLimiter::new(HashMap::from([
        (String::from(CATALOG_SERVICE), config.rate_limit.catalog),
        (String::from(ENRICHMENT_SERVICE), config.rate_limit.enrichment),
    ]))));
    (cache, limiter)
}

/// Builds a `CatalogClient` from config.
///
/// # Errors
///
/// Returns an error if the catalog API key is missing or the client fails to build.
#[instrument(skip_all)]
fn build_catalog_client(
    config: &AppConfig,
    cache: SharedCache,
    limiter: SharedRateLimiter,
) -> Result<CatalogClient> {
    let api_key = config.catalog_api_key()?;

    let mut builder = CatalogClient::builder()
        .api_key(api_key)
        .timeout(config.http.timeout())
        .cache(cache)
        .rate_limiter(limiter);
    if let Some(ref url) = config.catalog.base_url {
        builder = builder.base_url(url.clone());
    }
    if let Some(ref url) = config.catalog.image_base_url {
        builder = builder.image_base_url(url.clone());
    }
    builder.build().context("failed to build catalog client")
}

/// Builds an `EnrichmentClient` from config.
///
/// # Errors
///
/// Returns an error if the enrichment API key is missing or the client fails to build.
#[instrument(skip_all)]
fn build_enrichment_client(
    config: &AppConfig,
    cache: SharedCache,
    limiter: SharedRateLimiter,
) -> Result<EnrichmentClient> {
    let api_key = config.enrichment_api_key()?;

    let mut builder = EnrichmentClient::builder()
        .api_key(api_key)
        .timeout(config.http.timeout())
        .cache(cache)
        .rate_limiter(limiter);
    if let Some(ref url) = config.enrichment.base_url {
        builder = builder.base_url(url.clone());
    }
    builder.build().context("failed to build enrichment client")
}

/// Builds the media service over both clients sharing one cache and limiter.
///
/// # Errors
///
/// Returns an error if either API key is missing or a client fails to build.
fn build_media_service(dir: Option<&PathBuf>) -> Result<Media> {
    let config = load_config(dir)?;
    let (cache, limiter) = shared_state(&config);
    let catalog = build_catalog_client(&config, Arc::clone(&cache), Arc::clone(&limiter))?;
    let enrichment = build_enrichment_client(&config, cache, limiter)?;
    Ok(MediaService::new(catalog, enrichment))
}

fn log_movies(label: &str, movies: Option<&PagedResponse<MovieSummary>>) {
    let Some(movies) = movies else {
        tracing::info!("{label}: unavailable");
        return;
    };
    tracing::info!(
        "{label} (page {}/{}, {} total)",
        movies.page,
        movies.total_pages,
        movies.total_results
    );
    tracing::info!("ID\tRating\tRelease\t\tTitle");
    for movie in &movies.results {
        tracing::info!(
            "{}\t{:.1}\t{}\t{}",
            movie.id,
            movie.vote_average,
            movie.release_date.as_deref().unwrap_or("-"),
            movie.title,
        );
    }
}

fn log_series(label: &str, series: Option<&PagedResponse<SeriesSummary>>) {
    let Some(series) = series else {
        tracing::info!("{label}: unavailable");
        return;
    };
    tracing::info!(
        "{label} (page {}/{}, {} total)",
        series.page,
        series.total_pages,
        series.total_results
    );
    tracing::info!("ID\tRating\tFirstAir\tName");
    for show in &series.results {
        tracing::info!(
            "{}\t{:.1}\t{}\t{}",
            show.id,
            show.vote_average,
            show.first_air_date.as_deref().unwrap_or("-"),
            show.name,
        );
    }
}

fn log_content(lists: &ContentLists) {
    log_movies("Movies", lists.movies.as_ref());
    log_series("Series", lists.tv.as_ref());
}

fn log_genres(label: &str, genres: Option<&Vec<Genre>>) {
    let Some(genres) = genres else {
        tracing::info!("{label}: unavailable");
        return;
    };
    tracing::info!("{label} ({}):", genres.len());
    for genre in genres {
        tracing::info!("  {:>5}  {}", genre.id, genre.name);
    }
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the service fails to build or every source failed.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let media = build_media_service(dir)?;

    let results = media.search_media(&args.query, args.page).await;
    if results.all_failed() {
        anyhow::bail!("search for {:?} failed on every source", args.query);
    }

    log_movies("Movies", results.movies.as_ref());
    log_series("Series", results.tv.as_ref());
    match results.enrichment {
        Some(ref found) => {
            tracing::info!("Enrichment matches ({} total)", found.total_results);
            tracing::info!("IMDb ID\t\tYear\tType\tTitle");
            for item in &found.search {
                tracing::info!(
                    "{}\t{}\t{}\t{}",
                    item.imdb_id,
                    item.year,
                    item.kind,
                    item.title
                );
            }
        }
        None => tracing::info!("Enrichment matches: unavailable"),
    }
    Ok(())
}

/// Runs the `trending` subcommand.
///
/// # Errors
///
/// Returns an error if the service fails to build.
#[instrument(skip_all)]
async fn run_trending(args: &TrendingArgs, dir: Option<&PathBuf>) -> Result<()> {
    let media = build_media_service(dir)?;
    log_content(&media.trending_content(args.window.into()).await);
    Ok(())
}

/// Runs the `popular` subcommand.
///
/// # Errors
///
/// Returns an error if the service fails to build.
#[instrument(skip_all)]
async fn run_popular(args: &PageArgs, dir: Option<&PathBuf>) -> Result<()> {
    let media = build_media_service(dir)?;
    log_content(&media.popular_content(args.page).await);
    Ok(())
}

/// Runs the `top-rated` subcommand.
///
/// # Errors
///
/// Returns an error if the service fails to build.
#[instrument(skip_all)]
async fn run_top_rated(args: &PageArgs, dir: Option<&PathBuf>) -> Result<()> {
    let media = build_media_service(dir)?;
    log_content(&media.top_rated_content(args.page).await);
    Ok(())
}

/// Runs the `genres` subcommand.
///
/// # Errors
///
/// Returns an error if the service fails to build.
#[instrument(skip_all)]
async fn run_genres(dir: Option<&PathBuf>) -> Result<()> {
    let media = build_media_service(dir)?;
    let genres = media.all_genres().await;
    log_genres("Movie genres", genres.movies.as_ref());
    log_genres("Series genres", genres.tv.as_ref());
    Ok(())
}

/// Runs the `discover` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_discover(args: &DiscoverArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let (cache, limiter) = shared_state(&config);
    let client = build_catalog_client(&config, cache, limiter)?;

    let media = MediaType::from(args.media);
    let mut params = DiscoverParams {
        page: Some(args.page),
        sort_by: args.sort_by.clone(),
        with_genres: args.genres.clone(),
        vote_average_gte: args.min_rating,
        vote_average_lte: args.max_rating,
        with_runtime_gte: args.min_runtime,
        with_runtime_lte: args.max_runtime,
        ..DiscoverParams::default()
    };
    match media {
        MediaType::Movie => params.primary_release_year = args.year,
        MediaType::Tv => params.first_air_date_year = args.year,
    }

    match media {
        MediaType::Movie => {
            let movies = client
                .discover_movies(&params)
                .await
                .context("catalog discover/movie request failed")?;
            log_movies("Movies", Some(&movies));
        }
        MediaType::Tv => {
            let series = client
                .discover_tv(&params)
                .await
                .context("catalog discover/tv request failed")?;
            log_series("Series", Some(&series));
        }
    }
    Ok(())
}

fn log_catalog_details(media: &Media, details: &MediaDetails) {
    let (genres, credits) = match details {
        MediaDetails::Movie(movie) => {
            tracing::info!("ID: {} (movie)", movie.id);
            tracing::info!("Title: {}", movie.title);
            tracing::info!("Release: {}", movie.release_date.as_deref().unwrap_or("-"));
            tracing::info!(
                "Runtime: {}",
                movie
                    .runtime
                    .map_or_else(|| String::from("-"), |m| format!("{m} min"))
            );
            tracing::info!("IMDb ID: {}", movie.imdb_id.as_deref().unwrap_or("-"));
            tracing::info!("Rating: {:.1} ({} votes)", movie.vote_average, movie.vote_count);
            (&movie.genres, movie.credits.as_ref())
        }
        MediaDetails::Tv(tv) => {
            tracing::info!("ID: {} (tv)", tv.id);
            tracing::info!("Name: {}", tv.display_name());
            tracing::info!("First Air: {}", tv.first_air_date.as_deref().unwrap_or("-"));
            tracing::info!("Status: {}", tv.status.as_deref().unwrap_or("-"));
            tracing::info!("Seasons: {}", tv.number_of_seasons);
            tracing::info!("Episodes: {}", tv.number_of_episodes);
            tracing::info!("Rating: {:.1} ({} votes)", tv.vote_average, tv.vote_count);
            (&tv.genres, tv.credits.as_ref())
        }
    };

    let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
    tracing::info!("Genres: {}", names.join(", "));
    if let Some(url) = details.poster_path().and_then(|path| {
        media
            .catalog()
            .image_url(path, ImageKind::Poster, ImageSize::Medium)
    }) {
        tracing::info!("Poster: {url}");
    }
    if let Some(credits) = credits {
        tracing::info!("---");
        for member in credits.cast.iter().take(5) {
            tracing::info!(
                "  {} as {}",
                member.name,
                member.character.as_deref().unwrap_or("-")
            );
        }
    }
}

fn log_enhanced(media: &Media, details: &EnhancedDetails) {
    log_catalog_details(media, &details.catalog);

    let Some(ref enriched) = details.enrichment else {
        tracing::info!("Enrichment: unavailable");
        return;
    };
    let parsed = &enriched.parsed;
    tracing::info!("---");
    tracing::info!(
        "IMDb: {}",
        parsed
            .ratings
            .imdb
            .map_or_else(|| String::from("-"), |r| format!("{r:.1}"))
    );
    tracing::info!(
        "Rotten Tomatoes: {}",
        parsed
            .ratings
            .rotten_tomatoes
            .map_or_else(|| String::from("-"), |r| format!("{r}%"))
    );
    tracing::info!(
        "Metacritic: {}",
        parsed
            .ratings
            .metacritic
            .map_or_else(|| String::from("-"), |r| r.to_string())
    );
    if let Some(box_office) = parsed.box_office {
        tracing::info!("Box Office: ${box_office}");
    }
    if !parsed.directors.is_empty() {
        tracing::info!("Directors: {}", parsed.directors.join(", "));
    }
    if !enriched.raw.awards.is_empty() {
        tracing::info!("Awards: {}", enriched.raw.awards);
    }
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the service fails to build or the catalog lookup fails.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let media = build_media_service(dir)?;
    let kind = if args.tv {
        MediaType::Tv
    } else {
        MediaType::Movie
    };

    let details = media
        .enhanced_details(args.id, kind)
        .await
        .with_context(|| format!("catalog {kind}/{} request failed", args.id))?;
    log_enhanced(&media, &details);
    Ok(())
}

/// Fetches the title and release date of a catalog entry.
///
/// # Errors
///
/// Returns an error if the client fails to build or the lookup fails.
async fn fetch_listing_info(
    dir: Option<&PathBuf>,
    kind: MediaType,
    id: u64,
) -> Result<(String, Option<String>, Option<String>)> {
    let config = load_config(dir)?;
    let (cache, limiter) = shared_state(&config);
    let client = build_catalog_client(&config, cache, limiter)?;

    let details = match kind {
        MediaType::Movie => MediaDetails::Movie(Box::new(client.movie(id).await?)),
        MediaType::Tv => MediaDetails::Tv(Box::new(client.tv(id).await?)),
    };
    Ok((
        String::from(details.title()),
        details.release_date().map(String::from),
        details.poster_path().map(String::from),
    ))
}

/// Runs the `watchlist add` subcommand.
///
/// # Errors
///
/// Returns an error if the catalog lookup fails or the watchlist cannot be saved.
#[instrument(skip_all)]
async fn run_watchlist_add(args: &WatchlistAddArgs, dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_watchlist_path(dir)?;
    let mut list = Watchlist::load(&path)?;
    let kind = if args.tv {
        MediaType::Tv
    } else {
        MediaType::Movie
    };

    let (title, release_date, poster_path) = if let Some(ref title) = args.title {
        (title.clone(), args.release_date.clone(), None)
    } else {
        fetch_listing_info(dir, kind, args.id)
            .await
            .with_context(|| format!("failed to look up {kind}/{}", args.id))?
    };

    let mut item = WatchlistItem::new(kind, args.id, title, chrono::Utc::now());
    item.release_date = release_date;
    item.poster_path = poster_path;
    item.priority = args.priority;
    item.rating = args.rating;
    item.notes.clone_from(&args.notes);

    let id = item.id.clone();
    if list.add(item) {
        list.save(&path)?;
        tracing::info!("Added {id}");
    } else {
        tracing::info!("{id} is already on the watchlist");
    }
    Ok(())
}

/// Runs the `watchlist list` subcommand.
///
/// # Errors
///
/// Returns an error if the watchlist cannot be read.
fn run_watchlist_list(dir: Option<&PathBuf>) -> Result<()> {
    let list = Watchlist::load(&resolve_watchlist_path(dir)?)?;
    if list.items().is_empty() {
        tracing::info!("Watchlist is empty. Run `watchlist add` to save a title.");
        return Ok(());
    }

    tracing::info!("ID\t\tWatched\tPriority\tRating\tTitle");
    for item in list.items() {
        tracing::info!(
            "{}\t{}\t{:?}\t\t{}\t{}",
            item.id,
            if item.watched { "yes" } else { "no" },
            item.priority,
            item.rating
                .map_or_else(|| String::from("-"), |r| r.to_string()),
            item.title,
        );
    }
    tracing::info!("Total: {} titles", list.items().len());
    Ok(())
}

/// Runs the `watchlist remove` subcommand.
///
/// # Errors
///
/// Returns an error if the item does not exist or the watchlist cannot be saved.
fn run_watchlist_remove(args: &WatchlistIdArgs, dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_watchlist_path(dir)?;
    let mut list = Watchlist::load(&path)?;
    if !list.remove(&args.item) {
        anyhow::bail!("{} is not on the watchlist", args.item);
    }
    list.save(&path)?;
    tracing::info!("Removed {}", args.item);
    Ok(())
}

/// Runs the `watchlist toggle` subcommand.
///
/// # Errors
///
/// Returns an error if the item does not exist or the watchlist cannot be saved.
fn run_watchlist_toggle(args: &WatchlistIdArgs, dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_watchlist_path(dir)?;
    let mut list = Watchlist::load(&path)?;
    let watched = list
        .toggle_watched(&args.item, chrono::Utc::now())
        .with_context(|| format!("{} is not on the watchlist", args.item))?;
    list.save(&path)?;
    tracing::info!(
        "{} marked as {}",
        args.item,
        if watched { "watched" } else { "unwatched" }
    );
    Ok(())
}

/// Runs the `init` subcommand.
///
/// # Errors
///
/// Returns an error if the config exists and `--force` is not set, or the write fails.
fn run_init(args: &InitArgs, dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    if path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }

    AppConfig::default().save(&path)?;
    tracing::info!("Wrote {}", path.display());
    tracing::info!(
        "Set [catalog].api_key and [enrichment].api_key, or {} and {}",
        CATALOG_API_KEY_ENV,
        ENRICHMENT_API_KEY_ENV
    );
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Search(args) => run_search(&args, dir).await,
        Commands::Trending(args) => run_trending(&args, dir).await,
        Commands::Popular(args) => run_popular(&args, dir).await,
        Commands::TopRated(args) => run_top_rated(&args, dir).await,
        Commands::Genres => run_genres(dir).await,
        Commands::Discover(args) => run_discover(&args, dir).await,
        Commands::Details(args) => run_details(&args, dir).await,
        Commands::Watchlist(cmd) => match cmd.command {
            WatchlistSubcommands::Add(args) => run_watchlist_add(&args, dir).await,
            WatchlistSubcommands::List => run_watchlist_list(dir),
            WatchlistSubcommands::Remove(args) => run_watchlist_remove(&args, dir),
            WatchlistSubcommands::Toggle(args) => run_watchlist_toggle(&args, dir),
        },
        Commands::Init(args) => run_init(&args, dir),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::panic)]

    use super::*;
    use crate::watchlist::item_id;

    #[test]
    fn test_item_id_matches_cli_format() {
        // Arrange & Act & Assert
        assert_eq!(item_id(MediaType::from(MediaArg::Tv), 2098), "tv-2098");
        assert_eq!(TimeWindow::from(WindowArg::Week), TimeWindow::Week);
    }

    #[test]
    fn test_cli_parses_discover_filters() {
        // Arrange & Act
        let cli = Cli::try_parse_from([
            "cinescope",
            "discover",
            "movie",
            "--genres",
            "28,12",
            "--min-rating",
            "7.5",
            "--year",
            "1989",
        ]);

        // Assert
        let Ok(Cli {
            command: Commands::Discover(args),
            ..
        }) = cli
        else {
            panic!("expected discover command");
        };
        assert!(matches!(args.media, MediaArg::Movie));
        assert_eq!(args.genres.as_deref(), Some("28,12"));
        assert_eq!(args.year, Some(1989));
        assert_eq!(args.page, 1);
    }

    #[test]
    fn test_cli_rejects_out_of_range_rating() {
        // Arrange & Act
        let cli = Cli::try_parse_from([
            "cinescope",
            "watchlist",
            "add",
            "268",
            "--title",
            "Batman",
            "--rating",
            "11",
        ]);

        // Assert
        assert!(cli.is_err());
    }
}
