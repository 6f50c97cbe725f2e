//! Application configuration module.
//!
//! Manages the TOML config file holding API keys, cache, rate limit and
//! HTTP settings, with `CINESCOPE_*` environment overrides.

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, CATALOG_API_KEY_ENV, ENRICHMENT_API_KEY_ENV};
pub use paths::{resolve_config_path, resolve_watchlist_path};
