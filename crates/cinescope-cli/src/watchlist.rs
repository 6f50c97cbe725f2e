//! Personal watchlist stored as TOML next to the config file.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use cinescope_api::catalog::MediaType;
use serde::{Deserialize, Serialize};

/// Viewing priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Someday.
    Low,
    /// Default.
    #[default]
    Medium,
    /// Next up.
    High,
}

/// One saved title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistItem {
    /// Stable item ID (`{media_type}-{media_id}`).
    pub id: String,
    /// Catalog ID.
    pub media_id: u64,
    /// Movie or series.
    pub media_type: MediaType,
    /// Display title.
    pub title: String,
    /// Poster image path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    /// Release or first air date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// When the item was added.
    pub added_at: DateTime<Utc>,
    /// Whether it has been watched.
    #[serde(default)]
    pub watched: bool,
    /// When it was marked watched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watched_at: Option<DateTime<Utc>>,
    /// Personal rating (1-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Viewing priority.
    #[serde(default)]
    pub priority: Priority,
}

impl WatchlistItem {
    /// Creates an unwatched item added at `now`.
    pub fn new(
        media_type: MediaType,
        media_id: u64,
        title: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: item_id(media_type, media_id),
            media_id,
            media_type,
            title: title.into(),
            poster_path: None,
            release_date: None,
            added_at: now,
            watched: false,
            watched_at: None,
            rating: None,
            notes: None,
            priority: Priority::default(),
        }
    }
}

/// Item ID for a catalog entry.
#[must_use]
pub fn item_id(media_type: MediaType, media_id: u64) -> String {
    format!("{media_type}-{media_id}")
}

/// Saved titles in insertion order.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watchlist {
    #[serde(default)]
    items: Vec<WatchlistItem>,
}

impl Watchlist {
    /// Loads the watchlist. Returns an empty list if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves the watchlist, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content =
            toml::to_string_pretty(self).context("failed to serialize watchlist to TOML")?;
        std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Saved items.
    #[must_use]
    pub fn items(&self) -> &[WatchlistItem] {
        &self.items
    }

    /// Adds `item` unless an item with the same ID exists. Returns whether it was added.
    pub fn add(&mut self, item: WatchlistItem) -> bool {
        if self.items.iter().any(|existing| existing.id == item.id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Removes the item with `id`. Returns whether something was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Flips the watched flag of `id`, stamping or clearing `watched_at`.
    ///
    /// Returns the new flag, or `None` if no such item exists.
    pub fn toggle_watched(&mut self, id: &str, now: DateTime<Utc>) -> Option<bool> {
        let item = self.items.iter_mut().find(|item| item.id == id)?;
        item.watched = !item.watched;
        item.watched_at = item.watched.then_some(now);
        Some(item.watched)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use chrono::TimeZone;

    use super::*;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_add_is_idempotent_per_media() {
        // Arrange
        let mut list = Watchlist::default();

        // Act
        let first = list.add(WatchlistItem::new(MediaType::Movie, 268, "Batman", at(1)));
        let duplicate = list.add(WatchlistItem::new(MediaType::Movie, 268, "Batman", at(2)));
        let series = list.add(WatchlistItem::new(MediaType::Tv, 268, "Other", at(3)));

        // Assert
        assert!(first);
        assert!(!duplicate);
        assert!(series);
        assert_eq!(list.items().len(), 2);
        assert_eq!(list.items()[0].added_at, at(1));
    }

    #[test]
    fn test_toggle_stamps_and_clears_watched_at() {
        // Arrange
        let mut list = Watchlist::default();
        list.add(WatchlistItem::new(MediaType::Tv, 2098, "Batman: TAS", at(1)));

        // Act
        let on = list.toggle_watched("tv-2098", at(5));
        let watched_at = list.items()[0].watched_at;
        let off = list.toggle_watched("tv-2098", at(6));

        // Assert
        assert_eq!(on, Some(true));
        assert_eq!(watched_at, Some(at(5)));
        assert_eq!(off, Some(false));
        assert!(list.items()[0].watched_at.is_none());
        assert_eq!(list.toggle_watched("tv-1", at(7)), None);
    }

    #[test]
    fn test_remove() {
        // Arrange
        let mut list = Watchlist::default();
        list.add(WatchlistItem::new(MediaType::Movie, 155, "The Dark Knight", at(1)));

        // Act
        let removed = list.remove("movie-155");
        let again = list.remove("movie-155");

        // Assert
        assert!(removed);
        assert!(!again);
        assert!(list.items().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("watchlist.toml");
        let mut list = Watchlist::default();
        let mut item = WatchlistItem::new(MediaType::Movie, 268, "Batman", at(1));
        item.rating = Some(8);
        item.priority = Priority::High;
        item.notes = Some(String::from("Tim Burton"));
        list.add(item);
        list.toggle_watched("movie-268", at(2));

        // Act
        list.save(&path).unwrap();
        let loaded = Watchlist::load(&path).unwrap();

        // Assert
        assert_eq!(loaded, list);
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("2024-05-01T01:00:00Z"));
        assert!(content.contains("priority = \"high\""));
    }

    #[test]
    fn test_load_nonexistent_returns_empty() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();

        // Act
        let list = Watchlist::load(&dir.path().join("watchlist.toml")).unwrap();

        // Assert
        assert!(list.items().is_empty());
    }
}
