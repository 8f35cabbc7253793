//! The catalog store.
//!
//! Holds the loaded discography for the whole session. Releases are shared
//! behind [`Arc`] so queue entries and navigation frames can point at them
//! without copying; nothing mutates the catalog after loading.

mod filter;
mod source;

pub use filter::CatalogFilter;
pub use source::{CatalogSource, load_catalog, resolve_data_url};

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::model::{ArtistInfo, Discography, QueueEntry, Release};

/// Immutable, loaded discography.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    artist: ArtistInfo,
    /// Releases, newest first
    releases: Vec<Arc<Release>>,
}

impl Catalog {
    /// Build the store from a parsed document.
    ///
    /// Releases are ordered newest first; undated releases sort last and keep
    /// their document order.
    pub fn new(discography: Discography) -> Self {
        let mut releases: Vec<Arc<Release>> =
            discography.releases.into_iter().map(Arc::new).collect();
        releases.sort_by_key(|r| Reverse(r.date()));
        Self {
            artist: discography.artist,
            releases,
        }
    }

    /// An empty catalog (used when loading fails).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    pub fn artist(&self) -> &ArtistInfo {
        &self.artist
    }

    /// All releases, newest first.
    pub fn releases(&self) -> &[Arc<Release>] {
        &self.releases
    }

    /// Look up a release (album, EP or single) by id.
    pub fn find_release(&self, id: &str) -> Option<&Arc<Release>> {
        self.releases.iter().find(|r| r.id == id)
    }

    /// Find a playable entry by route slug.
    ///
    /// Singles are checked first (their id is the slug), then tracks within
    /// every collection.
    pub fn find_track_by_slug(&self, slug: &str) -> Option<QueueEntry> {
        if let Some(single) = self
            .releases
            .iter()
            .find(|r| !r.is_collection() && r.id == slug)
        {
            return Some(QueueEntry::single(Arc::clone(single)));
        }

        self.releases.iter().find_map(|release| {
            release
                .tracks()
                .iter()
                .position(|t| t.route_slug() == Some(slug))
                .and_then(|i| QueueEntry::track(Arc::clone(release), i))
        })
    }

    /// Find a collection track by release id and 1-based index.
    pub fn find_track_by_number(&self, release_id: &str, number: usize) -> Option<QueueEntry> {
        let release = self.find_release(release_id)?;
        let position = number.checked_sub(1)?;
        QueueEntry::track(Arc::clone(release), position)
    }

    /// Every tag used by a release or any of its tracks, sorted.
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags = BTreeSet::new();
        for release in &self.releases {
            tags.extend(release.tags.iter().cloned());
            for track in release.tracks() {
                tags.extend(track.tags.iter().cloned());
            }
        }
        tags.into_iter().collect()
    }

    /// Every release year, newest first.
    pub fn all_years(&self) -> Vec<String> {
        let years: BTreeSet<&str> = self.releases.iter().filter_map(|r| r.year()).collect();
        years.into_iter().rev().map(str::to_string).collect()
    }

    /// The newest entry with an audio source, used to preload the player.
    pub fn latest_playable(&self) -> Option<QueueEntry> {
        self.releases.iter().find_map(|release| {
            if release.is_collection() {
                release
                    .entries()
                    .into_iter()
                    .next()
                    .filter(|e| e.audio_file().is_some())
            } else {
                let entry = QueueEntry::single(Arc::clone(release));
                entry.audio_file().is_some().then_some(entry)
            }
        })
    }
}
