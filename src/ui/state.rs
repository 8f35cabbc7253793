//! Application state for the discography controller.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{Catalog, CatalogFilter, resolve_data_url};
use crate::config::PlaybackConfig;
use crate::model::{QueueEntry, Release};
use crate::player::{MediaSource, PlayQueue, Player, PlayerError};
use crate::router::{Detail, TopLevelView, ViewRouter};

/// Everything the session knows. Mutated only by `ui::update`.
pub struct AppState {
    // Catalog
    pub catalog: Catalog,
    /// Base joined onto relative asset paths
    pub data_base: String,

    // Search and filter state
    pub filter: CatalogFilter,
    pub visible_tracks: Vec<QueueEntry>,
    pub visible_collections: Vec<Arc<Release>>,

    // Playback
    pub queue: PlayQueue,
    pub player: Player,
    pub restart_threshold: Duration,

    // Navigation
    pub router: ViewRouter,

    pub status_message: String,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        data_base: String,
        playback: &PlaybackConfig,
        player: Player,
    ) -> Self {
        let mut state = Self {
            catalog,
            data_base,
            filter: CatalogFilter::default(),
            visible_tracks: Vec::new(),
            visible_collections: Vec::new(),
            queue: PlayQueue::new(playback.shuffle_enabled),
            player,
            restart_threshold: Duration::from_secs(playback.restart_threshold_secs),
            router: ViewRouter::new(),
            status_message: String::new(),
        };
        state.refresh_filtered();
        state
    }

    /// Recompute the derived lists from the full catalog.
    pub fn refresh_filtered(&mut self) {
        self.visible_tracks = self.filter.visible_tracks(&self.catalog);
        self.visible_collections = self.filter.collections(&self.catalog);
    }

    /// Loadable source for an entry.
    pub fn media_source(&self, entry: &QueueEntry) -> Result<MediaSource, PlayerError> {
        let file = entry
            .audio_file()
            .ok_or_else(|| PlayerError::NoSource(entry.title().to_string()))?;
        Ok(MediaSource::new(
            resolve_data_url(&self.data_base, file),
            entry.duration(),
        ))
    }

    /// Playable entries listed on screen, in display order.
    pub fn listed_entries(&self) -> Vec<QueueEntry> {
        match self.router.detail() {
            Some(Detail::Release(release)) => release.entries(),
            Some(Detail::Track(entry)) => vec![entry.clone()],
            None => match self.router.view() {
                TopLevelView::Tracks => self.visible_tracks.clone(),
                TopLevelView::Collections | TopLevelView::About => Vec::new(),
            },
        }
    }

    /// Releases listed on screen, in display order.
    pub fn listed_releases(&self) -> &[Arc<Release>] {
        match (self.router.detail(), self.router.view()) {
            (None, TopLevelView::Collections) => &self.visible_collections,
            _ => &[],
        }
    }
}
