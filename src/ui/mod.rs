//! Controller for the discography browser.
//!
//! [`App`] owns the [`AppState`] and routes each [`Message`] to the handler
//! for its group. Rendering is plain text; see `views`.

mod messages;
mod state;
mod update;
mod views;

use crate::catalog::Catalog;
use crate::config::PlaybackConfig;
use crate::player::Player;

pub use messages::Message;
pub use state::AppState;
pub use views::{render_filters, render_queue};

pub struct App {
    state: AppState,
}

impl App {
    /// Controller backed by the simulated audio sink.
    pub fn new(catalog: Catalog, data_base: impl Into<String>, playback: &PlaybackConfig) -> Self {
        let player = Player::new(playback.volume, playback.alternate_formats.clone());
        Self::with_player(catalog, data_base, playback, player)
    }

    /// Controller around an existing player. Preloads the newest playable
    /// release without starting it.
    pub fn with_player(
        catalog: Catalog,
        data_base: impl Into<String>,
        playback: &PlaybackConfig,
        player: Player,
    ) -> Self {
        let mut state = AppState::new(catalog, data_base.into(), playback, player);
        update::preload_latest(&mut state);
        tracing::debug!(
            releases = state.catalog.releases().len(),
            tracks = state.visible_tracks.len(),
            "Controller ready"
        );
        Self { state }
    }

    pub fn update(&mut self, message: Message) {
        if !message.is_tick() {
            tracing::trace!(target: "ui::update", message = ?message, "Update received");
        }

        let s = &mut self.state;
        match message {
            // Navigation
            Message::ShowView(_)
            | Message::OpenRelease(_)
            | Message::OpenTrack(_)
            | Message::LocationChanged(_)
            | Message::Back
            | Message::BrowseTag(_) => update::handle_navigation(s, message),

            // Search and filter
            Message::SearchChanged(_)
            | Message::TagSelected(_)
            | Message::YearSelected(_)
            | Message::ClearFilters => update::handle_filter(s, message),

            // Player and queue
            Message::PlayerPlayEntry(_)
            | Message::PlayerPlayRelease(_)
            | Message::PlayerPlayAllVisible
            | Message::PlayerPlay
            | Message::PlayerPause
            | Message::PlayerToggle
            | Message::PlayerStop
            | Message::PlayerNext
            | Message::PlayerPrevious
            | Message::PlayerSeek(_)
            | Message::PlayerVolumeChanged(_)
            | Message::PlayerCycleMode
            | Message::PlayerTick
            | Message::QueueAdd(_)
            | Message::QueueAddRelease(_)
            | Message::QueueRemove(_)
            | Message::QueueMoveUp(_)
            | Message::QueueMoveDown(_)
            | Message::QueueClear => update::handle_player(s, message),
        }

        // Text output never echoes location writes back
        s.router.acknowledge_location();
    }

    /// The current screen as text.
    pub fn view(&self) -> String {
        views::render(&self.state)
    }

    /// The current view alone, for one-shot output.
    pub fn page(&self) -> String {
        views::render_page(&self.state)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }
}
