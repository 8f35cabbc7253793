//! Message types for the discography controller.

use std::time::Duration;

use crate::model::QueueEntry;
use crate::router::TopLevelView;

/// All possible messages that can be sent to the controller
#[derive(Debug, Clone)]
pub enum Message {
    // Navigation
    ShowView(TopLevelView),
    OpenRelease(String),      // Release id
    OpenTrack(QueueEntry),
    LocationChanged(String),  // Fragment typed or followed by the user
    Back,
    BrowseTag(String),        // Tag link: tracks view filtered by tag

    // Search and filter messages
    SearchChanged(String),
    TagSelected(Option<String>),
    YearSelected(Option<String>),
    ClearFilters,

    // Player messages
    PlayerPlayEntry(QueueEntry),
    PlayerPlayRelease(String), // First track now, rest queued
    PlayerPlayAllVisible,
    PlayerPlay,
    PlayerPause,
    PlayerToggle,
    PlayerStop,
    PlayerNext,
    PlayerPrevious,
    PlayerSeek(Duration),
    PlayerVolumeChanged(f32),
    PlayerCycleMode,
    PlayerTick,                // Drives the sink clock and drains its events

    // Queue messages
    QueueAdd(QueueEntry),
    QueueAddRelease(String),
    QueueRemove(usize),
    QueueMoveUp(usize),
    QueueMoveDown(usize),
    QueueClear,
}

impl Message {
    pub(crate) fn is_tick(&self) -> bool {
        matches!(self, Message::PlayerTick)
    }
}
