//! Player state and event types.

use std::time::Duration;

/// Current playback status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    #[default]
    Stopped,
    Loading,
    Playing,
    Paused,
}

/// How the queue continues when a track ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    #[default]
    Normal,
    /// Replay the current entry
    RepeatOne,
    /// Refill from the current release when the queue runs dry
    RepeatAll,
    /// Pick a random pending entry
    Shuffle,
}

impl PlaybackMode {
    /// Next mode in the cycle, skipping shuffle when it is disabled.
    pub fn next(self, shuffle_enabled: bool) -> Self {
        match self {
            PlaybackMode::Normal => PlaybackMode::RepeatOne,
            PlaybackMode::RepeatOne => PlaybackMode::RepeatAll,
            PlaybackMode::RepeatAll if shuffle_enabled => PlaybackMode::Shuffle,
            PlaybackMode::RepeatAll | PlaybackMode::Shuffle => PlaybackMode::Normal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlaybackMode::Normal => "Repeat: Off",
            PlaybackMode::RepeatOne => "Repeat: One",
            PlaybackMode::RepeatAll => "Repeat: All",
            PlaybackMode::Shuffle => "Shuffle",
        }
    }
}

/// Snapshot of the player adapter.
#[derive(Debug, Clone)]
pub struct PlayerState {
    /// Current playback status
    pub status: PlaybackStatus,
    /// Loaded source URL or path (if any)
    pub source: Option<String>,
    /// Current position in the track
    pub position: Duration,
    /// Total duration of the track
    pub duration: Duration,
    /// Volume level (0.0 - 1.0)
    pub volume: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            status: PlaybackStatus::Stopped,
            source: None,
            position: Duration::ZERO,
            duration: Duration::ZERO,
            volume: 0.7,
        }
    }
}

impl PlayerState {
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Get position as a fraction (0.0 - 1.0).
    pub fn position_fraction(&self) -> f32 {
        if self.duration.is_zero() {
            0.0
        } else {
            self.position.as_secs_f32() / self.duration.as_secs_f32()
        }
    }

    /// Format position as MM:SS.
    pub fn position_str(&self) -> String {
        format_duration(self.position)
    }

    /// Format duration as MM:SS.
    pub fn duration_str(&self) -> String {
        format_duration(self.duration)
    }
}

/// Format a duration as MM:SS or HH:MM:SS.
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}

/// Events reported by an audio sink.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Metadata is available; carries the track length
    Loaded(Duration),
    /// Playback position moved
    Progress(Duration),
    /// The track reached its end
    Ended,
    /// The source could not be played
    Error(String),
}
