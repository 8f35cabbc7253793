//! Playback: the play queue and the adapter around the audio sink.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 Controller (ui::update)                  │
//! │   asks PlayQueue what plays next, tells Player to load   │
//! └──────────────┬──────────────────────────▲────────────────┘
//!                │ load/play/pause/seek     │ poll_events()
//!                ▼                          │
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Player (adapter)                        │
//! │   owns PlayerState, volume memory, format retry          │
//! └──────────────┬──────────────────────────▲────────────────┘
//!                │ AudioSink trait          │ crossbeam channel
//!                ▼                          │
//! ┌──────────────────────────────────────────────────────────┐
//! │          Sink (SimulatedSink or a test double)           │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod queue;
mod sink;
mod state;

pub use queue::{NextAction, PlayQueue, Previous};
pub use sink::{AudioSink, MediaSource, SimulatedSink};
pub use state::{PlaybackMode, PlaybackStatus, PlayerEvent, PlayerState, format_duration};

use crossbeam_channel::{Receiver, Sender, unbounded};
use std::time::Duration;

/// The player adapter.
///
/// Wraps exactly one [`AudioSink`]. At most one source is attached at a
/// time: loading always releases the previous one first.
pub struct Player {
    sink: Box<dyn AudioSink>,
    events: Receiver<PlayerEvent>,
    state: PlayerState,
    source: Option<MediaSource>,
    /// Whether the format-swap retry was already spent on this source
    retried: bool,
    alternate_formats: [String; 2],
}

impl Player {
    /// Create a player backed by the [`SimulatedSink`].
    pub fn new(volume: f32, alternate_formats: [String; 2]) -> Self {
        Self::with_sink(volume, alternate_formats, |tx| {
            Box::new(SimulatedSink::new(tx))
        })
    }

    /// Create a player around a custom sink.
    ///
    /// `make_sink` receives the sender the sink must report events on.
    pub fn with_sink<F>(volume: f32, alternate_formats: [String; 2], make_sink: F) -> Self
    where
        F: FnOnce(Sender<PlayerEvent>) -> Box<dyn AudioSink>,
    {
        let (tx, rx) = unbounded();
        let state = PlayerState {
            volume: volume.clamp(0.0, 1.0),
            ..Default::default()
        };
        Self {
            sink: make_sink(tx),
            events: rx,
            state,
            source: None,
            retried: false,
            alternate_formats,
        }
    }

    /// Load a new source, replacing whatever was loaded.
    ///
    /// Playback does not start until [`Player::play`].
    pub fn load(&mut self, source: MediaSource) -> Result<(), PlayerError> {
        self.attach(source)?;
        self.retried = false;
        Ok(())
    }

    fn attach(&mut self, source: MediaSource) -> Result<(), PlayerError> {
        self.sink.release();
        // Events from the released source are stale
        while self.events.try_recv().is_ok() {}

        tracing::debug!(url = %source.url, "Loading source");
        self.state.status = PlaybackStatus::Loading;
        self.state.source = Some(source.url.clone());
        self.state.position = Duration::ZERO;
        self.state.duration = source.duration_hint.unwrap_or_default();

        if let Err(e) = self.sink.attach(&source) {
            self.state.status = PlaybackStatus::Stopped;
            self.state.source = None;
            self.source = None;
            return Err(e);
        }
        self.sink.set_volume(self.state.volume);
        self.source = Some(source);
        Ok(())
    }

    /// Start or resume playback. No-op when nothing is loaded or already playing.
    pub fn play(&mut self) {
        if self.source.is_none() || self.state.status == PlaybackStatus::Playing {
            return;
        }
        self.sink.play();
        self.state.status = PlaybackStatus::Playing;
    }

    /// Pause playback. No-op unless playing.
    pub fn pause(&mut self) {
        if self.state.status != PlaybackStatus::Playing {
            return;
        }
        self.sink.pause();
        self.state.status = PlaybackStatus::Paused;
    }

    /// Toggle play/pause.
    pub fn toggle(&mut self) {
        match self.state.status {
            PlaybackStatus::Playing => self.pause(),
            PlaybackStatus::Paused | PlaybackStatus::Stopped | PlaybackStatus::Loading => {
                self.play()
            }
        }
    }

    /// Stop playback and rewind.
    pub fn stop(&mut self) {
        if self.source.is_none() {
            return;
        }
        self.sink.pause();
        self.sink.seek(Duration::ZERO);
        self.state.position = Duration::ZERO;
        self.state.status = PlaybackStatus::Stopped;
    }

    /// Rewind the current source and play it.
    pub fn restart(&mut self) {
        if self.source.is_none() {
            return;
        }
        self.seek(Duration::ZERO);
        self.play();
    }

    /// Seek within the current source, clamped to `[0, duration]`.
    pub fn seek(&mut self, position: Duration) {
        if self.source.is_none() {
            return;
        }
        // Length stays unknown until `Loaded` for sources without a hint;
        // the position is clamped once it arrives
        let position = if self.state.duration.is_zero() {
            position
        } else {
            position.min(self.state.duration)
        };
        self.sink.seek(position);
        self.state.position = position;
    }

    /// Set volume (0.0 - 1.0). Also applies to every later load.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.state.volume = volume;
        self.sink.set_volume(volume);
    }

    /// Get current volume.
    pub fn volume(&self) -> f32 {
        self.state.volume
    }

    /// Drive the sink clock.
    pub fn tick(&mut self) {
        self.sink.tick();
    }

    /// Get current playback state snapshot.
    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Elapsed time in the current source.
    pub fn position(&self) -> Duration {
        self.state.position
    }

    /// Drain pending sink events and fold them into the state.
    ///
    /// The first error on a source triggers one reload with the alternate
    /// extension and is not reported. Errors after that stop playback and
    /// are returned to the caller.
    pub fn poll_events(&mut self) -> Vec<PlayerEvent> {
        let mut surfaced = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            match event {
                PlayerEvent::Loaded(duration) => {
                    self.state.duration = duration;
                    self.state.position = self.state.position.min(duration);
                    if self.state.status == PlaybackStatus::Loading {
                        self.state.status = PlaybackStatus::Paused;
                    }
                    surfaced.push(PlayerEvent::Loaded(duration));
                }
                PlayerEvent::Progress(position) => {
                    self.state.position = position.min(self.state.duration);
                    surfaced.push(PlayerEvent::Progress(self.state.position));
                }
                PlayerEvent::Ended => {
                    self.state.position = self.state.duration;
                    self.state.status = PlaybackStatus::Stopped;
                    surfaced.push(PlayerEvent::Ended);
                }
                PlayerEvent::Error(reason) => {
                    if let Some(event) = self.handle_error(reason) {
                        surfaced.push(event);
                    }
                }
            }
        }
        surfaced
    }

    fn handle_error(&mut self, reason: String) -> Option<PlayerEvent> {
        let Some(source) = self.source.clone() else {
            return None;
        };

        if !self.retried
            && let Some(alternate) = source.with_swapped_extension(&self.alternate_formats)
        {
            tracing::warn!(
                failed = %source.url,
                retry = %alternate.url,
                "Audio error ({}), trying alternate format",
                reason
            );
            let resume = self.state.status == PlaybackStatus::Playing;
            self.retried = true;
            return match self.attach(alternate) {
                Ok(()) => {
                    if resume {
                        self.play();
                    }
                    None
                }
                Err(e) => Some(self.fail(e)),
            };
        }

        Some(self.fail(PlayerError::RetryExhausted {
            url: source.url,
            reason,
        }))
    }

    fn fail(&mut self, error: PlayerError) -> PlayerEvent {
        tracing::error!("{}", error);
        self.sink.pause();
        self.state.status = PlaybackStatus::Stopped;
        PlayerEvent::Error(error.to_string())
    }
}

/// Player errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PlayerError {
    #[error("No audio source for {0}")]
    NoSource(String),

    #[error("Audio sink error: {0}")]
    Sink(String),

    #[error("Cannot play {url}: {reason}")]
    RetryExhausted { url: String, reason: String },
}
