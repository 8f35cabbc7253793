//! Audio sink abstraction.
//!
//! A sink owns the actual output resource. The player adapter drives it
//! through [`AudioSink`] and listens for [`PlayerEvent`]s on the channel the
//! sink was built with.

use crossbeam_channel::Sender;
use std::path::Path;
use std::time::{Duration, Instant};

use super::PlayerError;
use super::state::PlayerEvent;

/// Length assumed when a source carries no duration.
const DEFAULT_DURATION: Duration = Duration::from_secs(180);

/// A resolved, loadable audio source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    /// Path or URL
    pub url: String,
    /// Length known from the catalog, if any
    pub duration_hint: Option<Duration>,
}

impl MediaSource {
    pub fn new(url: impl Into<String>, duration_hint: Option<Duration>) -> Self {
        Self {
            url: url.into(),
            duration_hint,
        }
    }

    /// Same source with the other of the two given extensions, if it has one.
    pub fn with_swapped_extension(&self, formats: &[String; 2]) -> Option<Self> {
        let (stem, ext) = self.url.rsplit_once('.')?;
        let swapped = if ext.eq_ignore_ascii_case(&formats[0]) {
            &formats[1]
        } else if ext.eq_ignore_ascii_case(&formats[1]) {
            &formats[0]
        } else {
            return None;
        };
        Some(Self {
            url: format!("{}.{}", stem, swapped),
            duration_hint: self.duration_hint,
        })
    }

    fn is_remote(&self) -> bool {
        self.url.starts_with("http://") || self.url.starts_with("https://")
    }
}

/// The single playback resource behind the player adapter.
///
/// Implementations report progress asynchronously through the event channel
/// they were constructed with; the adapter never reads state back.
pub trait AudioSink: Send {
    /// Attach a new source. Any previous resource has already been released.
    fn attach(&mut self, source: &MediaSource) -> Result<(), PlayerError>;

    /// Release the current resource, if any.
    fn release(&mut self);

    fn play(&mut self);

    fn pause(&mut self);

    fn seek(&mut self, position: Duration);

    fn set_volume(&mut self, volume: f32);

    /// Advance the sink clock and emit due events.
    fn tick(&mut self);
}

/// Clock-driven sink that emulates an audio element without producing sound.
///
/// Local files must exist to load; remote URLs are assumed reachable.
pub struct SimulatedSink {
    events: Sender<PlayerEvent>,
    loaded: bool,
    playing: bool,
    /// Position at `last_update`
    position: Duration,
    last_update: Instant,
    duration: Duration,
}

impl SimulatedSink {
    pub fn new(events: Sender<PlayerEvent>) -> Self {
        Self {
            events,
            loaded: false,
            playing: false,
            position: Duration::ZERO,
            last_update: Instant::now(),
            duration: Duration::ZERO,
        }
    }

    fn current_position(&self) -> Duration {
        if self.playing {
            (self.position + self.last_update.elapsed()).min(self.duration)
        } else {
            self.position.min(self.duration)
        }
    }

    fn emit(&self, event: PlayerEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("Player event receiver dropped");
        }
    }
}

impl AudioSink for SimulatedSink {
    fn attach(&mut self, source: &MediaSource) -> Result<(), PlayerError> {
        if source.url.trim().is_empty() {
            return Err(PlayerError::Sink("empty source location".to_string()));
        }
        self.position = Duration::ZERO;
        self.last_update = Instant::now();
        self.playing = false;

        if !source.is_remote() && !Path::new(&source.url).exists() {
            self.loaded = false;
            self.emit(PlayerEvent::Error(format!("cannot open {}", source.url)));
            return Ok(());
        }

        self.loaded = true;
        self.duration = source.duration_hint.unwrap_or(DEFAULT_DURATION);
        self.emit(PlayerEvent::Loaded(self.duration));
        Ok(())
    }

    fn release(&mut self) {
        self.loaded = false;
        self.playing = false;
        self.position = Duration::ZERO;
        self.duration = Duration::ZERO;
    }

    fn play(&mut self) {
        if self.loaded && !self.playing {
            self.last_update = Instant::now();
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        if self.playing {
            self.position = self.current_position();
            self.last_update = Instant::now();
            self.playing = false;
        }
    }

    fn seek(&mut self, position: Duration) {
        self.position = position.min(self.duration);
        self.last_update = Instant::now();
    }

    fn set_volume(&mut self, volume: f32) {
        tracing::trace!(volume, "Simulated sink volume");
    }

    fn tick(&mut self) {
        if !self.playing {
            return;
        }
        let position = self.current_position();
        self.emit(PlayerEvent::Progress(position));
        if position >= self.duration {
            self.position = self.duration;
            self.playing = false;
            self.emit(PlayerEvent::Ended);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    fn formats() -> [String; 2] {
        ["mp3".to_string(), "wav".to_string()]
    }

    #[test]
    fn test_swapped_extension() {
        let source = MediaSource::new("audio/song.mp3", None);
        assert_eq!(
            source.with_swapped_extension(&formats()).unwrap().url,
            "audio/song.wav"
        );

        let source = MediaSource::new("https://cdn.example/a.b/song.WAV", None);
        assert_eq!(
            source.with_swapped_extension(&formats()).unwrap().url,
            "https://cdn.example/a.b/song.mp3"
        );

        let source = MediaSource::new("audio/song.ogg", None);
        assert!(source.with_swapped_extension(&formats()).is_none());
    }

    #[test]
    fn test_missing_local_file_reports_error() {
        let (tx, rx) = unbounded();
        let mut sink = SimulatedSink::new(tx);
        sink.attach(&MediaSource::new("/definitely/not/here.mp3", None))
            .unwrap();

        assert!(matches!(rx.try_recv(), Ok(PlayerEvent::Error(_))));
        sink.play();
        sink.tick();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_empty_location_is_rejected() {
        let (tx, rx) = unbounded();
        let mut sink = SimulatedSink::new(tx);
        let err = sink.attach(&MediaSource::new(" ", None)).unwrap_err();
        assert!(matches!(err, PlayerError::Sink(_)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_remote_source_loads_with_hint() {
        let (tx, rx) = unbounded();
        let mut sink = SimulatedSink::new(tx);
        sink.attach(&MediaSource::new(
            "https://cdn.example/a.mp3",
            Some(Duration::from_secs(42)),
        ))
        .unwrap();
        assert_eq!(rx.try_recv(), Ok(PlayerEvent::Loaded(Duration::from_secs(42))));
    }

    #[test]
    fn test_plays_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.mp3");
        std::fs::write(&path, b"").unwrap();

        let (tx, rx) = unbounded();
        let mut sink = SimulatedSink::new(tx);
        sink.attach(&MediaSource::new(
            path.to_string_lossy(),
            Some(Duration::from_millis(5)),
        ))
        .unwrap();
        assert!(matches!(rx.try_recv(), Ok(PlayerEvent::Loaded(_))));

        sink.play();
        std::thread::sleep(Duration::from_millis(20));
        sink.tick();

        assert_eq!(
            rx.try_recv(),
            Ok(PlayerEvent::Progress(Duration::from_millis(5)))
        );
        assert_eq!(rx.try_recv(), Ok(PlayerEvent::Ended));

        // Ended is reported once
        sink.tick();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_seek_clamps_to_duration() {
        let (tx, rx) = unbounded();
        let mut sink = SimulatedSink::new(tx);
        sink.attach(&MediaSource::new(
            "https://cdn.example/a.mp3",
            Some(Duration::from_secs(10)),
        ))
        .unwrap();
        let _ = rx.try_recv();

        sink.seek(Duration::from_secs(99));
        assert_eq!(sink.current_position(), Duration::from_secs(10));
    }
}
