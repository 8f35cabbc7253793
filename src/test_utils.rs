//! Test utilities and fixtures for discography-player tests.
//!
//! Provides a small fixture catalog and a recording audio sink so tests
//! can drive the queue, router and controller without real audio.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{fixture_catalog, mock_player};
//!
//! let catalog = fixture_catalog();
//! let (mut player, sink) = mock_player();
//! // ... test logic
//! ```

use crossbeam_channel::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::catalog::Catalog;
use crate::model::{Discography, QueueEntry, Release};
use crate::player::{AudioSink, MediaSource, Player, PlayerError, PlayerEvent};

/// Catalog document behind [`fixture_catalog`].
///
/// - single `s` (2024), tagged `ambient`, with a WAV download
/// - album `a` (2023), tagged `rock`, tracks `t1`..`t3`; `t2` has lyrics,
///   `t3` is tagged `live`
/// - album `b` (2020) with one track, `old-song`
pub const FIXTURE_JSON: &str = r#"{
    "artist": "Test Artist",
    "bio": "Plays tests.",
    "socialLinks": { "bandcamp": "https://bandcamp.example" },
    "albums": [
        {
            "id": "b",
            "title": "Early Days",
            "type": "album",
            "releaseDate": "2020-01-01",
            "tracks": [
                { "slug": "old-song", "title": "Old Song", "trackNumber": 1, "duration": "4:00", "audioFile": "audio/old-song.mp3" }
            ]
        },
        {
            "id": "a",
            "title": "Album A",
            "type": "album",
            "releaseDate": "2023-06-01",
            "tags": ["rock"],
            "tracks": [
                { "slug": "t1", "title": "T1", "trackNumber": 1, "duration": "3:00", "audioFile": "audio/t1.mp3" },
                { "slug": "t2", "title": "T2", "trackNumber": 2, "duration": "3:30", "audioFile": "audio/t2.mp3", "lyrics": "Under the midnight sky" },
                { "slug": "t3", "title": "T3", "trackNumber": 3, "duration": "2:45", "audioFile": "audio/t3.mp3", "tags": ["live"] }
            ]
        }
    ],
    "singles": [
        {
            "id": "s",
            "title": "Single S",
            "type": "single",
            "releaseDate": "2024-02-14",
            "tags": ["ambient"],
            "audioFile": "audio/s.mp3",
            "wavFile": "wav/s.wav",
            "duration": "2:30"
        }
    ]
}"#;

/// The parsed fixture document.
pub fn fixture_discography() -> Discography {
    Discography::from_json(FIXTURE_JSON).expect("fixture catalog parses")
}

/// The fixture as a loaded catalog.
pub fn fixture_catalog() -> Catalog {
    Catalog::new(fixture_discography())
}

/// Album `a`.
pub fn album_a(catalog: &Catalog) -> Arc<Release> {
    Arc::clone(catalog.find_release("a").expect("album a"))
}

/// Single `s`.
pub fn single_s(catalog: &Catalog) -> Arc<Release> {
    Arc::clone(catalog.find_release("s").expect("single s"))
}

/// Playable entry by route slug.
pub fn entry(catalog: &Catalog, slug: &str) -> QueueEntry {
    catalog
        .find_track_by_slug(slug)
        .unwrap_or_else(|| panic!("no fixture entry {slug}"))
}

// ============================================================================
// Mock sink
// ============================================================================

/// A call recorded by [`MockSink`].
#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Attach(String),
    Release,
    Play,
    Pause,
    Seek(Duration),
    Volume(f32),
}

#[derive(Default)]
struct MockInner {
    calls: Vec<SinkCall>,
    events: Option<Sender<PlayerEvent>>,
}

/// Sink that records every call and emits only the events a test pushes.
///
/// Clones share state, so a test keeps one handle while the player owns
/// the other.
#[derive(Clone, Default)]
pub struct MockSink {
    inner: Arc<Mutex<MockInner>>,
}

impl MockSink {
    /// Hook up the player's event channel.
    pub fn connect(&mut self, events: Sender<PlayerEvent>) {
        self.inner.lock().unwrap().events = Some(events);
    }

    /// Push an event as if the sink produced it.
    pub fn emit(&self, event: PlayerEvent) {
        let inner = self.inner.lock().unwrap();
        inner
            .events
            .as_ref()
            .expect("sink connected")
            .send(event)
            .unwrap();
    }

    /// Every call so far.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// URLs attached so far, in order.
    pub fn attached(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                SinkCall::Attach(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: SinkCall) {
        self.inner.lock().unwrap().calls.push(call);
    }
}

impl AudioSink for MockSink {
    fn attach(&mut self, source: &MediaSource) -> Result<(), PlayerError> {
        self.record(SinkCall::Attach(source.url.clone()));
        Ok(())
    }

    fn release(&mut self) {
        self.record(SinkCall::Release);
    }

    fn play(&mut self) {
        self.record(SinkCall::Play);
    }

    fn pause(&mut self) {
        self.record(SinkCall::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.record(SinkCall::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(SinkCall::Volume(volume));
    }

    fn tick(&mut self) {}
}

/// A player wired to a [`MockSink`], plus the test's handle to that sink.
pub fn mock_player() -> (Player, MockSink) {
    let sink = MockSink::default();
    let handle = sink.clone();
    let player = Player::with_sink(0.7, ["mp3".to_string(), "wav".to_string()], move |tx| {
        let mut sink = sink;
        sink.connect(tx);
        Box::new(sink)
    });
    (player, handle)
}
