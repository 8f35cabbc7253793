//! Playback and queue handlers.
//!
//! # Control Flow
//!
//! Every way of starting a track (list click, next/previous, track end,
//! play-all) ends in `load_entry()`. The queue only learns about the new
//! current entry once its source has actually been loaded, so an entry
//! without audio leaves the playback state exactly as it was.

use std::time::Duration;

use crate::model::QueueEntry;
use crate::player::{NextAction, PlayerEvent, Previous};

use super::super::messages::Message;
use super::super::state::AppState;

// ============================================================================
// Main message handler
// ============================================================================

/// Handle player and queue messages.
pub fn handle_player(s: &mut AppState, msg: Message) {
    match msg {
        Message::PlayerPlayEntry(entry) => {
            play_entry(s, entry);
        }
        Message::PlayerPlayRelease(id) => play_release(s, &id),
        Message::PlayerPlayAllVisible => play_all_visible(s),

        Message::PlayerPlay => s.player.play(),
        Message::PlayerPause => s.player.pause(),
        Message::PlayerToggle => s.player.toggle(),
        Message::PlayerStop => s.player.stop(),
        Message::PlayerNext => do_next(s),
        Message::PlayerPrevious => do_previous(s),
        Message::PlayerSeek(position) => s.player.seek(position),

        Message::PlayerVolumeChanged(volume) => {
            s.player.set_volume(volume);
            s.status_message = format!("Volume: {:.0}%", s.player.volume() * 100.0);
        }

        Message::PlayerCycleMode => {
            let mode = s.queue.cycle_mode();
            s.status_message = mode.label().to_string();
        }

        Message::PlayerTick => {
            s.player.tick();
            drain_player_events(s);
        }

        // Queue editing
        Message::QueueAdd(entry) => {
            s.status_message = format!("Added to queue: {}", entry.title());
            s.queue.enqueue(entry);
        }
        Message::QueueAddRelease(id) => {
            if let Some(release) = s.catalog.find_release(&id).cloned() {
                let added = s.queue.enqueue_release(&release);
                s.status_message = format!("Added {} tracks to queue", added);
            }
        }
        Message::QueueRemove(index) => {
            if let Some(removed) = s.queue.remove_at(index) {
                s.status_message = format!("Removed from queue: {}", removed.title());
            }
        }
        Message::QueueMoveUp(index) => {
            s.queue.move_up(index);
        }
        Message::QueueMoveDown(index) => {
            s.queue.move_down(index);
        }
        Message::QueueClear => {
            s.queue.clear();
            s.status_message = "Queue cleared".to_string();
        }

        _ => {}
    }
}

/// Load the newest playable entry without starting it.
pub fn preload_latest(s: &mut AppState) {
    if let Some(entry) = s.catalog.latest_playable() {
        tracing::debug!(title = entry.title(), "Preloading most recent track");
        load_entry(s, entry, false);
    }
}

// ============================================================================
// Internal helper functions - each action implemented once
// ============================================================================

/// Play an entry now. Returns whether it was loaded.
fn play_entry(s: &mut AppState, entry: QueueEntry) -> bool {
    load_entry(s, entry, true)
}

fn load_entry(s: &mut AppState, entry: QueueEntry, autoplay: bool) -> bool {
    let source = match s.media_source(&entry) {
        Ok(source) => source,
        Err(e) => {
            tracing::warn!("{}", e);
            s.status_message = e.to_string();
            return false;
        }
    };

    if let Err(e) = s.player.load(source) {
        tracing::error!("Failed to load {}: {}", entry.title(), e);
        s.status_message = format!("Playback error: {}", e);
        return false;
    }
    if autoplay {
        s.player.play();
        s.status_message = format!("Playing: {}", entry.title());
    }
    tracing::info!(title = entry.title(), release = %entry.release.id, "Track loaded");
    s.queue.set_current(entry);
    true
}

/// Play the first entry and queue the rest.
fn play_seeded(s: &mut AppState, mut entries: Vec<QueueEntry>) {
    if entries.is_empty() {
        s.status_message = "Nothing to play".to_string();
        return;
    }
    let first = entries.remove(0);
    s.queue.replace(entries);
    play_entry(s, first);
}

fn play_release(s: &mut AppState, id: &str) {
    let Some(release) = s.catalog.find_release(id).cloned() else {
        return;
    };
    if release.is_collection() {
        play_seeded(s, release.entries());
    } else {
        play_entry(s, QueueEntry::single(release));
    }
}

fn play_all_visible(s: &mut AppState) {
    let entries = s.visible_tracks.clone();
    play_seeded(s, entries);
}

/// Manual skip forward.
fn do_next(s: &mut AppState) {
    if let Some(entry) = s.queue.play_next() {
        play_entry(s, entry);
    }
}

/// Manual skip back, or restart when past the threshold.
fn do_previous(s: &mut AppState) {
    match s.queue.play_previous(s.player.position(), s.restart_threshold) {
        Previous::Restart => s.player.seek(Duration::ZERO),
        Previous::Play(entry) => {
            play_entry(s, entry);
        }
        Previous::Nothing => {}
    }
}

/// The current track finished on its own.
fn on_track_end(s: &mut AppState) {
    match s.queue.advance() {
        NextAction::Play(entry) => {
            play_entry(s, entry);
        }
        NextAction::Restart => s.player.restart(),
        NextAction::Stop => {
            tracing::debug!("Queue finished");
        }
    }
}

fn drain_player_events(s: &mut AppState) {
    for event in s.player.poll_events() {
        match event {
            PlayerEvent::Ended => on_track_end(s),
            PlayerEvent::Error(reason) => {
                s.status_message = format!("Playback error: {}", reason);
            }
            PlayerEvent::Loaded(_) | PlayerEvent::Progress(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlaybackMode, PlaybackStatus};
    use crate::test_utils::{MockSink, entry, mock_player};
    use crate::ui::App;

    fn app() -> (App, MockSink) {
        let (player, sink) = mock_player();
        let catalog = crate::test_utils::fixture_catalog();
        let app = App::with_player(
            catalog,
            "https://cdn.example".to_string(),
            &Default::default(),
            player,
        );
        (app, sink)
    }

    fn current_title(app: &App) -> Option<String> {
        app.state().queue.current().map(|e| e.title().to_string())
    }

    #[test]
    fn test_preloads_latest_without_playing() {
        let (app, sink) = app();
        assert_eq!(current_title(&app).as_deref(), Some("Single S"));
        assert_eq!(sink.attached(), vec!["https://cdn.example/audio/s.mp3"]);
        assert!(!app.state().player.state().is_playing());
    }

    #[test]
    fn test_next_walks_album_then_stops() {
        let (mut app, _sink) = app();
        let catalog = app.state().catalog.clone();

        app.update(Message::PlayerPlayEntry(entry(&catalog, "t1")));
        assert_eq!(current_title(&app).as_deref(), Some("T1"));

        app.update(Message::PlayerNext);
        assert_eq!(current_title(&app).as_deref(), Some("T2"));
        app.update(Message::PlayerNext);
        assert_eq!(current_title(&app).as_deref(), Some("T3"));
        app.update(Message::PlayerNext);
        assert_eq!(current_title(&app).as_deref(), Some("T3"));
    }

    #[test]
    fn test_enqueued_single_plays_before_next_album_track() {
        let (mut app, _sink) = app();
        let catalog = app.state().catalog.clone();

        app.update(Message::PlayerPlayEntry(entry(&catalog, "t2")));
        app.update(Message::QueueAdd(entry(&catalog, "s")));

        app.update(Message::PlayerNext);
        assert_eq!(current_title(&app).as_deref(), Some("Single S"));
        assert!(app.state().queue.is_empty());
    }

    #[test]
    fn test_volume_persists_across_tracks() {
        let (mut app, _sink) = app();
        let catalog = app.state().catalog.clone();

        app.update(Message::PlayerVolumeChanged(0.3));
        app.update(Message::PlayerPlayEntry(entry(&catalog, "t1")));
        app.update(Message::PlayerNext);
        assert_eq!(app.state().player.state().volume, 0.3);
    }

    #[test]
    fn test_entry_without_audio_leaves_state_unchanged() {
        let (player, sink) = mock_player();
        let mut disco = crate::test_utils::fixture_discography();
        for release in &mut disco.releases {
            if let Some(tracks) = release.tracks.as_mut() {
                for track in tracks {
                    if track.slug.as_deref() == Some("t3") {
                        track.audio_file = None;
                    }
                }
            }
        }
        let catalog = crate::catalog::Catalog::new(disco);
        let mut app = App::with_player(catalog.clone(), String::new(), &Default::default(), player);

        app.update(Message::PlayerPlayEntry(entry(&catalog, "t2")));
        let attached = sink.attached().len();

        app.update(Message::PlayerPlayEntry(entry(&catalog, "t3")));
        assert_eq!(current_title(&app).as_deref(), Some("T2"));
        assert_eq!(sink.attached().len(), attached);
        assert!(app.state().player.state().is_playing());
    }

    #[test]
    fn test_track_end_advances_queue() {
        let (mut app, sink) = app();
        let catalog = app.state().catalog.clone();

        app.update(Message::PlayerPlayEntry(entry(&catalog, "t1")));
        app.update(Message::QueueAdd(entry(&catalog, "s")));

        sink.emit(PlayerEvent::Ended);
        app.update(Message::PlayerTick);
        assert_eq!(current_title(&app).as_deref(), Some("Single S"));

        // Normal mode, empty queue: stop
        sink.emit(PlayerEvent::Ended);
        app.update(Message::PlayerTick);
        assert_eq!(current_title(&app).as_deref(), Some("Single S"));
        assert_eq!(app.state().player.state().status, PlaybackStatus::Stopped);
    }

    #[test]
    fn test_repeat_one_replays_from_start() {
        let (mut app, sink) = app();
        let catalog = app.state().catalog.clone();

        app.update(Message::PlayerPlayEntry(entry(&catalog, "t2")));
        app.update(Message::PlayerCycleMode);
        assert_eq!(app.state().queue.mode(), PlaybackMode::RepeatOne);

        sink.emit(PlayerEvent::Ended);
        app.update(Message::PlayerTick);

        assert_eq!(current_title(&app).as_deref(), Some("T2"));
        assert_eq!(app.state().player.position(), Duration::ZERO);
        assert!(app.state().player.state().is_playing());
    }

    #[test]
    fn test_play_release_seeds_queue() {
        let (mut app, _sink) = app();
        app.update(Message::PlayerPlayRelease("a".to_string()));

        assert_eq!(current_title(&app).as_deref(), Some("T1"));
        let pending: Vec<&str> = app.state().queue.pending().iter().map(|e| e.title()).collect();
        assert_eq!(pending, vec!["T2", "T3"]);
    }

    #[test]
    fn test_play_all_visible_respects_filter() {
        let (mut app, _sink) = app();
        app.update(Message::TagSelected(Some("rock".to_string())));
        app.update(Message::PlayerPlayAllVisible);

        assert_eq!(current_title(&app).as_deref(), Some("T1"));
        assert_eq!(app.state().queue.len(), 2);
    }

    #[test]
    fn test_previous_restarts_late_in_track() {
        let (mut app, sink) = app();
        let catalog = app.state().catalog.clone();

        app.update(Message::PlayerPlayEntry(entry(&catalog, "t2")));
        sink.emit(PlayerEvent::Loaded(Duration::from_secs(210)));
        sink.emit(PlayerEvent::Progress(Duration::from_secs(30)));
        app.update(Message::PlayerTick);

        app.update(Message::PlayerPrevious);
        assert_eq!(current_title(&app).as_deref(), Some("T2"));
        assert_eq!(app.state().player.position(), Duration::ZERO);

        app.update(Message::PlayerPrevious);
        assert_eq!(current_title(&app).as_deref(), Some("T1"));
    }

    #[test]
    fn test_queue_edits() {
        let (mut app, _sink) = app();
        app.update(Message::QueueAddRelease("a".to_string()));
        app.update(Message::QueueMoveDown(0));
        app.update(Message::QueueRemove(2));

        let pending: Vec<&str> = app.state().queue.pending().iter().map(|e| e.title()).collect();
        assert_eq!(pending, vec!["T2", "T1"]);

        app.update(Message::QueueClear);
        assert!(app.state().queue.is_empty());
    }
}
