//! Play queue management.
//!
//! The queue holds the pending entries plus the entry currently loaded in
//! the player. It decides *what* plays next; loading and starting playback
//! is the controller's job, which reports back through [`PlayQueue::set_current`]
//! once a source has actually been loaded.
//!
//! The current entry is never part of the pending list: taking an entry to
//! play always removes it first.

use rand::Rng;
use rand::seq::SliceRandom;
use std::sync::Arc;
use std::time::Duration;

use super::state::PlaybackMode;
use crate::model::{QueueEntry, Release};

/// What to do after the current track ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextAction {
    /// Load and play this entry
    Play(QueueEntry),
    /// Seek the current entry back to 0 and play again
    Restart,
    /// Nothing left; stay stopped
    Stop,
}

/// Result of a "previous" request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Previous {
    /// Seek the current entry back to 0
    Restart,
    /// Load and play this entry
    Play(QueueEntry),
    /// Nothing to go back to
    Nothing,
}

/// The pending queue together with the current entry and mode.
#[derive(Debug, Clone, Default)]
pub struct PlayQueue {
    /// Entries waiting to play, in order
    pending: Vec<QueueEntry>,
    /// Entry loaded in the player
    current: Option<QueueEntry>,
    /// Continuation mode
    mode: PlaybackMode,
    /// Whether shuffle takes part in the mode cycle
    shuffle_enabled: bool,
}

impl PlayQueue {
    /// Create an empty queue.
    pub fn new(shuffle_enabled: bool) -> Self {
        Self {
            shuffle_enabled,
            ..Default::default()
        }
    }

    /// Check if the pending list is empty.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Pending entries in play order.
    pub fn pending(&self) -> &[QueueEntry] {
        &self.pending
    }

    /// Entry loaded in the player.
    pub fn current(&self) -> Option<&QueueEntry> {
        self.current.as_ref()
    }

    /// Record the entry that was just loaded.
    pub fn set_current(&mut self, entry: QueueEntry) {
        self.current = Some(entry);
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Append an entry. Duplicates are allowed.
    pub fn enqueue(&mut self, entry: QueueEntry) {
        self.pending.push(entry);
    }

    /// Append every entry of a release in tracklist order.
    pub fn enqueue_release(&mut self, release: &Arc<Release>) -> usize {
        let entries = release.entries();
        let added = entries.len();
        self.pending.extend(entries);
        added
    }

    /// Replace the pending list.
    pub fn replace(&mut self, entries: Vec<QueueEntry>) {
        self.pending = entries;
    }

    /// Empty the pending list. The current entry keeps playing.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Remove the entry at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<QueueEntry> {
        (index < self.pending.len()).then(|| self.pending.remove(index))
    }

    /// Move an entry up one position. Returns the new index if moved.
    pub fn move_up(&mut self, index: usize) -> Option<usize> {
        if index == 0 || index >= self.pending.len() {
            return None;
        }
        self.pending.swap(index, index - 1);
        Some(index - 1)
    }

    /// Move an entry down one position. Returns the new index if moved.
    pub fn move_down(&mut self, index: usize) -> Option<usize> {
        if index + 1 >= self.pending.len() {
            return None;
        }
        self.pending.swap(index, index + 1);
        Some(index + 1)
    }

    // ========================================================================
    // Modes
    // ========================================================================

    /// Advance to the next playback mode.
    ///
    /// Entering shuffle reorders the pending list in place.
    pub fn cycle_mode(&mut self) -> PlaybackMode {
        self.mode = self.mode.next(self.shuffle_enabled);
        if self.mode == PlaybackMode::Shuffle {
            self.shuffle_pending();
        }
        tracing::debug!(mode = ?self.mode, "Playback mode changed");
        self.mode
    }

    /// Set the mode directly (no shuffle side effect).
    #[cfg(test)]
    pub(crate) fn set_mode(&mut self, mode: PlaybackMode) {
        self.mode = mode;
    }

    /// Fisher-Yates shuffle of the pending list.
    fn shuffle_pending(&mut self) {
        let mut rng = rand::rng();
        self.pending.shuffle(&mut rng);
    }

    // ========================================================================
    // Continuation
    // ========================================================================

    /// Decide what follows a natural track end.
    pub fn advance(&mut self) -> NextAction {
        match self.mode {
            PlaybackMode::RepeatOne => {
                if self.current.is_some() {
                    NextAction::Restart
                } else {
                    NextAction::Stop
                }
            }
            PlaybackMode::RepeatAll => {
                if self.pending.is_empty()
                    && let Some(current) = &self.current
                    && current.release.is_collection()
                {
                    let release = Arc::clone(&current.release);
                    self.pending.extend(release.entries());
                    tracing::debug!(release = %release.id, "Refilled queue for repeat-all");
                }
                self.pop_front().map_or(NextAction::Stop, NextAction::Play)
            }
            PlaybackMode::Shuffle => self.take_random().map_or(NextAction::Stop, NextAction::Play),
            PlaybackMode::Normal => self.pop_front().map_or(NextAction::Stop, NextAction::Play),
        }
    }

    /// Entry for a manual "next".
    ///
    /// Pending entries win (a random one in shuffle mode); otherwise the
    /// following track of the current release, without wrapping.
    pub fn play_next(&mut self) -> Option<QueueEntry> {
        if self.mode == PlaybackMode::Shuffle
            && let Some(entry) = self.take_random()
        {
            return Some(entry);
        }
        if let Some(entry) = self.pop_front() {
            return Some(entry);
        }

        let current = self.current.as_ref()?;
        let position = current.position?;
        QueueEntry::track(Arc::clone(&current.release), position + 1)
    }

    /// Entry for a manual "previous".
    ///
    /// Past `threshold` into the track the current entry restarts instead.
    pub fn play_previous(&self, elapsed: Duration, threshold: Duration) -> Previous {
        let Some(current) = &self.current else {
            return Previous::Nothing;
        };
        if elapsed > threshold {
            return Previous::Restart;
        }
        match current.position {
            Some(position) if position > 0 => {
                QueueEntry::track(Arc::clone(&current.release), position - 1)
                    .map_or(Previous::Nothing, Previous::Play)
            }
            _ => Previous::Nothing,
        }
    }

    fn pop_front(&mut self) -> Option<QueueEntry> {
        (!self.pending.is_empty()).then(|| self.pending.remove(0))
    }

    fn take_random(&mut self) -> Option<QueueEntry> {
        if self.pending.is_empty() {
            return None;
        }
        let index = rand::rng().random_range(0..self.pending.len());
        Some(self.pending.remove(index))
    }
}
