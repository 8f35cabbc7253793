//! Search and filter handlers.
//!
//! Every change recomputes the derived lists from the full catalog.

use super::super::messages::Message;
use super::super::state::AppState;

/// Handle search and filter messages
pub fn handle_filter(s: &mut AppState, message: Message) {
    match message {
        Message::SearchChanged(query) => s.filter.query = query,
        Message::TagSelected(tag) => s.filter.tag = tag.filter(|t| !t.is_empty()),
        Message::YearSelected(year) => s.filter.year = year.filter(|y| !y.is_empty()),
        Message::ClearFilters => s.filter = Default::default(),
        _ => return,
    }
    s.refresh_filtered();
    tracing::debug!(
        query = %s.filter.query,
        tag = ?s.filter.tag,
        year = ?s.filter.year,
        tracks = s.visible_tracks.len(),
        "Filters applied"
    );
}
