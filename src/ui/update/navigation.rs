//! Navigation handlers.

use std::sync::Arc;

use crate::router::TopLevelView;

use super::super::messages::Message;
use super::super::state::AppState;

/// Handle view and location messages
pub fn handle_navigation(s: &mut AppState, message: Message) {
    match message {
        Message::ShowView(view) => s.router.show_view(view),
        Message::OpenRelease(id) => match s.catalog.find_release(&id) {
            Some(release) => s.router.open_release(Arc::clone(release)),
            None => tracing::debug!(id = %id, "Unknown release"),
        },
        Message::OpenTrack(entry) => s.router.open_track(entry),
        Message::LocationChanged(fragment) => {
            s.router.on_location_changed(&fragment, &s.catalog);
        }
        Message::Back => s.router.back(),
        Message::BrowseTag(tag) => {
            s.filter.tag = Some(tag);
            s.refresh_filtered();
            s.router.show_view(TopLevelView::Tracks);
        }
        _ => {}
    }
}
