//! View routing and back-navigation.
//!
//! The [`ViewRouter`] owns which view is on screen, the location fragment
//! that describes it, and a stack of history frames for "back". Entering a
//! top-level view always clears the history; opening a detail view pushes
//! the context it was opened from.
//!
//! Location updates made by the router itself are remembered so that the
//! echoed change notification is not routed a second time.

mod route;

pub use route::Route;

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::model::{QueueEntry, Release};

/// The list views reachable from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopLevelView {
    #[default]
    Tracks,
    Collections,
    About,
}

impl TopLevelView {
    pub fn route(self) -> Route {
        match self {
            TopLevelView::Tracks => Route::Tracks,
            TopLevelView::Collections => Route::Collections,
            TopLevelView::About => Route::About,
        }
    }
}

/// A detail view shown over the current top-level view.
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    Release(Arc<Release>),
    Track(QueueEntry),
}

impl Detail {
    fn route(&self) -> Route {
        match self {
            Detail::Release(release) => Route::Release(release.id.clone()),
            Detail::Track(entry) => track_route(entry),
        }
    }
}

/// Where "back" returns to.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryFrame {
    List,
    Release(Arc<Release>),
    Track(QueueEntry),
}

/// View state plus navigation history.
#[derive(Debug, Clone, Default)]
pub struct ViewRouter {
    view: TopLevelView,
    detail: Option<Detail>,
    history: Vec<HistoryFrame>,
    /// Current location fragment
    location: String,
    /// Fragment written by the router whose change notice is still due
    pending_programmatic: Option<String>,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> TopLevelView {
        self.view
    }

    pub fn detail(&self) -> Option<&Detail> {
        self.detail.as_ref()
    }

    pub fn history(&self) -> &[HistoryFrame] {
        &self.history
    }

    /// Current location fragment.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Route describing what is on screen.
    pub fn current_route(&self) -> Route {
        match &self.detail {
            Some(detail) => detail.route(),
            None => self.view.route(),
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Enter a top-level view directly. Clears the history.
    pub fn show_view(&mut self, view: TopLevelView) {
        self.view = view;
        self.detail = None;
        self.history.clear();
        self.sync_location();
    }

    /// Open a release detail, remembering where it was opened from.
    pub fn open_release(&mut self, release: Arc<Release>) {
        self.push_context();
        self.detail = Some(Detail::Release(release));
        self.sync_location();
    }

    /// Open a track detail, remembering where it was opened from.
    pub fn open_track(&mut self, entry: QueueEntry) {
        self.push_context();
        self.detail = Some(Detail::Track(entry));
        self.sync_location();
    }

    /// Go back one level.
    ///
    /// A release frame re-opens that release; anything else, including an
    /// empty history, shows the current top-level view.
    pub fn back(&mut self) {
        match self.history.pop() {
            Some(HistoryFrame::Release(release)) => {
                self.detail = Some(Detail::Release(release));
            }
            Some(HistoryFrame::List | HistoryFrame::Track(_)) | None => {
                self.detail = None;
            }
        }
        self.sync_location();
    }

    /// React to an external location change.
    ///
    /// Returns `false` when the change was the router's own update echoing
    /// back and nothing was routed.
    pub fn on_location_changed(&mut self, fragment: &str, catalog: &Catalog) -> bool {
        if self.pending_programmatic.as_deref() == Some(fragment) {
            self.pending_programmatic = None;
            return false;
        }
        self.pending_programmatic = None;
        self.location = fragment.to_string();
        self.navigate(Route::parse(fragment), catalog);
        true
    }

    /// The host has shown the current location and will not echo it.
    ///
    /// Hosts whose location surface fires a change notice on every write
    /// skip this and let [`ViewRouter::on_location_changed`] swallow the
    /// echo instead.
    pub fn acknowledge_location(&mut self) {
        self.pending_programmatic = None;
    }

    /// Route to a parsed location, rebuilding the history a user would have
    /// had arriving there by clicking.
    pub fn navigate(&mut self, route: Route, catalog: &Catalog) {
        match route {
            Route::Tracks => self.show_view(TopLevelView::Tracks),
            Route::Collections => self.show_view(TopLevelView::Collections),
            Route::About => self.show_view(TopLevelView::About),
            Route::Release(id) => match catalog.find_release(&id) {
                Some(release) => {
                    self.history = vec![HistoryFrame::List];
                    self.detail = Some(Detail::Release(Arc::clone(release)));
                    self.sync_location();
                }
                None => self.unresolved(&id),
            },
            Route::Track(slug) => match catalog.find_track_by_slug(&slug) {
                Some(entry) => self.enter_track(entry),
                None => self.unresolved(&slug),
            },
            Route::TrackAt(id, number) => match catalog.find_track_by_number(&id, number) {
                Some(entry) => self.enter_track(entry),
                None => self.unresolved(&format!("{id}/{number}")),
            },
        }
    }

    fn enter_track(&mut self, entry: QueueEntry) {
        self.history = if entry.is_single() {
            vec![HistoryFrame::List]
        } else {
            vec![
                HistoryFrame::List,
                HistoryFrame::Release(Arc::clone(&entry.release)),
            ]
        };
        self.detail = Some(Detail::Track(entry));
        self.sync_location();
    }

    fn unresolved(&mut self, id: &str) {
        tracing::debug!(id, "Unresolved route, showing current view");
        self.detail = None;
        self.sync_location();
    }

    fn push_context(&mut self) {
        let frame = match &self.detail {
            None => HistoryFrame::List,
            Some(Detail::Release(release)) => HistoryFrame::Release(Arc::clone(release)),
            Some(Detail::Track(entry)) => HistoryFrame::Track(entry.clone()),
        };
        self.history.push(frame);
    }

    /// Point the location at what is on screen.
    fn sync_location(&mut self) {
        let fragment = self.current_route().to_fragment();
        if fragment != self.location {
            self.pending_programmatic = Some(fragment.clone());
            self.location = fragment;
        }
    }
}

fn track_route(entry: &QueueEntry) -> Route {
    match entry.track_info() {
        None => Route::Track(entry.release.id.clone()),
        Some(track) => match track.route_slug() {
            Some(slug) => Route::Track(slug.to_string()),
            None => Route::TrackAt(
                entry.release.id.clone(),
                entry.position.map_or(1, |p| p + 1),
            ),
        },
    }
}
