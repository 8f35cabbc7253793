//! Search and filter predicates over the catalog.
//!
//! Filters never mutate the catalog; each call derives a fresh view from the
//! full release list.

use std::sync::Arc;

use super::Catalog;
use crate::model::{QueueEntry, Release};

/// Current search/filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    /// Free-text query (case-insensitive)
    pub query: String,
    /// Exact tag to match
    pub tag: Option<String>,
    /// Release year to match
    pub year: Option<String>,
}

impl CatalogFilter {
    /// Whether any predicate is set.
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty() || self.tag.is_some() || self.year.is_some()
    }

    /// Every playable entry passing the filter, newest release first.
    pub fn visible_tracks(&self, catalog: &Catalog) -> Vec<QueueEntry> {
        catalog
            .releases()
            .iter()
            .filter(|r| self.year_matches(r))
            .flat_map(|r| r.entries())
            .filter(|e| self.entry_matches(e))
            .collect()
    }

    /// Releases with at least one entry passing the filter.
    pub fn filtered_releases(&self, catalog: &Catalog) -> Vec<Arc<Release>> {
        catalog
            .releases()
            .iter()
            .filter(|r| self.year_matches(r))
            .filter(|r| r.entries().iter().any(|e| self.entry_matches(e)))
            .cloned()
            .collect()
    }

    /// Filtered releases that carry a non-empty tracklist.
    pub fn collections(&self, catalog: &Catalog) -> Vec<Arc<Release>> {
        self.filtered_releases(catalog)
            .into_iter()
            .filter(|r| !r.tracks().is_empty())
            .collect()
    }

    fn year_matches(&self, release: &Release) -> bool {
        match &self.year {
            Some(year) => release.year() == Some(year.as_str()),
            None => true,
        }
    }

    fn entry_matches(&self, entry: &QueueEntry) -> bool {
        if let Some(tag) = &self.tag {
            let own = entry.tags().iter().any(|t| t == tag);
            let inherited = entry.release.tags.iter().any(|t| t == tag);
            if !own && !inherited {
                return false;
            }
        }
        self.query_matches(entry)
    }

    fn query_matches(&self, entry: &QueueEntry) -> bool {
        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        let contains = |text: &str| text.to_lowercase().contains(&query);

        contains(entry.title())
            || entry.description().is_some_and(contains)
            || entry.tags().iter().any(|t| contains(t))
            || entry.lyrics().is_some_and(contains)
            || contains(&entry.release.title)
    }
}
