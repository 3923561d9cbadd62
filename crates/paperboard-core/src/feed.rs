//! Feed state store.

use paperboard_models::{NewsId, NewsItem};
use tracing::debug;

/// In-memory ordered cache of the remote news collection.
///
/// The store only ever holds the last confirmed server read; adds and
/// deletes go straight to the gateway and are never applied locally
/// (non-optimistic consistency). A change notification or an explicit
/// refresh brings the next confirmed listing in through `apply_listing`.
#[derive(Debug, Default)]
pub struct FeedStore {
    items: Vec<NewsItem>,
    refreshing: bool,
    last_error: Option<String>,
}

impl FeedStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached items, newest first.
    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    /// Returns the item at the given position, if any.
    pub fn get(&self, index: usize) -> Option<&NewsItem> {
        self.items.get(index)
    }

    /// Number of cached items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Marks a refresh as in flight.
    pub fn begin_refresh(&mut self) {
        self.refreshing = true;
    }

    /// True while a refresh is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// Replaces the cache with a confirmed server read.
    ///
    /// Items are re-sorted newest first so the ordering invariant holds no
    /// matter what order the caller hands them over in.
    pub fn apply_listing(&mut self, mut items: Vec<NewsItem>) {
        items.sort_by(|a, b| b.created_at_millis.cmp(&a.created_at_millis));
        debug!(count = items.len(), "feed listing applied");
        self.items = items;
        self.refreshing = false;
        self.last_error = None;
    }

    /// Records a failed refresh; the previous listing stays on display.
    pub fn refresh_failed(&mut self, error: impl Into<String>) {
        self.refreshing = false;
        self.last_error = Some(error.into());
    }

    /// The last refresh error, if the most recent refresh failed.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True if the cache contains an item with the given id.
    pub fn contains(&self, id: &NewsId) -> bool {
        self.items.iter().any(|item| &item.id == id)
    }

    /// Drops the cache, e.g. on sign-out.
    pub fn clear(&mut self) {
        self.items.clear();
        self.refreshing = false;
        self.last_error = None;
    }
}
