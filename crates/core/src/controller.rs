//! Notification list control: selection, paging, and the local application
//! of bulk read/delete results.
//!
//! [`FeedController`] is a pure view-state machine over a derived feed. It
//! never performs store mutations itself; callers run those, reduce the
//! per-id results into a [`BulkOutcome`], and apply it back here. That
//! split keeps the partial-failure rules (successes land, selection
//! survives) unit-testable without any I/O.

use std::collections::HashSet;

use crate::feed::FeedEntry;
use crate::pagination::{self, DEFAULT_PAGE_SIZE};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Bulk outcomes
// ---------------------------------------------------------------------------

/// Reduced result of a batch of per-id store mutations.
#[derive(Debug, Clone, Default)]
pub struct BulkOutcome {
    pub succeeded: Vec<DbId>,
    pub failed: Vec<(DbId, String)>,
}

impl BulkOutcome {
    /// An outcome where every id landed.
    pub fn success(ids: Vec<DbId>) -> Self {
        BulkOutcome {
            succeeded: ids,
            failed: Vec::new(),
        }
    }

    /// True when no mutation in the batch failed.
    pub fn complete(&self) -> bool {
        self.failed.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// View state over the derived notification feed: display-ordered entries
/// plus selection and paging.
#[derive(Debug, Clone)]
pub struct FeedController {
    items: Vec<FeedEntry>,
    selected: HashSet<DbId>,
    page: u32,
    page_size: u32,
}

impl Default for FeedController {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedController {
    pub fn new() -> Self {
        FeedController {
            items: Vec::new(),
            selected: HashSet::new(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn items(&self) -> &[FeedEntry] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_pages(&self) -> u32 {
        pagination::total_pages(self.items.len(), self.page_size)
    }

    pub fn selected(&self) -> &HashSet<DbId> {
        &self.selected
    }

    /// Install a fresh derivation result. The selection is pruned to ids
    /// that still exist and the page is re-clamped against the new length;
    /// an in-flight selection otherwise survives a refresh.
    pub fn replace_items(&mut self, items: Vec<FeedEntry>) {
        let live: HashSet<DbId> = items.iter().filter_map(|e| e.id).collect();
        self.selected.retain(|id| live.contains(id));
        self.items = items;
        self.page = pagination::clamp_page(self.page, self.items.len(), self.page_size);
    }

    /// The entries visible on the current page.
    pub fn current_page(&self) -> &[FeedEntry] {
        let (start, end) = pagination::page_bounds(self.page, self.items.len(), self.page_size);
        &self.items[start..end]
    }

    /// Toggle selection of one entry. Ignored unless the id is on the
    /// current page, so paging away and back cannot grow a hidden
    /// selection by accident.
    pub fn toggle_select(&mut self, id: DbId) {
        if !self.current_page().iter().any(|e| e.id == Some(id)) {
            return;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Select every entry on the current page, or clear them all when they
    /// are already all selected. Selections on other pages are untouched.
    pub fn toggle_select_all_on_page(&mut self) {
        let page_ids: Vec<DbId> = self.current_page().iter().filter_map(|e| e.id).collect();
        if page_ids.is_empty() {
            return;
        }
        if page_ids.iter().all(|id| self.selected.contains(id)) {
            for id in &page_ids {
                self.selected.remove(id);
            }
        } else {
            self.selected.extend(page_ids);
        }
    }

    /// Selected ids that exist in the item list, in display order. Bulk
    /// operations act on exactly this set; empty means there is nothing
    /// valid to operate on.
    pub fn selection_for_update(&self) -> Vec<DbId> {
        self.items
            .iter()
            .filter_map(|e| e.id)
            .filter(|id| self.selected.contains(id))
            .collect()
    }

    /// Apply a bulk read/unread outcome. Succeeded ids flip `is_read`
    /// (marking read also marks viewed, since an unseen-but-read state does
    /// not exist); failed ids keep their previous state. The selection
    /// clears only when the whole batch landed, so a partial failure can be
    /// retried as-is.
    pub fn apply_set_read(&mut self, outcome: &BulkOutcome, is_read: bool) {
        let touched: HashSet<DbId> = outcome.succeeded.iter().copied().collect();
        for entry in &mut self.items {
            if entry.id.is_some_and(|id| touched.contains(&id)) {
                entry.is_read = is_read;
                if is_read {
                    entry.is_viewed = true;
                }
            }
        }
        if outcome.complete() {
            self.selected.clear();
        }
    }

    /// Apply a bulk delete outcome: succeeded ids leave both the list and
    /// the selection, and the page re-clamps against the shorter list.
    pub fn apply_delete(&mut self, outcome: &BulkOutcome) {
        let removed: HashSet<DbId> = outcome.succeeded.iter().copied().collect();
        self.items
            .retain(|e| !e.id.is_some_and(|id| removed.contains(&id)));
        self.selected.retain(|id| !removed.contains(id));
        self.page = pagination::clamp_page(self.page, self.items.len(), self.page_size);
    }

    /// Jump to a page, clamped into `[1, total_pages]`.
    pub fn set_page(&mut self, page: u32) {
        self.page = pagination::clamp_page(page, self.items.len(), self.page_size);
    }

    /// Change the page size. Values outside [`pagination::PAGE_SIZE_OPTIONS`]
    /// are ignored; an accepted change resets to the first page.
    pub fn set_page_size(&mut self, size: u32) {
        if !pagination::is_valid_page_size(size) {
            return;
        }
        self.page_size = size;
        self.page = 1;
    }
}
