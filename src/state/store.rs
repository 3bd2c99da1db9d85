use log::{debug, info, warn};
use std::collections::HashSet;

use super::data::{Asset, AssetId, Upload, ViewMode};
use crate::error::BrowserError;

/// Page size used until the settings say otherwise
pub const DEFAULT_PAGE_SIZE: usize = 100;
/// Upper bound accepted for a page size
pub const MAX_PAGE_SIZE: usize = 1000;

/// How far into the catalog the store has read.
///
/// `last_page_count` is `None` until a page has been received. A full last
/// page means another page may exist; anything shorter (including an empty
/// page) means the end has been reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCursor {
    /// Number of catalog rows consumed so far
    pub offset: usize,
    pub last_page_count: Option<usize>,
}

/// Handed out when a page fetch starts; the result is applied with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub offset: usize,
    pub limit: usize,
}

/// Snapshot of the picked ids sent to the delete collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest {
    pub ids: Vec<AssetId>,
}

/// What happened to a page result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page accepted; number of new assets appended
    Appended(usize),
    /// Fetch failed; cursor left untouched
    Failed,
    /// Result belonged to a cancelled or reset fetch
    Discarded,
}

/// What the item area should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Loading,
    /// A fetch completed, nothing is in flight and there is nothing to show
    Empty,
    Items,
}

/// The authoritative, ordered collection of fetched assets.
///
/// One store exists per browsing session; it is passed by reference to the
/// loader, the selection helpers and the views.
///
/// Catalog access is serialized: a page fetch and a catalog write (delete or
/// import) are never in flight together. The cursor is an offset into a
/// catalog that writes shift, so a page must be read entirely before or
/// entirely after each write for the offset arithmetic to hold.
#[derive(Debug)]
pub struct AssetStore {
    assets: Vec<Asset>,
    cursor: PageCursor,
    page_size: usize,
    fetching: bool,
    /// A delete or import is committing to the catalog
    writing: bool,
    generation: u64,
    view: ViewMode,
    last_error: Option<BrowserError>,
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, ViewMode::default())
    }
}

impl AssetStore {
    pub fn new(page_size: usize, view: ViewMode) -> Self {
        Self {
            assets: Vec::new(),
            cursor: PageCursor::default(),
            page_size: clamp_page_size(page_size),
            fetching: false,
            writing: false,
            generation: 0,
            view,
            last_error: None,
        }
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub(crate) fn assets_mut(&mut self) -> &mut [Asset] {
        &mut self.assets
    }

    pub fn loaded_count(&self) -> usize {
        self.assets.len()
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn is_writing(&self) -> bool {
        self.writing
    }

    /// A fetch or a catalog write is in flight
    pub fn is_busy(&self) -> bool {
        self.fetching || self.writing
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn set_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    /// Last fetch failure, kept for the status line
    pub fn last_error(&self) -> Option<&BrowserError> {
        self.last_error.as_ref()
    }

    /// True once at least one page has been received
    pub fn has_fetched_once(&self) -> bool {
        self.cursor.last_page_count.is_some()
    }

    /// The last page was full, so another one might exist.
    ///
    /// This can be a false positive when the catalog holds an exact multiple
    /// of the page size; the following empty page settles it.
    pub fn has_more(&self) -> bool {
        self.cursor.last_page_count == Some(self.page_size)
    }

    /// Start fetching the next page.
    ///
    /// Returns `None` if a fetch is already in flight, or while a catalog
    /// write is committing. Callers are expected to check `is_fetching`
    /// first; the loader does.
    pub fn load_next_page(&mut self) -> Option<FetchTicket> {
        if self.fetching {
            warn!("⚠️  Page fetch requested while another is in flight; ignoring");
            return None;
        }
        if self.writing {
            debug!("⏳ Page fetch held until the catalog write lands");
            return None;
        }

        self.fetching = true;
        let ticket = FetchTicket {
            generation: self.generation,
            offset: self.cursor.offset,
            limit: self.page_size,
        };
        debug!("📥 Fetching page at offset {} (limit {})", ticket.offset, ticket.limit);
        Some(ticket)
    }

    /// Apply the result of the fetch started with `ticket`.
    pub fn apply_page(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Asset>, BrowserError>,
    ) -> PageOutcome {
        if ticket.generation != self.generation {
            debug!("🗑️  Dropping page for offset {} from a cancelled fetch", ticket.offset);
            return PageOutcome::Discarded;
        }

        self.fetching = false;

        match result {
            Ok(page) => {
                let received = page.len();
                let known: HashSet<AssetId> = self.assets.iter().map(|a| a.id).collect();
                let before = self.assets.len();
                self.assets
                    .extend(page.into_iter().filter(|asset| !known.contains(&asset.id)));
                let appended = self.assets.len() - before;

                self.cursor.offset += received;
                self.cursor.last_page_count = Some(received);
                self.last_error = None;

                info!(
                    "📄 Page received: {} assets ({} new), {} loaded",
                    received,
                    appended,
                    self.assets.len()
                );
                PageOutcome::Appended(appended)
            }
            Err(err) => {
                warn!("⚠️  Page fetch at offset {} failed: {}", ticket.offset, err);
                self.last_error = Some(err);
                PageOutcome::Failed
            }
        }
    }

    /// Give up on the fetch in flight. Its result will be discarded when it
    /// arrives and a new fetch may start immediately.
    pub fn cancel_fetch(&mut self) {
        if self.fetching {
            self.fetching = false;
            self.generation += 1;
            debug!("✋ Fetch cancelled");
        }
    }

    /// Drop everything loaded so far and start over from the first page.
    pub fn reset(&mut self) {
        self.assets.clear();
        self.cursor = PageCursor::default();
        self.fetching = false;
        self.generation += 1;
        self.last_error = None;
        // A write in flight still commits and is applied when it answers.
        info!("🔄 Asset store reset");
    }

    /// Change the page size; this invalidates the cursor, so the store resets.
    /// Returns false, leaving any fetch in flight alone, when the clamped
    /// size is unchanged.
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        let page_size = clamp_page_size(page_size);
        if page_size == self.page_size {
            return false;
        }
        self.page_size = page_size;
        self.reset();
        true
    }

    /// Claim the catalog for a write. Returns false while a fetch or another
    /// write is in flight; the caller retries once the store is idle.
    pub fn begin_write(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.writing = true;
        true
    }

    /// Release the catalog after a write that changed nothing locally
    /// (a failed import, for instance).
    pub fn end_write(&mut self) {
        self.writing = false;
    }

    /// Ids of every picked asset, for the delete collaborator.
    ///
    /// `None` when nothing is picked or the catalog is busy (check
    /// `is_busy` to tell the two apart). On success the catalog is claimed
    /// until `apply_delete`.
    pub fn delete_picked(&mut self) -> Option<DeleteRequest> {
        let ids = self.picked_ids();
        if ids.is_empty() || !self.begin_write() {
            return None;
        }
        Some(DeleteRequest { ids })
    }

    /// Apply the delete collaborator's answer. All or nothing: on failure the
    /// picks stay so the user can retry.
    pub fn apply_delete(&mut self, request: &DeleteRequest, result: Result<(), BrowserError>) -> usize {
        self.end_write();
        if let Err(err) = result {
            warn!("⚠️  Deleting {} assets failed: {}", request.ids.len(), err);
            return 0;
        }

        let doomed: HashSet<AssetId> = request.ids.iter().copied().collect();
        let before = self.assets.len();
        self.assets.retain(|asset| !doomed.contains(&asset.id));
        let removed = before - self.assets.len();

        // Deleted rows sat before the cursor, so the rest of the catalog shifts up.
        self.cursor.offset = self.cursor.offset.saturating_sub(removed);

        info!("🗑️  Deleted {} assets", removed);
        removed
    }

    /// Unpick everything; the asset sequence is untouched.
    pub fn clear_picked(&mut self) {
        for asset in self.assets.iter_mut() {
            asset.picked = false;
        }
    }

    pub fn picked_ids(&self) -> Vec<AssetId> {
        self.assets
            .iter()
            .filter(|asset| asset.picked)
            .map(|asset| asset.id)
            .collect()
    }

    /// Put a freshly imported asset at the front (the catalog is newest first)
    /// and release the catalog claimed for the import.
    pub fn insert_uploaded(&mut self, asset: Asset) {
        self.end_write();
        if self.assets.iter().any(|a| a.id == asset.id) {
            return;
        }
        self.assets.insert(0, asset);
        // The catalog grew ahead of the cursor.
        self.cursor.offset += 1;
    }

    /// Loading, empty or items, given the uploads currently in the overlay.
    pub fn display_state(&self, uploads: &[Upload]) -> DisplayState {
        let has_items = !self.assets.is_empty() || !uploads.is_empty();
        if has_items {
            DisplayState::Items
        } else if self.has_fetched_once() && !self.fetching {
            DisplayState::Empty
        } else {
            DisplayState::Loading
        }
    }
}

pub fn clamp_page_size(page_size: usize) -> usize {
    page_size.clamp(1, MAX_PAGE_SIZE)
}
