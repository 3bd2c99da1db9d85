/// Picked (multi-select) state and the action bar that acts on it
///
/// Picks are flags on the assets themselves, so a pick can never outlive
/// its asset. The action bar is only a display model; `main.rs` renders it.
use log::debug;

use super::data::AssetId;
use super::store::{AssetStore, DeleteRequest};

impl AssetStore {
    /// Number of picked assets.
    ///
    /// Linear in the number of loaded assets; selection changes far less often
    /// than the list renders.
    pub fn picked_count(&self) -> usize {
        self.assets().iter().filter(|asset| asset.picked).count()
    }

    pub fn is_picked(&self, id: AssetId) -> bool {
        self.assets().iter().any(|asset| asset.id == id && asset.picked)
    }

    /// Flip the pick of an asset. Unknown ids are ignored and return false.
    pub fn toggle_pick(&mut self, id: AssetId) -> bool {
        let picked = !self.is_picked(id);
        self.set_picked(id, picked)
    }

    fn set_picked(&mut self, id: AssetId, picked: bool) -> bool {
        match self.assets_mut().iter_mut().find(|asset| asset.id == id) {
            Some(asset) => {
                asset.picked = picked;
                true
            }
            None => {
                debug!("Ignoring pick for unknown asset {}", id);
                false
            }
        }
    }
}

/// Controls offered by the action bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionBarAction {
    /// Dismiss: unpick everything
    Clear,
    /// Destructive: delete every picked asset
    DeleteAll,
}

/// What the action bar shows while something is picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionBar {
    pub label: String,
}

impl ActionBar {
    pub const DISMISS_LABEL: &'static str = "Deselect";
    pub const DELETE_LABEL: &'static str = "Delete";

    /// The bar for `picked_count` picked assets, or `None` when nothing is
    /// picked and the bar must not be shown at all.
    pub fn for_count(picked_count: usize) -> Option<Self> {
        if picked_count == 0 {
            return None;
        }

        Some(Self {
            label: format!("{} {} selected", picked_count, pluralize("image", picked_count)),
        })
    }

    /// Run one of the bar's controls against the store.
    ///
    /// `DeleteAll` only snapshots the picked ids; the store changes once the
    /// delete collaborator answers (see `AssetStore::apply_delete`).
    pub fn apply(action: ActionBarAction, store: &mut AssetStore) -> Option<DeleteRequest> {
        match action {
            ActionBarAction::Clear => {
                store.clear_picked();
                None
            }
            ActionBarAction::DeleteAll => store.delete_picked(),
        }
    }
}

fn pluralize(noun: &str, count: usize) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{}s", noun)
    }
}
