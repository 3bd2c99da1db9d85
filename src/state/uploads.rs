/// In-progress uploads and the combined item sequence
///
/// The overlay is read-only for the listing engine: the `UploadQueue` is
/// owned by whoever produces uploads (the folder import in `main.rs`) and
/// the engine only ever sees `&[Upload]`, placed in front of the assets.
use std::path::{Path, PathBuf};

use super::data::{Asset, Upload, UploadId, UploadStatus};

/// Producer-side list of uploads
#[derive(Debug, Default)]
pub struct UploadQueue {
    uploads: Vec<Upload>,
    next_id: u64,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[Upload] {
        &self.uploads
    }

    pub fn len(&self) -> usize {
        self.uploads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.uploads.iter().filter(|u| u.is_pending()).count()
    }

    /// Add a file to the overlay. Ids are never reused.
    pub fn enqueue(&mut self, path: &Path) -> UploadId {
        let id = UploadId(self.next_id);
        self.next_id += 1;

        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        self.uploads.push(Upload {
            id,
            filename,
            path: path.to_string_lossy().to_string(),
            status: UploadStatus::Queued,
        });
        id
    }

    /// Oldest upload still waiting for its import to start
    pub fn next_queued(&self) -> Option<(UploadId, PathBuf)> {
        self.uploads
            .iter()
            .find(|u| u.status == UploadStatus::Queued)
            .map(|u| (u.id, PathBuf::from(&u.path)))
    }

    pub fn mark_importing(&mut self, id: UploadId) {
        if let Some(upload) = self.uploads.iter_mut().find(|u| u.id == id) {
            upload.status = UploadStatus::Importing;
        }
    }

    /// The upload turned into an asset; it leaves the overlay.
    pub fn complete(&mut self, id: UploadId) -> Option<Upload> {
        let index = self.uploads.iter().position(|u| u.id == id)?;
        Some(self.uploads.remove(index))
    }

    pub fn fail(&mut self, id: UploadId, reason: impl Into<String>) {
        if let Some(upload) = self.uploads.iter_mut().find(|u| u.id == id) {
            upload.status = UploadStatus::Failed(reason.into());
        }
    }

    /// Remove failed uploads, returning how many were dropped
    pub fn dismiss_failed(&mut self) -> usize {
        let before = self.uploads.len();
        self.uploads.retain(|u| u.is_pending());
        before - self.uploads.len()
    }
}

/// One entry of the combined sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Item<'a> {
    Upload(&'a Upload),
    Asset(&'a Asset),
}

/// What sits at a display index
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    Item(Item<'a>),
    /// Trailing "maybe more" slot; never an asset
    Placeholder,
}

impl<'a> Slot<'a> {
    /// The asset at this slot, if any. Uploads and the placeholder have none,
    /// so they can never be picked or deleted.
    pub fn asset(&self) -> Option<&'a Asset> {
        match *self {
            Slot::Item(Item::Asset(asset)) => Some(asset),
            _ => None,
        }
    }
}

/// Number of display slots, including the placeholder while more may exist
pub fn display_len(uploads: &[Upload], assets: &[Asset], has_more: bool) -> usize {
    uploads.len() + assets.len() + usize::from(has_more)
}

/// Look up a display index in the combined sequence: uploads first, then
/// assets in catalog order, then the placeholder while more may exist.
pub fn resolve<'a>(
    uploads: &'a [Upload],
    assets: &'a [Asset],
    has_more: bool,
    index: usize,
) -> Option<Slot<'a>> {
    if let Some(upload) = uploads.get(index) {
        return Some(Slot::Item(Item::Upload(upload)));
    }

    let asset_index = index - uploads.len();
    if let Some(asset) = assets.get(asset_index) {
        return Some(Slot::Item(Item::Asset(asset)));
    }

    if has_more && asset_index == assets.len() {
        Some(Slot::Placeholder)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assets(count: i64) -> Vec<Asset> {
        (0..count)
            .map(|id| Asset::new(id, format!("{}.jpg", id), format!("/p/{}.jpg", id), 0))
            .collect()
    }

    #[test]
    fn test_uploads_come_first() {
        let mut queue = UploadQueue::new();
        queue.enqueue(&PathBuf::from("/import/a.nef"));
        let assets = assets(2);

        let order: Vec<String> = (0..display_len(queue.as_slice(), &assets, false))
            .filter_map(|index| resolve(queue.as_slice(), &assets, false, index))
            .map(|slot| match slot {
                Slot::Item(Item::Upload(u)) => u.filename.clone(),
                Slot::Item(Item::Asset(a)) => a.filename.clone(),
                Slot::Placeholder => String::new(),
            })
            .collect();
        assert_eq!(order, vec!["a.nef", "0.jpg", "1.jpg"]);
    }

    #[test]
    fn test_upload_ids_are_never_reused() {
        let mut queue = UploadQueue::new();
        let first = queue.enqueue(&PathBuf::from("/a.nef"));
        queue.complete(first);
        let second = queue.enqueue(&PathBuf::from("/b.nef"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_next_queued_in_order() {
        let mut queue = UploadQueue::new();
        let a = queue.enqueue(&PathBuf::from("/a.nef"));
        let b = queue.enqueue(&PathBuf::from("/b.nef"));
        assert_eq!(queue.next_queued().map(|(id, _)| id), Some(a));
        queue.mark_importing(a);
        assert_eq!(queue.next_queued(), Some((b, PathBuf::from("/b.nef"))));
    }

    #[test]
    fn test_upload_lifecycle() {
        let mut queue = UploadQueue::new();
        let a = queue.enqueue(&PathBuf::from("/a.nef"));
        let b = queue.enqueue(&PathBuf::from("/b.nef"));
        queue.mark_importing(a);
        assert_eq!(queue.as_slice()[0].status, UploadStatus::Importing);

        queue.fail(b, "unreadable");
        assert_eq!(queue.pending_count(), 1);
        assert!(queue.complete(a).is_some());
        assert_eq!(queue.dismiss_failed(), 1);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_placeholder_resolves_to_no_asset() {
        let assets = assets(3);
        let slot = resolve(&[], &assets, true, 3).unwrap();
        assert_eq!(slot, Slot::Placeholder);
        assert!(slot.asset().is_none());
        assert!(resolve(&[], &assets, true, 4).is_none());
    }

    #[test]
    fn test_no_placeholder_without_more() {
        let assets = assets(3);
        assert_eq!(display_len(&[], &assets, false), 3);
        assert!(resolve(&[], &assets, false, 3).is_none());
    }

    #[test]
    fn test_resolve_skips_upload_prefix() {
        let mut queue = UploadQueue::new();
        queue.enqueue(&PathBuf::from("/a.nef"));
        let assets = assets(2);

        assert!(resolve(queue.as_slice(), &assets, true, 0).unwrap().asset().is_none());
        assert_eq!(
            resolve(queue.as_slice(), &assets, true, 1).unwrap().asset().map(|a| a.id.0),
            Some(0)
        );
        assert_eq!(display_len(queue.as_slice(), &assets, true), 4);
    }
}
