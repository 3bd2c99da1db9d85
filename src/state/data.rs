/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the catalog layer, the asset store and the UI layer.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog row id of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetId(pub i64);

/// Id of an in-progress upload.
/// Uploads live in their own namespace and never share ids with assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UploadId(pub u64);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "upload-{}", self.0)
    }
}

/// Represents a single asset in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// Unique catalog ID
    pub id: AssetId,
    /// Filename only (e.g., "DSC_0001.NEF")
    pub filename: String,
    /// Full path to the media file
    pub path: String,
    /// Unix timestamp of the import
    pub imported_at: i64,
    /// Marked by the user for a bulk action
    pub picked: bool,
}

impl Asset {
    pub fn new(id: i64, filename: impl Into<String>, path: impl Into<String>, imported_at: i64) -> Self {
        Self {
            id: AssetId(id),
            filename: filename.into(),
            path: path.into(),
            imported_at,
            picked: false,
        }
    }
}

/// Lifecycle of an upload while it is shown in the overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    /// Waiting for its import task to start
    Queued,
    Importing,
    /// Import failed; kept until dismissed
    Failed(String),
}

/// A local-only entry for a file that is being imported
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    pub id: UploadId,
    pub filename: String,
    pub path: String,
    pub status: UploadStatus,
}

impl Upload {
    pub fn is_pending(&self) -> bool {
        !matches!(self.status, UploadStatus::Failed(_))
    }
}

/// Which windowing layout presents the items
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    List,
    #[default]
    Grid,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::List => ViewMode::Grid,
            ViewMode::Grid => ViewMode::List,
        }
    }
}
