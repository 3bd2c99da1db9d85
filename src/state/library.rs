use chrono::Utc;
use log::{debug, info};
use rusqlite::{params, Connection, ErrorCode};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::data::{Asset, AssetId};
use super::store::FetchTicket;
use crate::error::{BrowserError, Result};

/// Media file extensions picked up by a folder import
const MEDIA_EXTENSIONS: [&str; 22] = [
    "jpg", "jpeg", "png", "gif", "webp", "tif", "tiff", "heic", "avif", "bmp",
    "nef", "dng", "cr2", "cr3", "arw", "raf", "orf", "rw2", "pef", "srw", "mp4", "mov",
];

/// The Library manages the SQLite catalog database.
/// It is the paged data source, the delete target and the import sink for
/// the asset store.
pub struct Library {
    conn: Connection,
    db_path: PathBuf,
}

impl Library {
    /// Open the catalog at the default location, creating it if needed.
    ///
    /// The database file is created in the user's data directory:
    /// - Linux: ~/.local/share/asset-browser/assets.db
    /// - macOS: ~/Library/Application Support/asset-browser/assets.db
    /// - Windows: %APPDATA%\asset-browser\assets.db
    pub fn new() -> Result<Self> {
        Self::open(&Self::get_db_path()?)
    }

    /// Open (or create) the catalog at `db_path`
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        info!("📁 Catalog opened at: {}", db_path.display());

        let mut library = Library {
            conn,
            db_path: db_path.to_path_buf(),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Catalog without a file, for tests
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut library = Library {
            conn,
            db_path: PathBuf::from(":memory:"),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Get the path where the database should be stored
    fn get_db_path() -> Result<PathBuf> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(BrowserError::NoDataDir)?;

        path.push("asset-browser");
        path.push("assets.db");
        Ok(path)
    }

    /// Initialize the database schema.
    /// Creates the assets table and its ordering index if they don't exist.
    fn init_schema(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS assets (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                path            TEXT NOT NULL UNIQUE,
                filename        TEXT NOT NULL,
                imported_at     INTEGER NOT NULL
            )",
            [],
        )?;

        // Pages are read newest first
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_assets_imported_at
             ON assets(imported_at DESC, id DESC)",
            [],
        )?;

        debug!("✅ Catalog schema initialized");
        Ok(())
    }

    /// Get the path to the database file
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Get a count of assets in the catalog
    pub fn asset_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM assets", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Add a file to the catalog and return it as an asset
    pub fn import_asset(&self, path: &Path) -> Result<Asset> {
        let filename = path
            .file_name()
            .ok_or_else(|| BrowserError::InvalidPath(path.display().to_string()))?
            .to_string_lossy()
            .to_string();
        let path_str = path.to_string_lossy().to_string();
        let imported_at = Utc::now().timestamp();

        let result = self.conn.execute(
            "INSERT INTO assets (path, filename, imported_at) VALUES (?1, ?2, ?3)",
            params![&path_str, &filename, imported_at],
        );

        match result {
            Ok(_) => Ok(Asset::new(
                self.conn.last_insert_rowid(),
                filename,
                path_str,
                imported_at,
            )),
            Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
                Err(BrowserError::Database(format!("{} is already in the catalog", filename)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read one page of assets, newest first
    pub fn fetch_page(&self, offset: usize, limit: usize) -> Result<Vec<Asset>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, filename, path, imported_at FROM assets
             ORDER BY imported_at DESC, id DESC
             LIMIT ?1 OFFSET ?2",
        )?;

        let asset_iter = stmt.query_map(params![limit as i64, offset as i64], |row| {
            Ok(Asset::new(row.get(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?, row.get(3)?))
        })?;

        let mut assets = Vec::new();
        for asset in asset_iter {
            assets.push(asset?);
        }

        Ok(assets)
    }

    /// Delete assets in a single transaction: either all go or none do.
    pub fn delete_assets(&mut self, ids: &[AssetId]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let mut deleted = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM assets WHERE id = ?1")?;
            for id in ids {
                deleted += stmt.execute(params![id.0])?;
            }
        }
        tx.commit()?;

        info!("🗑️  Removed {} assets from the catalog", deleted);
        Ok(deleted)
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}

/// Fetch the page described by `ticket` on a blocking thread.
/// rusqlite::Connection is not Send, so each task opens its own connection.
pub async fn fetch_page_async(db_path: PathBuf, ticket: FetchTicket) -> Result<Vec<Asset>> {
    tokio::task::spawn_blocking(move || {
        let library = Library::open(&db_path)?;
        library.fetch_page(ticket.offset, ticket.limit)
    })
    .await?
}

/// Delete `ids` on a blocking thread (all or nothing)
pub async fn delete_assets_async(db_path: PathBuf, ids: Vec<AssetId>) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut library = Library::open(&db_path)?;
        library.delete_assets(&ids).map(|_| ())
    })
    .await?
}

/// Import one file on a blocking thread
pub async fn import_file_async(db_path: PathBuf, path: PathBuf) -> Result<Asset> {
    tokio::task::spawn_blocking(move || {
        let library = Library::open(&db_path)?;
        library.import_asset(&path)
    })
    .await?
}

/// List the media files under `folder`, recursively
pub async fn scan_folder_async(folder: PathBuf) -> Result<Vec<PathBuf>> {
    tokio::task::spawn_blocking(move || scan_folder(&folder)).await
        .map_err(BrowserError::from)
}

fn scan_folder(folder: &Path) -> Vec<PathBuf> {
    info!("🔍 Scanning folder: {}", folder.display());

    let files: Vec<PathBuf> = WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file() && is_media_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    info!("🔍 Found {} media files", files.len());
    files
}

pub fn is_media_file(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            MEDIA_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
