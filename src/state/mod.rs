/// State management module
///
/// This module handles all application state, including:
/// - The SQLite catalog and its async helpers (library.rs)
/// - Shared data structures (data.rs)
/// - The paged asset store and picked state (store.rs, selection.rs)
/// - In-progress uploads (uploads.rs)
/// - Windowing and incremental loading (window.rs, loader.rs)
/// - Responsive panel state and persisted settings (panel.rs, settings.rs)

pub mod data;
pub mod library;
pub mod loader;
pub mod panel;
pub mod selection;
pub mod settings;
pub mod store;
pub mod uploads;
pub mod window;
