use iced::widget::{button, column, container, row, scrollable, text, text_input, Column};
use iced::{alignment, task, Element, Length, Size, Subscription, Task, Theme};
use log::{error, info, warn};
use rfd::FileDialog;
use std::path::PathBuf;

mod error;
mod state;
mod ui;

use error::BrowserError;
use state::data::{Asset, AssetId, UploadId, ViewMode};
use state::library::{self, Library};
use state::loader::{IncrementalLoader, LoadDecision};
use state::panel::{breakpoint_index, DetailsPanel};
use state::selection::{ActionBar, ActionBarAction};
use state::settings::Settings;
use state::store::{AssetStore, DeleteRequest, DisplayState, FetchTicket, PageOutcome};
use state::uploads::UploadQueue;
use state::window::{content_height, grid_items_rendered, list_items_rendered, ItemsRendered};
use ui::grid::GridLayout;
use ui::list::ListLayout;

/// Height of the toolbar above the items
const TOOLBAR_HEIGHT: f32 = 48.0;
/// Height of the status line below the items
const STATUS_HEIGHT: f32 = 28.0;
/// Width of the details panel when open
const DETAILS_WIDTH: f32 = 240.0;

/// Main application state
struct AssetBrowser {
    /// The catalog database
    library: Library,
    store: AssetStore,
    uploads: UploadQueue,
    loader: IncrementalLoader,
    details: DetailsPanel,
    settings: Settings,
    settings_path: Option<PathBuf>,
    list_layout: ListLayout,
    grid_layout: GridLayout,
    /// Size of the window, from resize events
    window_size: Size,
    /// Size of the items scrollable, once it has reported a viewport
    items_size: Option<Size>,
    scroll_y: f32,
    /// Abort hook for the page fetch in flight
    fetch_handle: Option<task::Handle>,
    deleting: bool,
    /// Delete requested while the catalog was busy; runs once it is idle
    delete_queued: bool,
    page_size_input: String,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    PageLoaded(FetchTicket, Result<Vec<Asset>, BrowserError>),
    Scrolled(scrollable::Viewport),
    WindowResized(Size),
    TogglePick(AssetId),
    ActionBar(ActionBarAction),
    DeleteFinished(DeleteRequest, Result<(), BrowserError>),
    /// User clicked the "Import Folder" button
    ImportFolder,
    FolderScanned(Result<Vec<PathBuf>, BrowserError>),
    UploadFinished(UploadId, Result<Asset, BrowserError>),
    DismissFailedUploads,
    ToggleView,
    ToggleDetails,
    PageSizeChanged(String),
    PageSizeSubmitted,
    Refresh,
    Retry,
}

impl AssetBrowser {
    /// Create the application and start fetching the first page
    fn new(library: Library, settings: Settings, settings_path: Option<PathBuf>) -> (Self, Task<Message>) {
        let asset_count = library.asset_count().unwrap_or(0);
        info!("🎨 Asset Browser initialized with {} assets", asset_count);

        let mut browser = AssetBrowser {
            library,
            store: AssetStore::new(settings.page_size, settings.view),
            uploads: UploadQueue::new(),
            loader: IncrementalLoader::new(),
            details: DetailsPanel::new(settings.details_panel),
            page_size_input: settings.page_size.to_string(),
            settings,
            settings_path,
            list_layout: ListLayout::default(),
            grid_layout: GridLayout::default(),
            window_size: Size::new(1024.0, 768.0),
            items_size: None,
            scroll_y: 0.0,
            fetch_handle: None,
            deleting: false,
            delete_queued: false,
            status: format!("Ready. {} assets in catalog.", asset_count),
        };

        let task = browser.start_first_page();
        (browser, task)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        let task = match message {
            Message::PageLoaded(ticket, result) => {
                if self.store.apply_page(ticket, result) != PageOutcome::Discarded {
                    self.fetch_handle = None;
                }
                Task::none()
            }
            Message::Scrolled(viewport) => {
                self.scroll_y = viewport.absolute_offset().y;
                self.items_size = Some(viewport.bounds().size());
                Task::none()
            }
            Message::WindowResized(size) => {
                self.window_size = size;
                self.items_size = None;
                if self.details.on_breakpoint(breakpoint_index(size.width)) {
                    self.settings.details_panel = false;
                }
                Task::none()
            }
            Message::TogglePick(id) => {
                self.store.toggle_pick(id);
                // The action bar may have appeared or gone; re-derive the viewport.
                self.items_size = None;
                Task::none()
            }
            Message::ActionBar(action) => {
                self.items_size = None;
                self.run_action(action)
            }
            Message::DeleteFinished(request, result) => {
                self.deleting = false;
                self.items_size = None;
                if let Err(err) = &result {
                    self.status = format!("⚠️  Delete failed: {}", err);
                }
                let removed = self.store.apply_delete(&request, result);
                if removed > 0 {
                    self.status = format!("Deleted {} {}.", removed, if removed == 1 { "asset" } else { "assets" });
                }
                Task::none()
            }
            Message::ImportFolder => {
                // Show the native folder picker dialog
                let folder = FileDialog::new()
                    .set_title("Select Folder to Import")
                    .pick_folder();

                match folder {
                    Some(folder_path) => {
                        self.status = format!("Scanning {}...", folder_path.display());
                        Task::perform(library::scan_folder_async(folder_path), Message::FolderScanned)
                    }
                    None => Task::none(),
                }
            }
            Message::FolderScanned(Ok(files)) => {
                for path in &files {
                    self.uploads.enqueue(path);
                }
                self.status = format!("Importing {} files...", files.len());
                Task::none()
            }
            Message::FolderScanned(Err(err)) => {
                warn!("⚠️  Folder scan failed: {}", err);
                self.status = format!("⚠️  Could not scan folder: {}", err);
                Task::none()
            }
            Message::UploadFinished(id, result) => {
                match result {
                    Ok(asset) => {
                        self.uploads.complete(id);
                        self.store.insert_uploaded(asset);
                    }
                    Err(err) => {
                        warn!("⚠️  Import of {} failed: {}", id, err);
                        self.store.end_write();
                        self.uploads.fail(id, err.to_string());
                    }
                }
                if self.uploads.pending_count() == 0 {
                    self.status = "✅ Import complete!".to_string();
                }
                Task::none()
            }
            Message::DismissFailedUploads => {
                self.uploads.dismiss_failed();
                Task::none()
            }
            Message::ToggleView => {
                self.store.set_view(self.store.view().toggled());
                self.settings.view = self.store.view();
                self.save_settings();
                self.scroll_y = 0.0;
                scrollable::scroll_to(ui::items_scroll_id(), scrollable::AbsoluteOffset { x: 0.0, y: 0.0 })
            }
            Message::ToggleDetails => {
                self.details.toggle();
                self.settings.details_panel = self.details.is_visible();
                self.save_settings();
                self.items_size = None;
                Task::none()
            }
            Message::PageSizeChanged(value) => {
                self.page_size_input = value;
                Task::none()
            }
            Message::PageSizeSubmitted => {
                let changed = match self.page_size_input.trim().parse::<usize>() {
                    Ok(page_size) => self.store.set_page_size(page_size),
                    Err(_) => false,
                };
                self.page_size_input = self.store.page_size().to_string();
                if changed {
                    // The store already reset; only the task is left to abort.
                    self.cancel_fetch();
                    self.settings.page_size = self.store.page_size();
                    self.save_settings();
                    self.start_first_page()
                } else {
                    Task::none()
                }
            }
            Message::Refresh => {
                self.cancel_fetch();
                self.store.reset();
                self.start_first_page()
            }
            Message::Retry => self.start_first_page(),
        };

        // Every update is followed by a render; check what it will show.
        // Page loads go first so a long import cannot starve scrolling.
        let load = self.load_visible();
        let write = self.resume_catalog_writes();
        Task::batch([task, load, write])
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let picked_count = self.store.picked_count();
        let mut layout: Column<Message> = column![self.toolbar()];

        if let Some(bar) = ui::action_bar::view(ActionBar::for_count(picked_count), self.deleting) {
            layout = layout.push(bar);
        }

        let items: Element<Message> = match self.store.display_state(self.uploads.as_slice()) {
            DisplayState::Empty => container(text("No assets in the catalog").size(14))
                .padding(16)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            DisplayState::Loading => self.loading_view(),
            DisplayState::Items => self.items_view(),
        };

        let body: Element<Message> = if self.details.is_visible() {
            row![items, self.details_view()].height(Length::Fill).into()
        } else {
            items
        };

        layout
            .push(body)
            .push(
                container(text(self.status_line()).size(12))
                    .height(STATUS_HEIGHT)
                    .padding([4, 12]),
            )
            .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn subscription(&self) -> Subscription<Message> {
        iced::window::resize_events().map(|(_id, size)| Message::WindowResized(size))
    }

    fn toolbar(&self) -> Element<Message> {
        let view_label = match self.store.view() {
            ViewMode::List => "Grid view",
            ViewMode::Grid => "List view",
        };
        let details_label = if self.details.is_visible() {
            "Hide details"
        } else {
            "Show details"
        };

        let mut bar = row![
            button("Import Folder").on_press(Message::ImportFolder),
            button("Refresh").on_press(Message::Refresh),
            button(view_label).on_press(Message::ToggleView),
            text("Page size").size(13),
            text_input("100", &self.page_size_input)
                .on_input(Message::PageSizeChanged)
                .on_submit(Message::PageSizeSubmitted)
                .width(70.0),
            button(details_label).on_press(Message::ToggleDetails),
        ]
        .spacing(10)
        .align_y(alignment::Vertical::Center);

        if !self.uploads.is_empty() && self.uploads.len() > self.uploads.pending_count() {
            bar = bar.push(button("Dismiss failed imports").on_press(Message::DismissFailedUploads));
        }

        container(bar)
            .height(TOOLBAR_HEIGHT)
            .padding([8, 12])
            .width(Length::Fill)
            .into()
    }

    fn loading_view(&self) -> Element<Message> {
        let mut content = column![text("Loading…").size(14)].spacing(12);
        if !self.store.is_fetching() && self.store.last_error().is_some() {
            content = content.push(button("Retry").on_press(Message::Retry));
        }
        container(content)
            .padding(16)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn items_view(&self) -> Element<Message> {
        let size = self.items_size();
        match self.store.view() {
            ViewMode::List => {
                self.list_layout
                    .view(self.uploads.as_slice(), &self.store, self.scroll_y, size.height)
            }
            ViewMode::Grid => {
                self.grid_layout
                    .view(self.uploads.as_slice(), &self.store, self.scroll_y, size)
            }
        }
    }

    fn details_view(&self) -> Element<Message> {
        let cursor = self.store.cursor();
        let more = if self.store.has_more() { "yes" } else { "no" };
        let fetching = if self.store.is_fetching() { "yes" } else { "no" };

        container(
            column![
                text("Details").size(16),
                text(format!("Loaded: {}", self.store.loaded_count())).size(12),
                text(format!("Picked: {}", self.store.picked_count())).size(12),
                text(format!("Uploads: {}", self.uploads.len())).size(12),
                text(format!("Page size: {}", self.store.page_size())).size(12),
                text(format!("Catalog offset: {}", cursor.offset)).size(12),
                text(format!("More pages: {}", more)).size(12),
                text(format!("Fetching: {}", fetching)).size(12),
                text(format!(
                    "Fetches: {} ({} deferred)",
                    self.loader.fetches_started(),
                    self.loader.requests_parked()
                ))
                .size(12),
                text(format!("Catalog: {}", self.library.path().display())).size(11),
            ]
            .spacing(6),
        )
        .width(DETAILS_WIDTH)
        .height(Length::Fill)
        .padding(12)
        .style(container::bordered_box)
        .into()
    }

    fn status_line(&self) -> String {
        match self.store.last_error() {
            Some(err) => format!("{}  ⚠️  {}", self.status, err),
            None => self.status.clone(),
        }
    }

    /// Size of the items area: the scrollable's own report if it has one,
    /// otherwise derived from the window.
    fn items_size(&self) -> Size {
        if let Some(size) = self.items_size {
            return size;
        }

        let mut width = self.window_size.width;
        if self.details.is_visible() {
            width -= DETAILS_WIDTH;
        }
        let height = content_height(
            self.window_size.height - TOOLBAR_HEIGHT - STATUS_HEIGHT,
            self.store.picked_count(),
        );
        Size::new(width.max(0.0), height)
    }

    /// What the active layout renders for the current scroll position,
    /// re-based onto asset indices.
    fn items_rendered(&self) -> Option<ItemsRendered> {
        let size = self.items_size();
        let count = state::uploads::display_len(
            self.uploads.as_slice(),
            self.store.assets(),
            self.store.has_more(),
        );

        let rendered = match self.store.view() {
            ViewMode::List => list_items_rendered(self.list_layout.range(self.scroll_y, size.height, count)?),
            ViewMode::Grid => grid_items_rendered(self.grid_layout.range(self.scroll_y, size, count)?),
        };
        Some(rendered.without_prefix(self.uploads.len()))
    }

    /// Ask the loader whether the rendered range needs another page.
    fn load_visible(&mut self) -> Task<Message> {
        // A refresh issued during a catalog write still owes its first page.
        if !self.store.has_fetched_once() && !self.store.is_busy() && self.store.last_error().is_none() {
            return self.start_first_page();
        }

        let Some(rendered) = self.items_rendered() else {
            return Task::none();
        };

        match self.loader.on_items_rendered(rendered, &mut self.store) {
            LoadDecision::Fetch(ticket) => self.spawn_fetch(ticket),
            LoadDecision::Pending | LoadDecision::Idle => Task::none(),
        }
    }

    fn start_first_page(&mut self) -> Task<Message> {
        match self.store.load_next_page() {
            Some(ticket) => self.spawn_fetch(ticket),
            None => Task::none(),
        }
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket) -> Task<Message> {
        let (task, handle) = Task::perform(
            library::fetch_page_async(self.library.path().clone(), ticket),
            move |result| Message::PageLoaded(ticket, result),
        )
        .abortable();
        self.fetch_handle = Some(handle);
        task
    }

    /// Abort the fetch in flight; its result, should it still arrive, is dropped.
    fn cancel_fetch(&mut self) {
        if let Some(handle) = self.fetch_handle.take() {
            handle.abort();
        }
        self.store.cancel_fetch();
    }

    fn run_action(&mut self, action: ActionBarAction) -> Task<Message> {
        if self.deleting {
            return Task::none();
        }
        if action == ActionBarAction::DeleteAll && self.store.is_busy() {
            self.delete_queued = true;
            self.status = "Delete will start once the catalog is idle...".to_string();
            return Task::none();
        }

        match ActionBar::apply(action, &mut self.store) {
            Some(request) => {
                self.deleting = true;
                self.status = format!("Deleting {} assets...", request.ids.len());
                let ids = request.ids.clone();
                Task::perform(
                    library::delete_assets_async(self.library.path().clone(), ids),
                    move |result| Message::DeleteFinished(request.clone(), result),
                )
            }
            None => Task::none(),
        }
    }

    /// Run the held delete, or else the next import, if the catalog is idle.
    fn resume_catalog_writes(&mut self) -> Task<Message> {
        if self.store.is_busy() {
            return Task::none();
        }
        if self.delete_queued {
            self.delete_queued = false;
            return self.run_action(ActionBarAction::DeleteAll);
        }
        self.start_next_upload()
    }

    /// Start the oldest queued import, one at a time
    fn start_next_upload(&mut self) -> Task<Message> {
        let Some((id, path)) = self.uploads.next_queued() else {
            return Task::none();
        };
        if !self.store.begin_write() {
            return Task::none();
        }
        self.uploads.mark_importing(id);
        Task::perform(
            library::import_file_async(self.library.path().clone(), path),
            move |result| Message::UploadFinished(id, result),
        )
    }

    fn save_settings(&self) {
        if let Some(path) = &self.settings_path {
            if let Err(err) = self.settings.save(path) {
                warn!("⚠️  Could not save settings: {}", err);
            }
        }
    }
}

fn main() -> iced::Result {
    env_logger::init();

    let settings_path = match Settings::default_path() {
        Ok(path) => Some(path),
        Err(err) => {
            warn!("⚠️  Settings will not be persisted: {}", err);
            None
        }
    };
    let settings = settings_path
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();

    // The app cannot function without its catalog
    let library = match Library::new() {
        Ok(library) => library,
        Err(err) => {
            error!("❌ Failed to open catalog: {}", err);
            std::process::exit(1);
        }
    };

    iced::application("Asset Browser", AssetBrowser::update, AssetBrowser::view)
        .subscription(AssetBrowser::subscription)
        .theme(AssetBrowser::theme)
        .centered()
        .run_with(move || AssetBrowser::new(library, settings, settings_path))
}
