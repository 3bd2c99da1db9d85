/// Incremental page loading driven by what the viewport rendered
///
/// Only one page is ever in flight. A request that arrives while a fetch is
/// running is accepted but parked: the caller gets `LoadDecision::Pending`
/// and simply waits for a later render pass to observe the store.
use log::{debug, trace};

use super::store::{AssetStore, FetchTicket};
use super::window::{item_count, ItemsRendered};

/// Every index below the loaded count is loaded; the placeholder is not.
pub fn is_item_loaded(index: i64, loaded: usize) -> bool {
    index < loaded as i64
}

/// Outcome of one visibility check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadDecision {
    /// Everything in range is loaded
    Idle,
    /// Start this fetch
    Fetch(FetchTicket),
    /// More is needed but a fetch or catalog write is already running
    Pending,
}

#[derive(Debug, Default)]
pub struct IncrementalLoader {
    fetches_started: u64,
    requests_parked: u64,
}

impl IncrementalLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fetches_started(&self) -> u64 {
        self.fetches_started
    }

    pub fn requests_parked(&self) -> u64 {
        self.requests_parked
    }

    /// Decide whether the rendered range needs another page.
    ///
    /// `rendered` must be in asset index space (see
    /// `ItemsRendered::without_prefix`). The overscan stop is clamped to the
    /// explorable item count, so once the last page came back short (or
    /// empty) there is no placeholder left to trigger a load.
    pub fn on_items_rendered(&mut self, rendered: ItemsRendered, store: &mut AssetStore) -> LoadDecision {
        let loaded = store.loaded_count();
        let count = item_count(loaded, store.has_more()) as i64;
        let last = rendered.overscan.stop.min(count - 1);

        if last < 0 || is_item_loaded(last, loaded) {
            trace!("All rendered items loaded (stop {}, loaded {})", rendered.overscan.stop, loaded);
            return LoadDecision::Idle;
        }

        if store.is_fetching() {
            self.requests_parked += 1;
            debug!("⏳ Load requested while a page is in flight; waiting");
            return LoadDecision::Pending;
        }

        match store.load_next_page() {
            Some(ticket) => {
                self.fetches_started += 1;
                LoadDecision::Fetch(ticket)
            }
            None => LoadDecision::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{Asset, ViewMode};
    use crate::state::window::{grid_items_rendered, list_items_rendered, GridRange, ListRange};
    use proptest::prelude::*;

    /// A catalog of `total` rows served in pages
    struct FakeCatalog {
        total: usize,
        calls: usize,
    }

    impl FakeCatalog {
        fn fetch(&mut self, ticket: FetchTicket) -> Vec<Asset> {
            self.calls += 1;
            let end = (ticket.offset + ticket.limit).min(self.total);
            (ticket.offset.min(end)..end)
                .map(|i| Asset::new(i as i64, format!("{}.jpg", i), format!("/p/{}.jpg", i), 0))
                .collect()
        }
    }

    fn list_window(stop: usize) -> ItemsRendered {
        list_items_rendered(ListRange {
            overscan_start: stop.saturating_sub(10),
            overscan_stop: stop,
            visible_start: stop.saturating_sub(8),
            visible_stop: stop.saturating_sub(2),
        })
    }

    fn first_page(store: &mut AssetStore, catalog: &mut FakeCatalog) {
        let ticket = store.load_next_page().unwrap();
        let page = catalog.fetch(ticket);
        store.apply_page(ticket, Ok(page));
    }

    #[test]
    fn test_is_item_loaded() {
        assert!(is_item_loaded(-2, 0));
        assert!(is_item_loaded(4, 5));
        assert!(!is_item_loaded(5, 5));
    }

    #[test]
    fn test_idle_when_window_inside_loaded_range() {
        let mut store = AssetStore::new(20, ViewMode::List);
        let mut catalog = FakeCatalog { total: 100, calls: 0 };
        first_page(&mut store, &mut catalog);

        let mut loader = IncrementalLoader::new();
        assert_eq!(loader.on_items_rendered(list_window(15), &mut store), LoadDecision::Idle);
    }

    #[test]
    fn test_full_page_then_empty_page_stops_loading() {
        let mut store = AssetStore::new(20, ViewMode::List);
        let mut catalog = FakeCatalog { total: 20, calls: 0 };
        first_page(&mut store, &mut catalog);
        assert!(store.has_more());

        let mut loader = IncrementalLoader::new();
        let ticket = match loader.on_items_rendered(list_window(25), &mut store) {
            LoadDecision::Fetch(ticket) => ticket,
            other => panic!("expected a fetch, got {:?}", other),
        };
        let page = catalog.fetch(ticket);
        assert!(page.is_empty());
        store.apply_page(ticket, Ok(page));

        assert!(!store.has_more());
        for stop in [19, 20, 25, 100] {
            assert_eq!(loader.on_items_rendered(list_window(stop), &mut store), LoadDecision::Idle);
        }
        assert_eq!(catalog.calls, 2);
    }

    #[test]
    fn test_only_one_fetch_in_flight() {
        let mut store = AssetStore::new(20, ViewMode::Grid);
        let mut catalog = FakeCatalog { total: 200, calls: 0 };
        first_page(&mut store, &mut catalog);

        let mut loader = IncrementalLoader::new();
        let window = grid_items_rendered(GridRange {
            overscan_row_start: 3,
            overscan_row_stop: 5,
            overscan_column_stop: 3,
        });

        let ticket = match loader.on_items_rendered(window, &mut store) {
            LoadDecision::Fetch(ticket) => ticket,
            other => panic!("expected a fetch, got {:?}", other),
        };
        for _ in 0..5 {
            assert_eq!(loader.on_items_rendered(window, &mut store), LoadDecision::Pending);
        }
        assert_eq!(loader.fetches_started(), 1);
        assert_eq!(loader.requests_parked(), 5);

        store.apply_page(ticket, Ok(catalog.fetch(ticket)));
        assert_eq!(store.loaded_count(), 40);
        assert_eq!(loader.on_items_rendered(window, &mut store), LoadDecision::Idle);
    }

    #[test]
    fn test_nothing_loads_before_first_page() {
        let mut store = AssetStore::new(20, ViewMode::List);
        let mut loader = IncrementalLoader::new();
        assert_eq!(loader.on_items_rendered(list_window(10), &mut store), LoadDecision::Idle);
    }

    #[test]
    fn test_failed_fetch_retries_on_next_render() {
        let mut store = AssetStore::new(10, ViewMode::List);
        let mut catalog = FakeCatalog { total: 50, calls: 0 };
        first_page(&mut store, &mut catalog);

        let mut loader = IncrementalLoader::new();
        let LoadDecision::Fetch(ticket) = loader.on_items_rendered(list_window(12), &mut store) else {
            panic!("expected a fetch");
        };
        store.apply_page(ticket, Err(crate::error::BrowserError::Database("locked".into())));

        let LoadDecision::Fetch(retry) = loader.on_items_rendered(list_window(12), &mut store) else {
            panic!("expected a retry");
        };
        assert_eq!(retry.offset, ticket.offset);
    }

    #[derive(Debug, Clone)]
    enum Step {
        Render(usize),
        Resolve,
        Fail,
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            (0usize..400).prop_map(Step::Render),
            Just(Step::Resolve),
            Just(Step::Fail),
        ]
    }

    proptest! {
        #[test]
        fn loaded_count_is_monotonic_and_bounded(
            total in 0usize..150,
            page_size in 1usize..40,
            steps in prop::collection::vec(step(), 1..60),
        ) {
            let mut store = AssetStore::new(page_size, ViewMode::List);
            let mut catalog = FakeCatalog { total, calls: 0 };
            let mut loader = IncrementalLoader::new();
            let mut in_flight: Option<FetchTicket> = store.load_next_page();
            let mut previous = 0;

            for step in steps {
                match step {
                    Step::Render(stop) => {
                        match loader.on_items_rendered(list_window(stop), &mut store) {
                            LoadDecision::Fetch(ticket) => {
                                prop_assert!(in_flight.is_none());
                                in_flight = Some(ticket);
                            }
                            LoadDecision::Pending => prop_assert!(in_flight.is_some()),
                            LoadDecision::Idle => {}
                        }
                    }
                    Step::Resolve => {
                        if let Some(ticket) = in_flight.take() {
                            let page = catalog.fetch(ticket);
                            store.apply_page(ticket, Ok(page));
                        }
                    }
                    Step::Fail => {
                        if let Some(ticket) = in_flight.take() {
                            store.apply_page(ticket, Err(crate::error::BrowserError::Io("gone".into())));
                        }
                    }
                }

                prop_assert!(store.loaded_count() >= previous);
                prop_assert!(store.loaded_count() <= total);
                previous = store.loaded_count();
            }
        }
    }

    #[test]
    fn test_wide_grid_misses_placeholder_past_margin() {
        let mut store = AssetStore::new(23, ViewMode::Grid);
        let ticket = store.load_next_page().unwrap();
        let page = (0..23)
            .map(|i| Asset::new(i, format!("{}.jpg", i), format!("/p/{}.jpg", i), 0))
            .collect();
        store.apply_page(ticket, Ok(page));
        assert!(store.has_more());

        // Twelve columns, two rows: the placeholder is the last cell, index 23.
        let wide = grid_items_rendered(GridRange {
            overscan_row_start: 0,
            overscan_row_stop: 1,
            overscan_column_stop: 11,
        });
        assert_eq!(wide.overscan.stop, 22);
        let mut loader = IncrementalLoader::new();
        assert_eq!(loader.on_items_rendered(wide, &mut store), LoadDecision::Idle);

        let narrow = grid_items_rendered(GridRange {
            overscan_row_start: 0,
            overscan_row_stop: 3,
            overscan_column_stop: 5,
        });
        assert!(matches!(loader.on_items_rendered(narrow, &mut store), LoadDecision::Fetch(_)));
    }
}
