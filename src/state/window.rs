/// Viewport windowing adapter
///
/// Both layouts report what they rendered as a pair of `WindowDescriptor`s in
/// one linear index space, so the loader and the item count never need to
/// know which layout is active.

/// Extra items added on each side of the grid's reported range
pub const GRID_OVERSCAN_MARGIN: i64 = 10;

/// Height of the action bar, taken from the item area while it is shown
pub const PANEL_HEIGHT: f32 = 32.0;

/// Inclusive linear index range. Overscan bounds may fall outside the data
/// (negative start, stop past the end); consumers clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowDescriptor {
    pub start: i64,
    pub stop: i64,
}

impl WindowDescriptor {
    pub fn new(start: i64, stop: i64) -> Self {
        Self { start, stop }
    }
}

/// Visible and overscanned ranges reported for one render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemsRendered {
    pub visible: WindowDescriptor,
    pub overscan: WindowDescriptor,
}

impl ItemsRendered {
    /// Re-base display indices onto the asset sequence by dropping a prefix
    /// of `len` non-asset slots (the upload overlay).
    pub fn without_prefix(self, len: usize) -> Self {
        let len = len as i64;
        Self {
            visible: WindowDescriptor::new(self.visible.start - len, self.visible.stop - len),
            overscan: WindowDescriptor::new(self.overscan.start - len, self.overscan.stop - len),
        }
    }
}

/// What the list windowing reports: linear indices, already overscanned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListRange {
    pub overscan_start: usize,
    pub overscan_stop: usize,
    pub visible_start: usize,
    pub visible_stop: usize,
}

/// What the grid windowing reports: row and column bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridRange {
    pub overscan_row_start: usize,
    pub overscan_row_stop: usize,
    pub overscan_column_stop: usize,
}

pub fn list_items_rendered(range: ListRange) -> ItemsRendered {
    ItemsRendered {
        visible: WindowDescriptor::new(range.visible_start as i64, range.visible_stop as i64),
        overscan: WindowDescriptor::new(range.overscan_start as i64, range.overscan_stop as i64),
    }
}

/// Translate grid rows/columns into linear indices.
///
/// Row granularity: the stop index is `overscan_row_stop * columns`, which is
/// the first cell of the last row, not its last cell, and a ragged final row
/// is not accounted for. The margin then reaches only the first
/// `GRID_OVERSCAN_MARGIN + 1` cells of that row. With more columns than that,
/// a placeholder further along the final row is never reported, and no load
/// is triggered until the layout changes (fewer columns, or the list view).
pub fn grid_items_rendered(range: GridRange) -> ItemsRendered {
    let end_col = range.overscan_column_stop as i64 + 1;
    let start_row = range.overscan_row_start as i64;
    let end_row = range.overscan_row_stop as i64;

    let visible_start = start_row * end_col;
    let visible_stop = end_row * end_col;

    ItemsRendered {
        visible: WindowDescriptor::new(visible_start, visible_stop),
        overscan: WindowDescriptor::new(
            visible_start - GRID_OVERSCAN_MARGIN,
            visible_stop + GRID_OVERSCAN_MARGIN,
        ),
    }
}

/// Number of explorable items: the loaded ones plus one placeholder slot
/// while another page may exist. The placeholder is never a real item.
pub fn item_count(loaded: usize, has_more: bool) -> usize {
    if has_more {
        loaded + 1
    } else {
        loaded
    }
}

/// Height left for the items once the action bar takes its share
pub fn content_height(height: f32, picked_count: usize) -> f32 {
    if picked_count > 0 {
        (height - PANEL_HEIGHT).max(0.0)
    } else {
        height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_translation() {
        let rendered = grid_items_rendered(GridRange {
            overscan_row_start: 2,
            overscan_row_stop: 4,
            overscan_column_stop: 3,
        });
        assert_eq!(rendered.visible, WindowDescriptor::new(8, 16));
        assert_eq!(rendered.overscan, WindowDescriptor::new(-2, 26));
    }

    #[test]
    fn test_grid_first_row() {
        let rendered = grid_items_rendered(GridRange {
            overscan_row_start: 0,
            overscan_row_stop: 0,
            overscan_column_stop: 0,
        });
        assert_eq!(rendered.visible, WindowDescriptor::new(0, 0));
        assert_eq!(rendered.overscan, WindowDescriptor::new(-10, 10));
    }

    #[test]
    fn test_list_passes_through() {
        let rendered = list_items_rendered(ListRange {
            overscan_start: 3,
            overscan_stop: 25,
            visible_start: 5,
            visible_stop: 23,
        });
        assert_eq!(rendered.visible, WindowDescriptor::new(5, 23));
        assert_eq!(rendered.overscan, WindowDescriptor::new(3, 25));
    }

    #[test]
    fn test_upload_prefix_is_dropped() {
        let rendered = list_items_rendered(ListRange {
            overscan_start: 0,
            overscan_stop: 12,
            visible_start: 0,
            visible_stop: 10,
        })
        .without_prefix(3);
        assert_eq!(rendered.visible, WindowDescriptor::new(-3, 7));
        assert_eq!(rendered.overscan, WindowDescriptor::new(-3, 9));
    }

    #[test]
    fn test_item_count_placeholder() {
        assert_eq!(item_count(20, true), 21);
        assert_eq!(item_count(20, false), 20);
        assert_eq!(item_count(0, false), 0);
    }

    #[test]
    fn test_content_height_with_action_bar() {
        assert_eq!(content_height(600.0, 0), 600.0);
        assert_eq!(content_height(600.0, 2), 600.0 - PANEL_HEIGHT);
        assert_eq!(content_height(10.0, 1), 0.0);
    }
}
