/// List layout: one asset per row
use iced::widget::{checkbox, container, row, scrollable, text, Column, Space};
use iced::{alignment, Element, Length};

use super::{date_label, items_scroll_id};
use crate::state::data::{Upload, UploadStatus};
use crate::state::store::AssetStore;
use crate::state::uploads::{display_len, resolve, Item, Slot};
use crate::state::window::ListRange;
use crate::Message;

/// Row geometry and overscan of the list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListLayout {
    pub row_height: f32,
    /// Rows rendered beyond each edge of the viewport
    pub overscan_count: usize,
}

impl Default for ListLayout {
    fn default() -> Self {
        Self {
            row_height: 36.0,
            overscan_count: 2,
        }
    }
}

impl ListLayout {
    /// Rows touched by a viewport scrolled to `scroll_y`, or `None` when
    /// there is nothing to show.
    pub fn range(&self, scroll_y: f32, viewport_height: f32, item_count: usize) -> Option<ListRange> {
        if item_count == 0 || self.row_height <= 0.0 {
            return None;
        }
        let last = item_count - 1;
        let scroll_y = scroll_y.max(0.0);

        let visible_start = ((scroll_y / self.row_height).floor() as usize).min(last);
        let bottom = ((scroll_y + viewport_height.max(0.0)) / self.row_height).ceil() as usize;
        let visible_stop = bottom.saturating_sub(1).clamp(visible_start, last);

        Some(ListRange {
            overscan_start: visible_start.saturating_sub(self.overscan_count),
            overscan_stop: (visible_stop + self.overscan_count).min(last),
            visible_start,
            visible_stop,
        })
    }

    pub fn view<'a>(
        &self,
        uploads: &'a [Upload],
        store: &'a AssetStore,
        scroll_y: f32,
        viewport_height: f32,
    ) -> Element<'a, Message> {
        let has_more = store.has_more();
        let count = display_len(uploads, store.assets(), has_more);
        let mut content = Column::new().width(Length::Fill);

        if let Some(range) = self.range(scroll_y, viewport_height, count) {
            content = content.push(Space::with_height(self.row_height * range.overscan_start as f32));

            for index in range.overscan_start..=range.overscan_stop {
                if let Some(slot) = resolve(uploads, store.assets(), has_more, index) {
                    content = content.push(
                        container(list_row(slot))
                            .height(self.row_height)
                            .width(Length::Fill)
                            .padding([0, 12])
                            .align_y(alignment::Vertical::Center),
                    );
                }
            }

            let below = count - range.overscan_stop - 1;
            content = content.push(Space::with_height(self.row_height * below as f32));
        }

        scrollable(content)
            .id(items_scroll_id())
            .on_scroll(Message::Scrolled)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

fn list_row(slot: Slot<'_>) -> Element<'_, Message> {
    match slot {
        Slot::Item(Item::Asset(asset)) => {
            let id = asset.id;
            row![
                checkbox("", asset.picked).on_toggle(move |_| Message::TogglePick(id)),
                text(&asset.filename).size(14).width(Length::FillPortion(2)),
                text(&asset.path).size(11).width(Length::FillPortion(3)),
                text(date_label(asset.imported_at)).size(12),
            ]
            .spacing(12)
            .align_y(alignment::Vertical::Center)
            .into()
        }
        Slot::Item(Item::Upload(upload)) => {
            let status = match &upload.status {
                UploadStatus::Queued => "Queued".to_string(),
                UploadStatus::Importing => "Importing…".to_string(),
                UploadStatus::Failed(reason) => format!("Failed: {}", reason),
            };
            row![
                text(&upload.filename).size(14).width(Length::Fill),
                text(status).size(12),
            ]
            .spacing(12)
            .into()
        }
        Slot::Placeholder => text("Loading more…").size(12).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ListLayout {
        ListLayout {
            row_height: 10.0,
            overscan_count: 2,
        }
    }

    #[test]
    fn test_range_at_top() {
        let range = layout().range(0.0, 50.0, 100).unwrap();
        assert_eq!(range.visible_start, 0);
        assert_eq!(range.visible_stop, 4);
        assert_eq!(range.overscan_start, 0);
        assert_eq!(range.overscan_stop, 6);
    }

    #[test]
    fn test_range_scrolled() {
        let range = layout().range(125.0, 50.0, 100).unwrap();
        assert_eq!(range.visible_start, 12);
        assert_eq!(range.visible_stop, 17);
        assert_eq!(range.overscan_start, 10);
        assert_eq!(range.overscan_stop, 19);
    }

    #[test]
    fn test_range_clamped_to_item_count() {
        let range = layout().range(0.0, 500.0, 5).unwrap();
        assert_eq!(range.visible_stop, 4);
        assert_eq!(range.overscan_stop, 4);

        let past_end = layout().range(10_000.0, 50.0, 5).unwrap();
        assert_eq!(past_end.visible_start, 4);
        assert_eq!(past_end.visible_stop, 4);
    }

    #[test]
    fn test_no_range_without_items() {
        assert!(layout().range(0.0, 50.0, 0).is_none());
    }
}
