/// Grid layout: fixed-size cards, as many per row as fit the width
use iced::widget::{button, column, container, scrollable, text, Column, Row, Space};
use iced::{alignment, Element, Length, Size};

use super::{date_label, items_scroll_id};
use crate::state::data::{Upload, UploadStatus};
use crate::state::store::AssetStore;
use crate::state::uploads::{display_len, resolve, Item, Slot};
use crate::state::window::GridRange;
use crate::Message;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub cell_width: f32,
    pub cell_height: f32,
    /// Rows rendered beyond each edge of the viewport
    pub overscan_rows: usize,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            cell_width: 180.0,
            cell_height: 120.0,
            overscan_rows: 1,
        }
    }
}

impl GridLayout {
    pub fn columns(&self, width: f32) -> usize {
        ((width / self.cell_width).floor() as usize).max(1)
    }

    pub fn rows(&self, item_count: usize, columns: usize) -> usize {
        item_count.div_ceil(columns)
    }

    /// Rows and columns touched by the viewport, or `None` when empty.
    pub fn range(&self, scroll_y: f32, viewport: Size, item_count: usize) -> Option<GridRange> {
        let columns = self.columns(viewport.width);
        let rows = self.rows(item_count, columns);
        if rows == 0 || self.cell_height <= 0.0 {
            return None;
        }
        let last_row = rows - 1;
        let scroll_y = scroll_y.max(0.0);

        let row_start = ((scroll_y / self.cell_height).floor() as usize).min(last_row);
        let bottom = ((scroll_y + viewport.height.max(0.0)) / self.cell_height).ceil() as usize;
        let row_stop = bottom.saturating_sub(1).clamp(row_start, last_row);

        Some(GridRange {
            overscan_row_start: row_start.saturating_sub(self.overscan_rows),
            overscan_row_stop: (row_stop + self.overscan_rows).min(last_row),
            overscan_column_stop: columns - 1,
        })
    }

    pub fn view<'a>(
        &self,
        uploads: &'a [Upload],
        store: &'a AssetStore,
        scroll_y: f32,
        viewport: Size,
    ) -> Element<'a, Message> {
        let has_more = store.has_more();
        let count = display_len(uploads, store.assets(), has_more);
        let columns = self.columns(viewport.width);
        let mut content = Column::new().width(Length::Fill);

        if let Some(range) = self.range(scroll_y, viewport, count) {
            content = content.push(Space::with_height(
                self.cell_height * range.overscan_row_start as f32,
            ));

            for row_index in range.overscan_row_start..=range.overscan_row_stop {
                let mut cells = Row::new();
                for column_index in 0..columns {
                    let index = row_index * columns + column_index;
                    let cell: Element<'a, Message> = match resolve(uploads, store.assets(), has_more, index) {
                        Some(slot) => grid_cell(slot),
                        None => Space::with_width(Length::Fill).into(),
                    };
                    cells = cells.push(
                        container(cell)
                            .width(self.cell_width)
                            .height(self.cell_height)
                            .padding(4),
                    );
                }
                content = content.push(cells);
            }

            let rows_below = self.rows(count, columns) - range.overscan_row_stop - 1;
            content = content.push(Space::with_height(self.cell_height * rows_below as f32));
        }

        scrollable(content)
            .id(items_scroll_id())
            .on_scroll(Message::Scrolled)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

fn grid_cell(slot: Slot<'_>) -> Element<'_, Message> {
    if let Some(asset) = slot.asset() {
        let style = if asset.picked {
            button::primary
        } else {
            button::secondary
        };
        return button(
            column![
                text(&asset.filename).size(13),
                text(date_label(asset.imported_at)).size(11),
            ]
            .spacing(4),
        )
        .on_press(Message::TogglePick(asset.id))
        .style(style)
        .width(Length::Fill)
        .height(Length::Fill)
        .into();
    }

    match slot {
        Slot::Item(Item::Upload(upload)) => {
            let status = match &upload.status {
                UploadStatus::Queued => "Queued",
                UploadStatus::Importing => "Importing…",
                UploadStatus::Failed(_) => "Failed",
            };
            container(column![text(&upload.filename).size(13), text(status).size(11)].spacing(4))
                .style(container::rounded_box)
                .width(Length::Fill)
                .height(Length::Fill)
                .padding(8)
                .into()
        }
        Slot::Item(Item::Asset(_)) | Slot::Placeholder => container(text("Loading more…").size(12))
            .width(Length::Fill)
            .height(Length::Fill)
            .align_x(alignment::Horizontal::Center)
            .align_y(alignment::Vertical::Center)
            .into(),
    }
}
