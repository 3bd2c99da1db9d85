/// Views for the asset browser
///
/// - `list.rs` / `grid.rs` - the two windowed layouts and the windowing math
///   that tells the loader what they rendered
/// - `action_bar.rs` - the bar shown while assets are picked

pub mod action_bar;
pub mod grid;
pub mod list;

use chrono::DateTime;
use iced::widget::scrollable;

/// Both layouts share one scrollable so switching keeps a single scroll target
pub fn items_scroll_id() -> scrollable::Id {
    scrollable::Id::new("items")
}

/// Human-readable import date for a unix timestamp
pub fn date_label(timestamp: i64) -> String {
    DateTime::from_timestamp(timestamp, 0)
        .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_label() {
        assert_eq!(date_label(0), "1970-01-01 00:00");
        assert_eq!(date_label(1_700_000_000), "2023-11-14 22:13");
    }
}
