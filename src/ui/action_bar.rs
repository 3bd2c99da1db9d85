use iced::widget::{button, container, row, text};
use iced::{alignment, Element, Length};

use crate::state::selection::{ActionBar, ActionBarAction};
use crate::state::window::PANEL_HEIGHT;
use crate::Message;

/// Render the action bar, or nothing at all when no bar is due.
pub fn view<'a>(bar: Option<ActionBar>, busy: bool) -> Option<Element<'a, Message>> {
    let bar = bar?;

    let delete = button(text(ActionBar::DELETE_LABEL).size(13)).style(button::danger);
    let delete = if busy {
        delete
    } else {
        delete.on_press(Message::ActionBar(ActionBarAction::DeleteAll))
    };

    let content = row![
        text(bar.label).size(13),
        button(text(ActionBar::DISMISS_LABEL).size(13))
            .style(button::text)
            .on_press(Message::ActionBar(ActionBarAction::Clear)),
        delete,
    ]
    .spacing(12)
    .align_y(alignment::Vertical::Center);

    Some(
        container(content)
            .width(Length::Fill)
            .height(PANEL_HEIGHT)
            .padding([0, 12])
            .align_y(alignment::Vertical::Center)
            .style(container::bordered_box)
            .into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_rendered_without_picks() {
        assert!(view(ActionBar::for_count(0), false).is_none());
        assert!(view(ActionBar::for_count(3), false).is_some());
    }
}
