/// Recent usage list, newest on top
use iced::widget::{column, scrollable, text, Column};
use iced::{Element, Length};

use crate::state::checklist::UsageLogEntry;
use crate::Message;

pub fn view<'a>(entries: &[(usize, &UsageLogEntry)], log_enabled: bool) -> Element<'a, Message> {
    let mut list = Column::new().spacing(2);

    if !log_enabled {
        list = list.push(text("Usage log is turned off.").size(13));
    }

    for (order, entry) in entries {
        list = list.push(text(format!("{}. {}", order, entry.name)).size(13));
    }

    column![
        text("Recent").size(14),
        scrollable(list).height(Length::Fill),
    ]
    .spacing(6)
    .height(Length::Fill)
    .into()
}
