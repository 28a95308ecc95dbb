/// Move picker: type to narrow the unused moves, click one, then use it
use iced::widget::{button, column, scrollable, text, text_input, Column};
use iced::{Element, Length};

use crate::Message;

/// Suggestions shown under the picker input
const MAX_SUGGESTIONS: usize = 30;

pub fn view<'a>(query: &str, suggestions: Vec<String>) -> Element<'a, Message> {
    let input = text_input("120. Move name", query)
        .on_input(Message::PickerChanged)
        .on_submit(Message::UseSelected)
        .size(14);

    let mut list = Column::new();
    for label in suggestions.into_iter().take(MAX_SUGGESTIONS) {
        list = list.push(
            button(text(label.clone()).size(13))
                .on_press(Message::PickerChosen(label))
                .style(button::text)
                .padding([1, 4])
                .width(Length::Fill),
        );
    }

    column![
        text("Move").size(14),
        input,
        scrollable(list).height(Length::Fixed(140.0)),
        button(text("Use move"))
            .on_press(Message::UseSelected)
            .padding(8),
    ]
    .spacing(6)
    .into()
}
