/// Move table with clickable, sortable column headers
///
/// Used moves are drawn in gray. Clicking a row sends `RowSelected`,
/// clicking a header sends `SortBy`.
use iced::widget::{button, container, row, scrollable, text, Column, Row};
use iced::{Color, Element, Length};

use crate::state::filter::{FilterSpec, SortKey, ViewRow};
use crate::Message;

/// Relative column widths, in `SortKey::ALL` order
fn portion(key: SortKey) -> u16 {
    match key {
        SortKey::Id => 1,
        SortKey::Name => 3,
        SortKey::Kind | SortKey::Category => 2,
        SortKey::Power | SortKey::Accuracy | SortKey::Pp => 1,
    }
}

fn header<'a>(filter: &FilterSpec) -> Element<'a, Message> {
    let mut cells = Row::new().spacing(4);
    for key in SortKey::ALL {
        let label = match filter.direction_for(key) {
            Some(direction) => format!("{} {}", key.title(), direction.arrow()),
            None => key.title().to_string(),
        };
        cells = cells.push(
            button(text(label).size(14))
                .on_press(Message::SortBy(key))
                .style(button::secondary)
                .padding([2, 4])
                .width(Length::FillPortion(portion(key))),
        );
    }
    cells.into()
}

fn cell<'a>(value: String, key: SortKey, consumed: bool) -> Element<'a, Message> {
    let label = text(value).size(14).width(Length::FillPortion(portion(key)));
    if consumed {
        label.color(Color::from_rgb(0.55, 0.55, 0.55)).into()
    } else {
        label.into()
    }
}

fn table_row<'a>(view_row: &ViewRow<'_>) -> Element<'a, Message> {
    let item = view_row.item;
    let used = view_row.consumed;

    let cells = row![
        cell(item.id.to_string(), SortKey::Id, used),
        cell(item.name.clone(), SortKey::Name, used),
        cell(item.kind.clone(), SortKey::Kind, used),
        cell(item.category.clone(), SortKey::Category, used),
        cell(item.power.to_string(), SortKey::Power, used),
        cell(item.accuracy.to_string(), SortKey::Accuracy, used),
        cell(item.pp.to_string(), SortKey::Pp, used),
    ]
    .spacing(4);

    button(cells)
        .on_press(Message::RowSelected(item.id))
        .style(button::text)
        .padding([1, 4])
        .width(Length::Fill)
        .into()
}

pub fn view<'a>(rows: &[ViewRow<'_>], filter: &FilterSpec) -> Element<'a, Message> {
    let mut body = Column::new().spacing(0);
    for view_row in rows {
        body = body.push(table_row(view_row));
    }

    let body: Element<'a, Message> = if rows.is_empty() {
        container(text("No moves match the current filters.").size(14))
            .padding(10)
            .into()
    } else {
        scrollable(body).height(Length::Fill).into()
    };

    Column::new()
        .push(header(filter))
        .push(body)
        .spacing(4)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}
