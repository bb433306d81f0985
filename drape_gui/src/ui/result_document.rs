//! Results view for a printable document
//!
//! Draws a laid-out quote, factory order or installation order the way the
//! PDF prints it. The window being edited is marked in the margin.

use iced::widget::{column, container, row, rule, text, Column, Space};
use iced::{Alignment, Element, Length, Padding};

use drape_core::documents::{Line, Section};
use drape_core::DocumentView;

use crate::Message;

fn view_line(line: Line) -> Element<'static, Message> {
    row![
        text(format!("{}:", line.label)).size(11).color([0.4, 0.4, 0.4]).width(Length::Fixed(90.0)),
        text(line.value).size(11),
    ]
    .spacing(6)
    .into()
}

fn view_section(section: Section, highlighted: bool) -> Element<'static, Message> {
    let mut block: Column<'static, Message> = column![text(section.heading).size(13)].spacing(3);
    for line in section.lines {
        block = block.push(view_line(line));
    }

    if !section.pricing.is_empty() {
        block = block
            .push(Space::new().height(4))
            .push(text("計價項目").size(11).color([0.5, 0.5, 0.5]));
        for line in section.pricing {
            block = block.push(view_line(line));
        }
    }

    let marker = text(if highlighted { "▶" } else { " " }).size(11).width(Length::Fixed(14.0));
    row![marker, block].align_y(Alignment::Start).into()
}

/// Render a document; `current` marks the section of the window being edited.
pub fn view(document: DocumentView, current: Option<u32>) -> Column<'static, Message> {
    let mut page: Column<'static, Message> = column![].spacing(6);

    if !document.shop_name.is_empty() {
        page = page.push(text(document.shop_name).size(12).color([0.4, 0.4, 0.4]));
    }
    page = page.push(text(document.title).size(16)).push(rule::horizontal(1));

    for line in document.header {
        page = page.push(view_line(line));
    }

    for section in document.sections {
        let highlighted = current == Some(section.window_id);
        page = page.push(rule::horizontal(1)).push(view_section(section, highlighted));
    }

    if !document.closing.is_empty() {
        page = page.push(rule::horizontal(1));
        if let Some(heading) = document.closing_heading {
            page = page.push(text(heading).size(13));
        }
        for line in document.closing {
            page = page.push(view_line(line));
        }
    }

    if let Some(total) = document.total {
        page = page.push(rule::horizontal(1)).push(
            container(
                row![
                    text(total.label).size(13),
                    Space::new().width(Length::Fill),
                    text(total.value).size(15),
                ]
                .align_y(Alignment::Center),
            )
            .padding(Padding::from([6, 8]))
            .style(container::bordered_box),
        );
    }

    page
}
