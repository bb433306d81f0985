//! Toolbar component
//!
//! File operations on the left, the form import and PDF export of the
//! document currently previewed on the right.

use iced::widget::{button, row, text, Space};
use iced::{Alignment, Element, Length, Padding};

use drape_core::DocumentKind;

use crate::Message;

/// Render the application header with title
pub fn view_header_owned(window_title: String) -> Element<'static, Message> {
    row![
        text("Drapeline").size(28),
        Space::new().width(Length::Fill),
        text(window_title).size(14),
    ]
    .align_y(Alignment::Center)
    .into()
}

fn file_button(label: &'static str, message: Message) -> iced::widget::Button<'static, Message> {
    button(text(label).size(11))
        .on_press(message)
        .padding(Padding::from([4, 8]))
        .style(button::secondary)
}

/// Render the toolbar; the export button names the previewed document.
pub fn view_toolbar(document: DocumentKind) -> Element<'static, Message> {
    let file_buttons = row![
        file_button("New", Message::NewProject),
        file_button("Open", Message::OpenProject),
        file_button("Save", Message::SaveProject),
        file_button("Save As", Message::SaveProjectAs),
        file_button("Import Form", Message::ImportForm),
    ]
    .spacing(4);

    let export_button = button(text(format!("Export {} PDF", document.title())).size(11))
        .on_press(Message::ExportPdf)
        .padding(Padding::from([4, 8]))
        .style(button::primary);

    row![file_buttons, Space::new().width(Length::Fill), export_button]
        .padding(Padding::from([4, 0]))
        .align_y(Alignment::Center)
        .into()
}
