//! Shared form widgets reusable across input/result modules

use iced::widget::{row, text, text_input, Row};
use iced::{Alignment, Element, Length};

use crate::Message;

/// Width of the label column in forms
pub const LABEL_WIDTH: f32 = 90.0;

/// Helper to create a labeled text input
pub fn labeled_input<'a>(
    label: &'a str,
    value: &str,
    on_change: impl Fn(String) -> Message + 'a,
) -> Element<'a, Message> {
    row![
        text(label).size(11).width(Length::Fixed(LABEL_WIDTH)),
        text_input("", value)
            .on_input(on_change)
            .width(Length::Fill)
            .padding(4)
            .size(11),
    ]
    .align_y(Alignment::Center)
    .into()
}

/// Read-only `label  value` row
pub fn labeled_value<'a>(label: &'a str, value: String) -> Row<'a, Message> {
    row![
        text(label).size(11).width(Length::Fixed(LABEL_WIDTH)),
        text(value).size(11),
    ]
    .align_y(Alignment::Center)
}

/// Section heading inside a form
pub fn section_heading(title: &str) -> Element<'_, Message> {
    text(title).size(12).color([0.3, 0.3, 0.3]).into()
}
