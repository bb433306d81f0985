//! Results view for Project Information
//!
//! Per-window price summary shown while the project details are edited.

use iced::widget::{column, row, text, Column, Space};
use iced::{Alignment, Length};

use drape_core::units::format_currency;
use drape_core::Project;

use crate::Message;

/// Render the project summary view
pub fn view(project: &Project) -> Column<'_, Message> {
    let symbol = project.settings.currency_symbol.as_str();

    let mut summary = column![
        text("Project Summary").size(14),
        Space::new().height(8),
        text(format!("Windows: {}", project.windows.len())).size(11),
        text(format!("Modified: {}", project.meta.modified.format("%Y-%m-%d %H:%M"))).size(11),
        Space::new().height(8),
    ]
    .spacing(2);

    for window in project.windows.iter() {
        let material = window
            .selected_option()
            .map(|m| m.label.as_str())
            .unwrap_or("未選擇");
        summary = summary.push(
            row![
                text(window.title()).size(11).width(Length::Fixed(60.0)),
                text(format!("{:.2} 才", window.costs.area_tsai)).size(11).width(Length::Fixed(80.0)),
                text(material).size(11),
                Space::new().width(Length::Fill),
                text(format!("{}{}", symbol, format_currency(window.costs.grand_total))).size(11),
            ]
            .align_y(Alignment::Center),
        );
    }

    summary.push(Space::new().height(6)).push(
        row![
            text("總計金額").size(12),
            Space::new().width(Length::Fill),
            text(format!("{}{}", symbol, format_currency(project.total()))).size(13),
        ]
        .align_y(Alignment::Center),
    )
}
