//! Status Bar (Bottom)
//!
//! File and edit state on the left (read-only badge when another session
//! holds the lock), window count and project total in the middle, the last
//! action's message on the right.

use iced::widget::{container, row, text, Space};
use iced::{Alignment, Element, Length, Padding};

use drape_core::units::format_currency;

use crate::{App, Message};

/// `survey.drp *`, or `Untitled` before the first save
pub fn file_label(app: &App) -> String {
    let name = app
        .current_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "Untitled".to_string());
    if app.is_modified {
        format!("{} *", name)
    } else {
        name
    }
}

/// `3 windows · $25,410`
pub fn project_summary(app: &App) -> String {
    let count = app.project.windows.len();
    format!(
        "{} {} · {}{}",
        count,
        if count == 1 { "window" } else { "windows" },
        app.project.settings.currency_symbol,
        format_currency(app.project.total())
    )
}

/// Render the status bar
pub fn view_status_bar(app: &App) -> Element<'_, Message> {
    let mut left = row![text(file_label(app)).size(10)].spacing(8).align_y(Alignment::Center);

    if let Some(holder) = &app.lock_holder {
        left = left.push(
            container(text(format!("Read-only · {}", holder)).size(10).color([0.6, 0.3, 0.0]))
                .padding(Padding::from([1, 6]))
                .style(container::bordered_box),
        );
    }

    row![
        left,
        Space::new().width(Length::Fill),
        text(project_summary(app)).size(10),
        Space::new().width(24),
        text(&app.status).size(10).color([0.4, 0.4, 0.4]),
    ]
    .padding(Padding::from([4, 0]))
    .align_y(Alignment::Center)
    .into()
}
