//! Input Panel (Center)
//!
//! Dispatches to the appropriate input editor based on EditorSelection:
//! - ProjectInfo -> input_project_info
//! - Window -> input_window

use iced::widget::{container, scrollable, text, Column};
use iced::{Element, Length};

use crate::{App, EditorSelection, Message};
use super::{input_project_info, input_window};

/// Render the input panel based on current selection
///
/// The `ratio` parameter determines the relative size of this panel vs results panel.
pub fn view_input_panel(app: &App, ratio: f32) -> Element<'_, Message> {
    let panel: Column<'_, Message> = match app.selection {
        EditorSelection::ProjectInfo => input_project_info::view(app),
        EditorSelection::Window(id) => match app.project.windows.get(id) {
            Some(window) => input_window::view(app, window),
            None => Column::new().push(
                text("Select a window from the left panel").size(14).color([0.5, 0.5, 0.5]),
            ),
        },
    };

    // Convert ratio to fill portion (scale to 0-100 for better precision)
    let portion = (ratio * 100.0) as u16;

    container(scrollable(panel.padding(8)))
        .width(Length::FillPortion(portion))
        .style(container::bordered_box)
        .padding(5)
        .into()
}
