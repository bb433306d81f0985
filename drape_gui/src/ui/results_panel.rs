//! Results Panel (Right Side)
//!
//! Document tabs (quote, factory order, installation order) over a live
//! preview. With project info selected, the price summary comes first.

use iced::widget::{button, column, container, row, rule, scrollable, text, Column, Space};
use iced::{Element, Length, Padding};

use drape_core::DocumentKind;

use crate::{App, EditorSelection, Message};
use super::{result_document, result_project_info};

fn view_tabs(current: DocumentKind) -> Element<'static, Message> {
    DocumentKind::ALL
        .iter()
        .fold(row![].spacing(4), |tabs, kind| {
            let style = if *kind == current { button::primary } else { button::secondary };
            tabs.push(
                button(text(kind.title()).size(11))
                    .on_press(Message::SelectDocument(*kind))
                    .padding(Padding::from([4, 10]))
                    .style(style),
            )
        })
        .into()
}

/// Render the results panel
///
/// This panel uses the complementary ratio (1 - input_ratio).
pub fn view_results_panel(app: &App, input_ratio: f32) -> Element<'_, Message> {
    let mut content: Column<'_, Message> = column![].spacing(6);

    let current = match app.selection {
        EditorSelection::ProjectInfo => {
            content = content
                .push(result_project_info::view(&app.project))
                .push(Space::new().height(8))
                .push(rule::horizontal(1));
            None
        }
        EditorSelection::Window(id) => Some(id),
    };

    content = content
        .push(view_tabs(app.document))
        .push(Space::new().height(4))
        .push(result_document::view(app.project.document(app.document), current));

    // Use complementary ratio (scale to 0-100 for better precision)
    let portion = ((1.0 - input_ratio) * 100.0) as u16;

    container(scrollable(content.padding(8)))
        .width(Length::FillPortion(portion))
        .style(container::bordered_box)
        .padding(5)
        .into()
}
