//! Items Panel (Left Sidebar)
//!
//! Displays project navigation with:
//! - Project Info section (clickable to edit)
//! - Windows section with [+] button to append a window
//! - Project total

use iced::widget::{button, column, container, row, rule, scrollable, text, Column, Space};
use iced::{Alignment, Element, Length, Padding};

use drape_core::units::format_currency;
use drape_core::Project;

use crate::{EditorSelection, Message};

/// Render the items panel (left sidebar)
pub fn view_items_panel<'a>(
    project: &'a Project,
    selection: &'a EditorSelection,
    width: f32,
) -> Element<'a, Message> {
    let mut panel_content: Column<'_, Message> = column![].spacing(2);

    // ===== Project Info Section =====
    panel_content = panel_content.push(
        text("Project Info").size(11).color([0.4, 0.4, 0.4]),
    );

    let info = &project.info;
    let project_info_content = column![
        text(if info.name.is_empty() { "(unnamed)" } else { info.name.as_str() }).size(10),
        text(format!("丈量: {}", info.measure_date)).size(10),
        text(format!("丈量人員: {}", info.surveyor)).size(10),
    ]
    .spacing(2);

    let project_btn_style = if matches!(selection, EditorSelection::ProjectInfo) {
        button::primary
    } else {
        button::secondary
    };
    panel_content = panel_content.push(
        button(project_info_content)
            .on_press(Message::SelectProjectInfo)
            .padding(Padding::from([4, 16]))
            .style(project_btn_style)
            .width(Length::Fill),
    );

    panel_content = panel_content.push(rule::horizontal(1));

    // ===== Windows Section =====
    let windows_header = row![
        text(format!("窗戶 ({})", project.windows.len())).size(11),
        Space::new().width(Length::Fill),
        button(text("+").size(11))
            .on_press(Message::AddWindow)
            .padding(Padding::from([2, 6]))
            .style(button::secondary),
    ]
    .padding(Padding::from([4, 6]))
    .align_y(Alignment::Center);
    panel_content = panel_content.push(windows_header);

    let mut windows_list: Column<'_, Message> = column![].spacing(2).padding(Padding::from([4, 8]));
    for window in project.windows.iter() {
        let label = if window.floor_space.is_empty() {
            window.title()
        } else {
            format!("{} {}", window.title(), window.floor_space)
        };
        let entry = row![
            text(label).size(10),
            Space::new().width(Length::Fill),
            text(format_currency(window.costs.grand_total)).size(10),
        ]
        .align_y(Alignment::Center);

        let style = if *selection == EditorSelection::Window(window.id) {
            button::primary
        } else {
            button::secondary
        };
        windows_list = windows_list.push(
            button(entry)
                .on_press(Message::SelectWindow(window.id))
                .padding(Padding::from([3, 6]))
                .style(style)
                .width(Length::Fill),
        );
    }
    panel_content = panel_content.push(windows_list);

    panel_content = panel_content.push(rule::horizontal(1));

    // ===== Total =====
    panel_content = panel_content.push(
        row![
            text("總計金額").size(11),
            Space::new().width(Length::Fill),
            text(format!(
                "{}{}",
                project.settings.currency_symbol,
                format_currency(project.total())
            ))
            .size(12),
        ]
        .padding(Padding::from([6, 6]))
        .align_y(Alignment::Center),
    );

    container(scrollable(panel_content.padding(4)))
        .width(Length::Fixed(width))
        .height(Length::Fill)
        .style(container::bordered_box)
        .padding(4)
        .into()
}
