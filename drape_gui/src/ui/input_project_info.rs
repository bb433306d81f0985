//! Input view for Project Information
//!
//! Site details printed in every document header, plus the shop name and
//! currency symbol.

use iced::widget::{column, rule, text, Column, Space};

use drape_core::ProjectField;

use super::shared::{labeled_input, section_heading};
use crate::{App, FieldKey, Message};

/// Form label for a project field
pub fn field_label(field: ProjectField) -> &'static str {
    match field {
        ProjectField::Name => "案名/地址:",
        ProjectField::MeasureDate => "丈量日期:",
        ProjectField::Surveyor => "丈量人員:",
        ProjectField::Remarks => "備註:",
        ProjectField::InstallReminder => "施工提醒:",
        ProjectField::FactoryNotes => "工廠備註:",
    }
}

/// Render the project info editor
pub fn view(app: &App) -> Column<'_, Message> {
    let mut form = column![text("Project Information").size(14), Space::new().height(8)].spacing(6);

    for field in ProjectField::ALL {
        let value = app.field_text(FieldKey::Project(field));
        form = form.push(labeled_input(field_label(field), &value, move |v| {
            Message::ProjectFieldChanged(field, v)
        }));
    }

    form.push(Space::new().height(10))
        .push(rule::horizontal(1))
        .push(section_heading("Shop"))
        .push(labeled_input(
            "店名:",
            &app.field_text(FieldKey::ShopName),
            Message::ShopNameChanged,
        ))
        .push(labeled_input(
            "幣別符號:",
            &app.field_text(FieldKey::CurrencySymbol),
            Message::CurrencySymbolChanged,
        ))
        .push(Space::new().height(20))
        .push(text("Select a window from the left panel to edit,").size(11).color([0.5, 0.5, 0.5]))
        .push(text("or click '+' to add a window.").size(11).color([0.5, 0.5, 0.5]))
}
