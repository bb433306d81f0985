//! Modal dialog component
//!
//! Overlays for the unsaved-changes prompt, window removal confirmation and
//! plain notices such as the refused removal of the last window.

use iced::widget::{button, column, container, row, text, Space};
use iced::{Alignment, Element, Length, Padding};

use crate::Message;

/// Types of modal dialogs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalType {
    /// Prompt to save unsaved changes before an action
    UnsavedChanges {
        /// The action that triggered this modal (for display)
        action: PendingAction,
    },
    /// Confirm removing a window and everything typed into it
    ConfirmRemoveWindow(u32),
    /// Message with a single dismiss button
    Notice(String),
}

/// Actions that can be pending while a modal is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    NewProject,
    OpenProject,
    ImportForm,
}

impl std::fmt::Display for PendingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PendingAction::NewProject => write!(f, "create a new project"),
            PendingAction::OpenProject => write!(f, "open another project"),
            PendingAction::ImportForm => write!(f, "import a form"),
        }
    }
}

/// Render a modal backdrop (semi-transparent overlay that catches clicks)
pub fn view_backdrop() -> Element<'static, Message> {
    button(Space::new())
        .on_press(Message::ModalCancel)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_, _| {
            iced::widget::button::Style::default()
                .with_background(iced::Color::from_rgba(0.0, 0.0, 0.0, 0.5))
        })
        .into()
}

/// Render a modal dialog based on its type
pub fn view_modal(modal_type: &ModalType) -> Element<'_, Message> {
    match modal_type {
        ModalType::UnsavedChanges { action } => view_unsaved_changes_modal(*action),
        ModalType::ConfirmRemoveWindow(id) => view_confirm_remove_modal(*id),
        ModalType::Notice(message) => view_notice_modal(message),
    }
}

fn modal_button(label: &str, message: Message, primary: bool) -> Element<'_, Message> {
    button(text(label).size(11))
        .on_press(message)
        .padding(Padding::from([6, 16]))
        .style(if primary { button::primary } else { button::secondary })
        .into()
}

/// Center a dialog body in the window.
fn centered<'a>(title: &'a str, body: String, buttons: Element<'a, Message>) -> Element<'a, Message> {
    let content = column![
        text(title).size(18),
        Space::new().height(12),
        text(body).size(12),
        Space::new().height(20),
        container(buttons).align_x(iced::alignment::Horizontal::Right).width(Length::Fill),
    ]
    .width(Length::Fixed(400.0));

    let modal_box = container(content)
        .padding(20)
        .style(container::bordered_box);

    container(modal_box)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(iced::alignment::Horizontal::Center)
        .align_y(iced::alignment::Vertical::Center)
        .into()
}

/// Render the "Save current progress?" modal
fn view_unsaved_changes_modal(action: PendingAction) -> Element<'static, Message> {
    let buttons = row![
        modal_button("Don't Save", Message::ModalDontSave, false),
        Space::new().width(8),
        modal_button("Cancel", Message::ModalCancel, false),
        Space::new().width(8),
        modal_button("Save", Message::ModalSave, true),
    ]
    .align_y(Alignment::Center);

    centered(
        "Save Changes?",
        format!("You have unsaved changes. Would you like to save before you {}?", action),
        buttons.into(),
    )
}

fn view_confirm_remove_modal(id: u32) -> Element<'static, Message> {
    let buttons = row![
        modal_button("Cancel", Message::ModalCancel, false),
        Space::new().width(8),
        modal_button("Remove", Message::ConfirmRemoveWindow, true),
    ]
    .align_y(Alignment::Center);

    centered(
        "Remove Window?",
        format!("窗戶 {} and all of its measurements and prices will be removed.", id),
        buttons.into(),
    )
}

fn view_notice_modal(message: &str) -> Element<'_, Message> {
    centered("Notice", message.to_string(), modal_button("OK", Message::ModalCancel, true))
}
