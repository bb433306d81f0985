//! # Drapeline GUI Application
//!
//! The on-site survey form: one block per window, live pricing, and the
//! three printable documents previewed side by side.
//!
//! ```text
//! ┌ toolbar ───────────────────────────────────────────────┐
//! │ items (project, windows) │ form input │ document preview │
//! └ status bar ────────────────────────────────────────────┘
//! ```

mod file_ops;
mod ui;

use std::collections::HashMap;
use std::path::PathBuf;

use iced::widget::{column, row, stack};
use iced::{Element, Length, Size, Task};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use drape_core::file_io::FileLock;
use drape_core::pdf::FontSet;
use drape_core::units::format_plain;
use drape_core::window::{InstallMethod, MountType};
use drape_core::{AppSettings, CalcError, DocumentKind, Project, ProjectField, WindowField};

use ui::modal::{ModalType, PendingAction};

/// Width of the items sidebar
const ITEMS_PANEL_WIDTH: f32 = 200.0;

/// Share of the remaining width given to the form
const INPUT_RATIO: f32 = 0.55;

fn main() -> iced::Result {
    init_logger();

    iced::application(App::new, App::update, App::view)
        .title(App::title)
        .window_size(Size::new(1280.0, 820.0))
        .run()
}

fn init_logger() {
    let filter = std::env::var("DRAPELINE_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();
}

/// What the center panel is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorSelection {
    ProjectInfo,
    Window(u32),
}

/// A text input whose raw text is kept while the user types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Project(ProjectField),
    Window(u32, WindowField),
    ShopName,
    CurrencySymbol,
}

#[derive(Debug, Clone)]
pub enum Message {
    // File operations
    NewProject,
    OpenProject,
    SaveProject,
    SaveProjectAs,
    ImportForm,
    ExportPdf,

    // Modal responses
    ModalSave,
    ModalDontSave,
    ModalCancel,
    ConfirmRemoveWindow,

    // Navigation
    SelectProjectInfo,
    SelectWindow(u32),
    SelectDocument(DocumentKind),

    // Project fields
    ProjectFieldChanged(ProjectField, String),
    ShopNameChanged(String),
    CurrencySymbolChanged(String),

    // Windows
    AddWindow,
    RequestRemoveWindow(u32),
    WindowFieldChanged(u32, WindowField, String),
    MountTypeSelected(u32, MountType),
    CurtainBoxSelected(u32, bool),
    MaterialSelected(u32, Option<u32>),
    InstallMethodSelected(u32, InstallMethod),
    PickSitePhoto(u32),
    ClearSitePhoto(u32),
}

pub struct App {
    pub project: Project,
    pub settings: AppSettings,
    pub fonts: FontSet,

    // File state
    pub current_file: Option<PathBuf>,
    pub file_lock: Option<FileLock>,
    /// Holder of the lock when the file was opened read-only
    pub lock_holder: Option<String>,
    pub is_modified: bool,

    // Editor state
    pub selection: EditorSelection,
    pub document: DocumentKind,
    pub buffers: HashMap<FieldKey, String>,

    pub modal: Option<ModalType>,
    pub status: String,
}

impl App {
    fn new() -> Self {
        let settings = match AppSettings::load(None) {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "Using default settings");
                AppSettings::default()
            }
        };
        let fonts = settings.fonts();

        App {
            project: Project::default(),
            settings,
            fonts,
            current_file: None,
            file_lock: None,
            lock_holder: None,
            is_modified: false,
            selection: EditorSelection::Window(1),
            document: DocumentKind::Quote,
            buffers: HashMap::new(),
            modal: None,
            status: "Ready".to_string(),
        }
    }

    fn title(&self) -> String {
        let name = self
            .current_file
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string());
        let modified = if self.is_modified { " *" } else { "" };
        format!("Drapeline - {}{}", name, modified)
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::NewProject => self.guard_unsaved(PendingAction::NewProject),
            Message::OpenProject => self.guard_unsaved(PendingAction::OpenProject),
            Message::ImportForm => self.guard_unsaved(PendingAction::ImportForm),
            Message::SaveProject => {
                self.save();
            }
            Message::SaveProjectAs => {
                self.save_as();
            }
            Message::ExportPdf => self.export_pdf(),

            Message::ModalSave => {
                if let Some(ModalType::UnsavedChanges { action }) = self.modal.take() {
                    if self.save() {
                        self.run_pending(action);
                    }
                }
            }
            Message::ModalDontSave => {
                if let Some(ModalType::UnsavedChanges { action }) = self.modal.take() {
                    self.run_pending(action);
                }
            }
            Message::ModalCancel => {
                self.modal = None;
            }
            Message::ConfirmRemoveWindow => {
                if let Some(ModalType::ConfirmRemoveWindow(id)) = self.modal.take() {
                    self.remove_window(id);
                }
            }

            Message::SelectProjectInfo => self.selection = EditorSelection::ProjectInfo,
            Message::SelectWindow(id) => self.selection = EditorSelection::Window(id),
            Message::SelectDocument(kind) => self.document = kind,

            Message::ProjectFieldChanged(field, value) => {
                self.project.set_info_field(field, &value);
                self.buffers.insert(FieldKey::Project(field), value);
                self.is_modified = true;
            }
            Message::ShopNameChanged(value) => {
                self.project.settings.shop_name = value.trim().to_string();
                self.buffers.insert(FieldKey::ShopName, value);
                self.project.touch();
                self.is_modified = true;
            }
            Message::CurrencySymbolChanged(value) => {
                self.project.settings.currency_symbol = value.trim().to_string();
                self.buffers.insert(FieldKey::CurrencySymbol, value);
                self.project.touch();
                self.is_modified = true;
            }

            Message::AddWindow => {
                let id = self.project.add_window();
                self.selection = EditorSelection::Window(id);
                self.is_modified = true;
                self.status = format!("Added 窗戶 {}", id);
            }
            Message::RequestRemoveWindow(id) => {
                if self.project.windows.len() <= 1 {
                    // Refused up front; nothing to confirm
                    self.modal = Some(ModalType::Notice(CalcError::LastWindow.to_string()));
                } else {
                    self.modal = Some(ModalType::ConfirmRemoveWindow(id));
                }
            }
            Message::WindowFieldChanged(id, field, value) => {
                self.set_window_field(id, field, &value);
                self.buffers.insert(FieldKey::Window(id, field), value);
            }
            Message::MountTypeSelected(id, mount) => self.set_window_field(id, WindowField::MountType, mount.code()),
            Message::CurtainBoxSelected(id, present) => {
                self.set_window_field(id, WindowField::CurtainBox, if present { "yes" } else { "no" })
            }
            Message::MaterialSelected(id, index) => match self.project.select_material(id, index) {
                Ok(_) => self.is_modified = true,
                Err(e) => self.status = e.to_string(),
            },
            Message::InstallMethodSelected(id, method) => {
                self.set_window_field(id, WindowField::InstallMethod, method.code())
            }
            Message::PickSitePhoto(id) => {
                let picked = rfd::FileDialog::new()
                    .add_filter("Images", &["jpg", "jpeg", "png", "heic", "webp"])
                    .pick_file();
                if let Some(path) = picked {
                    self.set_window_field(id, WindowField::SitePhoto, &path.to_string_lossy());
                }
            }
            Message::ClearSitePhoto(id) => self.set_window_field(id, WindowField::SitePhoto, ""),
        }

        Task::none()
    }

    fn view(&self) -> Element<'_, Message> {
        let header = ui::toolbar::view_header_owned(self.title());
        let toolbar = ui::toolbar::view_toolbar(self.document);

        let panels = row![
            ui::items_panel::view_items_panel(&self.project, &self.selection, ITEMS_PANEL_WIDTH),
            ui::input_panel::view_input_panel(self, INPUT_RATIO),
            ui::results_panel::view_results_panel(self, INPUT_RATIO),
        ]
        .spacing(4)
        .height(Length::Fill);

        let status = ui::status_bar::view_status_bar(self);

        let base: Element<'_, Message> = column![header, toolbar, panels, status]
            .spacing(4)
            .padding(8)
            .into();

        match &self.modal {
            Some(modal) => stack![base, ui::modal::view_backdrop(), ui::modal::view_modal(modal)].into(),
            None => base,
        }
    }

    /// Raw text for an input: what the user typed, or the stored value.
    pub fn field_text(&self, key: FieldKey) -> String {
        if let Some(raw) = self.buffers.get(&key) {
            return raw.clone();
        }

        match key {
            FieldKey::Project(field) => field.value(&self.project.info).to_string(),
            FieldKey::ShopName => self.project.settings.shop_name.clone(),
            FieldKey::CurrencySymbol => self.project.settings.currency_symbol.clone(),
            FieldKey::Window(id, field) => self
                .project
                .windows
                .get(id)
                .map(|window| ui::input_window::stored_text(window, field))
                .unwrap_or_default(),
        }
    }

    fn set_window_field(&mut self, id: u32, field: WindowField, raw: &str) {
        match self.project.set_window_field(id, field, raw) {
            Ok(_) => self.is_modified = true,
            Err(e) => self.status = e.to_string(),
        }
    }

    fn remove_window(&mut self, id: u32) {
        match self.project.remove_window(id) {
            Ok(removed) => {
                self.buffers.retain(|key, _| !matches!(key, FieldKey::Window(w, _) if *w == id));
                if self.selection == EditorSelection::Window(id) {
                    let first = self.project.windows.ids().first().copied().unwrap_or(1);
                    self.selection = EditorSelection::Window(first);
                }
                self.is_modified = true;
                self.status = format!("Removed {}", removed.title());
                info!(window = id, "Window removed from form");
            }
            Err(e) if e.is_user_notice() => self.modal = Some(ModalType::Notice(e.to_string())),
            Err(e) => self.status = e.to_string(),
        }
    }

    /// Ask to save first when there are unsaved changes.
    fn guard_unsaved(&mut self, action: PendingAction) {
        if self.is_modified {
            self.modal = Some(ModalType::UnsavedChanges { action });
        } else {
            self.run_pending(action);
        }
    }

    fn run_pending(&mut self, action: PendingAction) {
        match action {
            PendingAction::NewProject => self.new_project(),
            PendingAction::OpenProject => self.open_project(),
            PendingAction::ImportForm => self.import_form(),
        }
    }

    /// Replace the project being edited and reset editor state.
    fn replace_project(&mut self, project: Project) {
        let first = project.windows.ids().first().copied().unwrap_or(1);
        self.project = project;
        self.buffers.clear();
        self.selection = EditorSelection::Window(first);
    }
}

/// Stored numbers shown in inputs; zero shows as empty.
pub fn number_text(value: f64) -> String {
    if value > 0.0 {
        format_plain(value)
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_select_window() {
        let mut app = App::new();
        let _ = app.update(Message::AddWindow);

        assert_eq!(app.project.windows.ids(), vec![1, 2]);
        assert_eq!(app.selection, EditorSelection::Window(2));
        assert!(app.is_modified);
    }

    #[test]
    fn test_last_window_removal_shows_notice() {
        let mut app = App::new();
        let _ = app.update(Message::RequestRemoveWindow(1));

        assert!(matches!(app.modal, Some(ModalType::Notice(_))));
        assert_eq!(app.project.windows.len(), 1);
    }

    #[test]
    fn test_confirmed_removal() {
        let mut app = App::new();
        let _ = app.update(Message::AddWindow);
        let _ = app.update(Message::RequestRemoveWindow(2));
        assert_eq!(app.modal, Some(ModalType::ConfirmRemoveWindow(2)));

        let _ = app.update(Message::ConfirmRemoveWindow);
        assert_eq!(app.project.windows.ids(), vec![1]);
        assert_eq!(app.selection, EditorSelection::Window(1));
        assert!(app.modal.is_none());
    }

    #[test]
    fn test_typed_text_is_kept_while_pricing_updates() {
        let mut app = App::new();
        let _ = app.update(Message::WindowFieldChanged(1, WindowField::Width, "100.".to_string()));
        let _ = app.update(Message::WindowFieldChanged(1, WindowField::Height, "150".to_string()));
        let _ = app.update(Message::WindowFieldChanged(1, WindowField::MaterialUnitPrice(1), "500".to_string()));
        let _ = app.update(Message::MaterialSelected(1, Some(1)));
        let _ = app.update(Message::InstallMethodSelected(1, InstallMethod::Wall));
        let _ = app.update(Message::WindowFieldChanged(1, WindowField::WallMountCost, "300".to_string()));

        // The raw text stays in the input; the stored value is parsed
        assert_eq!(app.field_text(FieldKey::Window(1, WindowField::Width)), "100.");
        assert_eq!(app.project.windows.get(1).unwrap().width_cm, 100.0);
        assert_eq!(app.project.total(), 8470.0);
    }

    #[test]
    fn test_field_text_falls_back_to_stored_value() {
        let mut app = App::new();
        app.project.set_window_field(1, WindowField::Height, "150").unwrap();

        assert_eq!(app.field_text(FieldKey::Window(1, WindowField::Height)), "150");
        assert_eq!(app.field_text(FieldKey::Window(1, WindowField::Width)), "");
        assert_eq!(app.field_text(FieldKey::CurrencySymbol), "$");
    }

    #[test]
    fn test_unsaved_changes_prompt() {
        let mut app = App::new();
        let _ = app.update(Message::ProjectFieldChanged(ProjectField::Name, "松仁路".to_string()));
        let _ = app.update(Message::NewProject);
        assert_eq!(
            app.modal,
            Some(ModalType::UnsavedChanges { action: PendingAction::NewProject })
        );

        let _ = app.update(Message::ModalDontSave);
        assert!(app.modal.is_none());
        assert!(app.project.info.name.is_empty());
        assert!(!app.is_modified);
    }

    #[test]
    fn test_failed_material_selection_leaves_project_clean() {
        let mut app = App::new();
        let _ = app.update(Message::MaterialSelected(99, Some(1)));

        assert!(!app.is_modified);
        assert!(!app.status.is_empty() && app.status != "Ready");
    }

    #[test]
    fn test_title_marks_modified() {
        let mut app = App::new();
        assert_eq!(app.title(), "Drapeline - Untitled");
        let _ = app.update(Message::AddWindow);
        assert_eq!(app.title(), "Drapeline - Untitled *");
    }
}
