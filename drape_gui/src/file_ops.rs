//! File menu actions: project files, form import and PDF export.
//!
//! Dialogs are synchronous; every failure ends up in the status bar.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use drape_core::file_io::{load_project_with_lock_check, save_project, write_atomic, FileLock, PROJECT_EXTENSION};
use drape_core::form::RawForm;
use drape_core::pdf::render_document_pdf;
use drape_core::{CalcError, CalcResult, Project};

use crate::App;

impl App {
    pub(crate) fn new_project(&mut self) {
        self.file_lock = None;
        self.lock_holder = None;
        self.current_file = None;
        self.replace_project(Project::default());
        self.is_modified = false;
        self.status = "New project".to_string();
    }

    pub(crate) fn open_project(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Drapeline Project", &[PROJECT_EXTENSION])
            .pick_file()
        else {
            return;
        };

        match self.open_path(&path) {
            Ok(()) => {}
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Open failed");
                self.status = e.to_string();
            }
        }
    }

    fn open_path(&mut self, path: &Path) -> CalcResult<()> {
        let (project, lock_info) = load_project_with_lock_check(path)?;

        // Someone else is editing: open read-only
        let (file_lock, lock_holder) = match lock_info {
            Some(info) => (None, Some(info.holder())),
            None => match FileLock::acquire(path, self.settings.lock_user()) {
                Ok(lock) => (Some(lock), None),
                Err(CalcError::FileLocked { locked_by, .. }) => (None, Some(locked_by)),
                Err(e) => return Err(e),
            },
        };

        self.file_lock = file_lock;
        self.status = match &lock_holder {
            Some(holder) => format!("Opened read-only, in use by {}", holder),
            None => format!("Opened {}", path.display()),
        };
        self.lock_holder = lock_holder;
        self.current_file = Some(path.to_path_buf());
        self.replace_project(project);
        self.is_modified = false;
        Ok(())
    }

    /// Save to the current file; returns whether the project was written.
    pub(crate) fn save(&mut self) -> bool {
        if let Some(holder) = &self.lock_holder {
            self.status = format!("Read-only (in use by {}); use Save As", holder);
            return false;
        }
        let Some(path) = self.current_file.clone() else {
            return self.save_as();
        };

        match save_project(&self.project, &path) {
            Ok(()) => {
                self.is_modified = false;
                self.status = format!("Saved {}", path.display());
                true
            }
            Err(e) => {
                self.status = e.to_string();
                false
            }
        }
    }

    pub(crate) fn save_as(&mut self) -> bool {
        let default_name = if self.project.info.name.is_empty() {
            format!("survey.{}", PROJECT_EXTENSION)
        } else {
            format!("{}.{}", self.project.info.name, PROJECT_EXTENSION)
        };

        let Some(picked) = rfd::FileDialog::new()
            .add_filter("Drapeline Project", &[PROJECT_EXTENSION])
            .set_file_name(&default_name)
            .save_file()
        else {
            return false;
        };
        let path = with_project_extension(picked);

        match self.save_to_new_path(&path) {
            Ok(()) => {
                self.is_modified = false;
                self.status = format!("Saved {}", path.display());
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Save As failed");
                self.status = e.to_string();
                false
            }
        }
    }

    fn save_to_new_path(&mut self, path: &Path) -> CalcResult<()> {
        // Saving over the file we already hold keeps the lock
        let already_held = self
            .file_lock
            .as_ref()
            .is_some_and(|lock| lock.project_path() == path);

        if already_held {
            return save_project(&self.project, path);
        }

        let lock = FileLock::acquire(path, self.settings.lock_user())?;
        save_project(&self.project, path)?;
        self.file_lock = Some(lock);
        self.lock_holder = None;
        self.current_file = Some(path.to_path_buf());
        Ok(())
    }

    /// Start an unsaved project from a filled-in JSON form.
    pub(crate) fn import_form(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Form JSON", &["json"])
            .pick_file()
        else {
            return;
        };

        let imported = fs::read_to_string(&path)
            .map_err(|e| CalcError::file_error("read form", path.display().to_string(), e.to_string()))
            .and_then(|json| RawForm::from_json(&json));

        match imported {
            Ok(form) => {
                let project = form.into_project();
                info!(path = %path.display(), windows = project.windows.len(), "Imported form");
                self.file_lock = None;
                self.lock_holder = None;
                self.current_file = None;
                self.replace_project(project);
                self.is_modified = true;
                self.status = format!("Imported {}", path.display());
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    /// Render the previewed document and write it where the user picks.
    pub(crate) fn export_pdf(&mut self) {
        let kind = self.document;
        let Some(path) = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .set_directory(&self.settings.output_dir)
            .set_file_name(format!("{}-{}.pdf", self.file_stem(), kind.code()))
            .save_file()
        else {
            return;
        };

        let view = self.project.document(kind);
        match render_document_pdf(&view, &self.fonts).and_then(|pdf| write_atomic(&path, &pdf)) {
            Ok(()) => {
                info!(path = %path.display(), kind = kind.code(), "Exported document");
                self.status = format!("Exported {}", path.display());
            }
            Err(e) => {
                warn!(error = %e, "PDF export failed");
                self.status = e.to_string();
            }
        }
    }

    /// Base name for exports: the file stem, else the project name.
    fn file_stem(&self) -> String {
        self.current_file
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| s.to_string_lossy().into_owned())
            .or_else(|| Some(self.project.info.name.clone()).filter(|n| !n.is_empty()))
            .unwrap_or_else(|| "project".to_string())
    }
}

/// Append `.drp` when the dialog returned a bare name.
fn with_project_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some_and(|e| e == PROJECT_EXTENSION) {
        path
    } else {
        let mut name = path.into_os_string();
        name.push(".");
        name.push(PROJECT_EXTENSION);
        PathBuf::from(name)
    }
}
