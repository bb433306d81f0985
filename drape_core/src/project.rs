//! # Project Data Structures
//!
//! The `Project` struct is the root container for one site survey: who
//! measured what and where, plus every window. Projects serialize to `.drp`
//! files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (schema version, timestamps)
//! ├── info: ProjectInfo (address, survey date, surveyor, notes)
//! ├── settings: ShopSettings (shop name, currency symbol)
//! └── windows: WindowCollection (ordered windows, id counter, total)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use drape_core::project::{Project, ProjectField};
//! use drape_core::window::WindowField;
//!
//! let mut project = Project::new("台北市信義區松仁路 100 號");
//! project.set_info_field(ProjectField::Surveyor, "王小明");
//!
//! let id = project.add_window();
//! project.set_window_field(id, WindowField::Width, "120").unwrap();
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("王小明"));
//! ```

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::collection::WindowCollection;
use crate::errors::{CalcError, CalcResult};
use crate::fields::read_string;
use crate::window::{WindowField, WindowRecord};

/// Current schema version for .drp files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Schema version and timestamps
    pub meta: ProjectMetadata,

    /// Site and survey information entered by staff
    pub info: ProjectInfo,

    /// Shop details printed on documents
    #[serde(default)]
    pub settings: ShopSettings,

    /// All windows, in form order
    pub windows: WindowCollection,
}

impl Project {
    /// Create a new project with one empty window.
    ///
    /// # Example
    ///
    /// ```rust
    /// use drape_core::project::Project;
    ///
    /// let project = Project::new("新北市板橋區文化路 1 號");
    /// assert_eq!(project.info.name, "新北市板橋區文化路 1 號");
    /// assert_eq!(project.windows.len(), 1);
    /// ```
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                created: now,
                modified: now,
            },
            info: ProjectInfo {
                name: name.into(),
                ..ProjectInfo::default()
            },
            settings: ShopSettings::default(),
            windows: WindowCollection::new(),
        }
    }

    /// Apply raw form text to a project-level field.
    pub fn set_info_field(&mut self, field: ProjectField, raw: &str) {
        let value = read_string(Some(raw));
        match field {
            ProjectField::Name => self.info.name = value,
            ProjectField::MeasureDate => self.info.measure_date = value,
            ProjectField::Surveyor => self.info.surveyor = value,
            ProjectField::Remarks => self.info.remarks = value,
            ProjectField::InstallReminder => self.info.install_reminder = value,
            ProjectField::FactoryNotes => self.info.factory_notes = value,
        }
        self.touch();
    }

    /// Add a window and return its identifier.
    ///
    /// The new window's material options take the shop's default labels.
    pub fn add_window(&mut self) -> u32 {
        let id = self.windows.add_window().id;
        let labels = self.settings.default_material_labels.clone();
        if !labels.is_empty() {
            let labelled = self.windows.edit(id, |window| {
                for (i, label) in labels.into_iter().enumerate() {
                    window.material_mut(i as u32 + 1).label = label;
                }
            });
            if let Err(e) = labelled {
                warn!(window = id, error = %e, "Default material labels not applied");
            }
        }
        self.touch();
        id
    }

    /// Remove a window. The last remaining window cannot be removed.
    pub fn remove_window(&mut self, id: u32) -> CalcResult<WindowRecord> {
        let removed = self.windows.remove_window(id)?;
        self.touch();
        Ok(removed)
    }

    /// Apply raw form text to a window field (recomputes before returning).
    pub fn set_window_field(&mut self, id: u32, field: WindowField, raw: &str) -> CalcResult<&WindowRecord> {
        self.meta.modified = Utc::now();
        self.windows.set_field(id, field, raw)
    }

    /// Select (or clear) a window's material option.
    pub fn select_material(&mut self, id: u32, index: Option<u32>) -> CalcResult<&WindowRecord> {
        self.meta.modified = Utc::now();
        self.windows.select_material(id, index)
    }

    /// Project total across all windows.
    pub fn total(&self) -> f64 {
        self.windows.total()
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("")
    }
}

/// Project metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}

/// Site-level information from the survey form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInfo {
    /// Project name or site address (專案名稱/地址)
    pub name: String,
    /// Measurement date as entered (丈量日期), typically `YYYY-MM-DD`
    pub measure_date: String,
    /// Who measured (丈量人員)
    pub surveyor: String,
    /// Site conditions (專案備註)
    pub remarks: String,
    /// Reminder for the installers (施工提醒)
    pub install_reminder: String,
    /// Notes for the factory (工廠備註)
    pub factory_notes: String,
}

/// Project-level form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectField {
    Name,
    MeasureDate,
    Surveyor,
    Remarks,
    InstallReminder,
    FactoryNotes,
}

impl ProjectField {
    pub const ALL: [ProjectField; 6] = [
        ProjectField::Name,
        ProjectField::MeasureDate,
        ProjectField::Surveyor,
        ProjectField::Remarks,
        ProjectField::InstallReminder,
        ProjectField::FactoryNotes,
    ];

    /// Form name of the field
    pub fn name(&self) -> &'static str {
        match self {
            ProjectField::Name => "name",
            ProjectField::MeasureDate => "measure_date",
            ProjectField::Surveyor => "surveyor",
            ProjectField::Remarks => "remarks",
            ProjectField::InstallReminder => "install_reminder",
            ProjectField::FactoryNotes => "factory_notes",
        }
    }

    /// Current value of this field in `info`
    pub fn value<'a>(&self, info: &'a ProjectInfo) -> &'a str {
        match self {
            ProjectField::Name => &info.name,
            ProjectField::MeasureDate => &info.measure_date,
            ProjectField::Surveyor => &info.surveyor,
            ProjectField::Remarks => &info.remarks,
            ProjectField::InstallReminder => &info.install_reminder,
            ProjectField::FactoryNotes => &info.factory_notes,
        }
    }
}

impl FromStr for ProjectField {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        ProjectField::ALL
            .iter()
            .find(|f| f.name() == name)
            .copied()
            .ok_or_else(|| CalcError::unknown_field(name))
    }
}

impl std::fmt::Display for ProjectField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Shop details printed on every document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopSettings {
    /// Shop name in document headers
    pub shop_name: String,
    /// Prefix for money amounts on the quote
    pub currency_symbol: String,
    /// Labels given to the material options of newly added windows
    pub default_material_labels: Vec<String>,
}

impl Default for ShopSettings {
    fn default() -> Self {
        ShopSettings {
            shop_name: String::new(),
            currency_symbol: "$".to_string(),
            default_material_labels: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_creation() {
        let project = Project::new("Site A");
        assert_eq!(project.info.name, "Site A");
        assert_eq!(project.meta.version, SCHEMA_VERSION);
        assert_eq!(project.windows.ids(), vec![1]);
        assert_eq!(project.total(), 0.0);
        assert_eq!(project.settings.currency_symbol, "$");
    }

    #[test]
    fn test_project_serialization() {
        let mut project = Project::new("Site B");
        project.set_info_field(ProjectField::Surveyor, "  Lin  ");
        let json = serde_json::to_string_pretty(&project).unwrap();

        assert!(json.contains("Site B"));
        assert!(json.contains("\"surveyor\": \"Lin\""));

        let roundtrip: Project = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.info, project.info);
        assert_eq!(roundtrip.windows, project.windows);
    }

    #[test]
    fn test_add_remove_window() {
        let mut project = Project::new("Site C");
        let id = project.add_window();
        assert_eq!(id, 2);
        assert_eq!(project.windows.len(), 2);

        let removed = project.remove_window(1).unwrap();
        assert_eq!(removed.id, 1);
        assert_eq!(project.remove_window(2).unwrap_err(), CalcError::LastWindow);
        assert_eq!(project.windows.ids(), vec![2]);
    }

    #[test]
    fn test_default_material_labels() {
        let mut project = Project::new("Site E");
        project.settings.default_material_labels = vec!["遮光布".to_string(), "紗簾".to_string()];
        let id = project.add_window();

        let window = project.windows.get(id).unwrap();
        assert_eq!(window.material(1).unwrap().label, "遮光布");
        assert_eq!(window.material(2).unwrap().label, "紗簾");
        assert_eq!(window.material(3).unwrap().label, "材質3");
        // Existing windows keep their labels
        assert_eq!(project.windows.get(1).unwrap().material(1).unwrap().label, "材質1");
    }

    #[test]
    fn test_info_fields_by_name() {
        let mut project = Project::default();
        for field in ProjectField::ALL {
            let parsed: ProjectField = field.name().parse().unwrap();
            project.set_info_field(parsed, &format!(" {} ", field.name()));
            assert_eq!(field.value(&project.info), field.name());
        }
        assert!("address".parse::<ProjectField>().is_err());
    }

    #[test]
    fn test_modified_advances_on_edit() {
        let mut project = Project::new("Site D");
        let created = project.meta.modified;
        project.set_window_field(1, WindowField::Width, "90").unwrap();
        assert!(project.meta.modified >= created);
        assert_eq!(project.windows.get(1).unwrap().width_cm, 90.0);
    }
}
