//! # Form Import
//!
//! Bulk entry of a whole survey form as JSON, as captured by a tablet or a
//! previous export. Text fields are keyed by the same names as
//! [`ProjectField`] and [`WindowField`]; exclusive choices live in each
//! window's own `choices` scope.
//!
//! ```json
//! {
//!   "project": { "name": "松仁路 100 號", "surveyor": "王小明" },
//!   "windows": [
//!     {
//!       "fields": { "width_cm": "100", "height_cm": "150", "material_1_unit_price": "500" },
//!       "choices": { "material_selection": "1", "install_method": "wall" }
//!     }
//!   ]
//! }
//! ```
//!
//! Every value goes through the field readers, so malformed entries degrade
//! to defaults. Unknown names are skipped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::CalcResult;
use crate::fields::{read_choice, ChoiceScope};
use crate::project::{Project, ProjectField};
use crate::window::WindowField;

/// A complete form: project fields plus one entry per window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawForm {
    pub project: BTreeMap<String, String>,
    pub windows: Vec<RawWindowForm>,
}

/// Raw text for a single window block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawWindowForm {
    pub fields: BTreeMap<String, String>,
    pub choices: ChoiceScope,
}

/// Choice groups read from a window's scope.
const CHOICE_FIELDS: [WindowField; 4] = [
    WindowField::MountType,
    WindowField::CurtainBox,
    WindowField::MaterialSelection,
    WindowField::InstallMethod,
];

impl RawForm {
    /// Parse a form from JSON text.
    pub fn from_json(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a new project from this form.
    ///
    /// Windows are created in form order with ids 1..=n. An empty window list
    /// still yields the one window every project has.
    pub fn into_project(self) -> Project {
        let mut project = Project::default();
        self.apply_to(&mut project);
        project
    }

    /// Write the form into an existing project.
    ///
    /// Project fields are overwritten where present. The i-th window entry
    /// fills the i-th existing window; extra entries add windows.
    pub fn apply_to(&self, project: &mut Project) {
        for (name, raw) in &self.project {
            match name.parse::<ProjectField>() {
                Ok(field) => project.set_info_field(field, raw),
                Err(_) => debug!(field = %name, "Skipping unknown project field"),
            }
        }

        for (i, entry) in self.windows.iter().enumerate() {
            let existing = project.windows.windows().get(i).map(|w| w.id);
            let id = match existing {
                Some(id) => id,
                None => project.add_window(),
            };
            entry.apply_to(project, id);
        }

        info!(windows = self.windows.len(), total = project.total(), "Imported form");
    }
}

impl RawWindowForm {
    fn apply_to(&self, project: &mut Project, id: u32) {
        for (name, raw) in &self.fields {
            match name.parse::<WindowField>() {
                Ok(field) if field.is_choice() => {
                    debug!(window = id, field = %name, "Choice given as a field; use the choices scope")
                }
                Ok(field) => {
                    if let Err(e) = project.set_window_field(id, field, raw) {
                        warn!(window = id, field = %name, error = %e, "Form field not applied");
                    }
                }
                Err(_) => debug!(window = id, field = %name, "Skipping unknown window field"),
            }
        }

        for field in CHOICE_FIELDS {
            let group = field.name();
            if self.choices.groups().any(|(g, _)| g == group) {
                if let Err(e) = project.set_window_field(id, field, &read_choice(&self.choices, &group)) {
                    warn!(window = id, field = %group, error = %e, "Form choice not applied");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::{InstallMethod, MountType};

    const SAMPLE: &str = r#"{
        "project": { "name": " 松仁路 100 號 ", "surveyor": "王小明", "colour": "red" },
        "windows": [
            {
                "fields": {
                    "floor_space": "客廳",
                    "width_cm": "100",
                    "height_cm": "150",
                    "material_1_unit_price": "500",
                    "wall_mount_cost": "300"
                },
                "choices": { "material_selection": "1", "install_method": "wall" }
            },
            {
                "fields": { "width_cm": "abc", "height_cm": "200" },
                "choices": { "mount_type": "inside", "curtain_box": "yes" }
            }
        ]
    }"#;

    #[test]
    fn test_import_builds_priced_project() {
        let project = RawForm::from_json(SAMPLE).unwrap().into_project();

        assert_eq!(project.info.name, "松仁路 100 號");
        assert_eq!(project.info.surveyor, "王小明");
        assert_eq!(project.windows.ids(), vec![1, 2]);

        let first = project.windows.get(1).unwrap();
        assert_eq!(first.floor_space, "客廳");
        assert_eq!(first.install_method, InstallMethod::Wall);
        assert_eq!(first.costs.grand_total, 8470.0);
        assert_eq!(project.total(), 8470.0);
    }

    #[test]
    fn test_choices_are_scoped_per_window() {
        let project = RawForm::from_json(SAMPLE).unwrap().into_project();
        let first = project.windows.get(1).unwrap();
        let second = project.windows.get(2).unwrap();

        assert_eq!(first.mount_type, MountType::Outside);
        assert!(!first.curtain_box.present);
        assert_eq!(second.mount_type, MountType::Inside);
        assert!(second.curtain_box.present);
        assert_eq!(second.selected_material, None);
        assert_eq!(second.install_method, InstallMethod::Other);
        assert_eq!(second.width_cm, 0.0);
    }

    #[test]
    fn test_rejected_value_does_not_stop_the_window() {
        let project = RawForm::from_json(SAMPLE).unwrap().into_project();
        let second = project.windows.get(2).unwrap();

        // "abc" width is logged and skipped; later fields still land
        assert_eq!(second.width_cm, 0.0);
        assert_eq!(second.height_cm, 200.0);
        assert_eq!(second.mount_type, MountType::Inside);
    }

    #[test]
    fn test_empty_form_keeps_one_window() {
        let project = RawForm::from_json("{}").unwrap().into_project();
        assert_eq!(project.windows.len(), 1);
        assert_eq!(project.total(), 0.0);
    }

    #[test]
    fn test_apply_fills_existing_windows_first() {
        let mut project = Project::new("Existing");
        let form = RawForm {
            project: BTreeMap::new(),
            windows: vec![RawWindowForm::default(), RawWindowForm::default()],
        };
        form.apply_to(&mut project);
        assert_eq!(project.windows.ids(), vec![1, 2]);
        assert_eq!(project.info.name, "Existing");
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(RawForm::from_json("{ not json").is_err());
    }
}
