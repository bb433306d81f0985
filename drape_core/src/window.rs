//! # Window Records
//!
//! One [`WindowRecord`] per physical window/curtain opening: the raw values
//! staff type in on site, plus the derived [`WindowCosts`] kept current by the
//! calculator in [`crate::calculations::window`].
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "id": 1,
//!   "floor_space": "2F 主臥",
//!   "width_cm": 180.0,
//!   "height_cm": 220.0,
//!   "mount_type": "outside",
//!   "curtain_box": { "present": true, "depth_cm": 15.0 },
//!   "materials": [{ "index": 1, "label": "材質1", "unit_price": 500.0 }],
//!   "selected_material": 1,
//!   "install_method": "wall",
//!   "wall_mount_cost": 300.0,
//!   "ceiling_mount_cost": 0.0
//! }
//! ```

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

/// Number of material options a new window starts with.
pub const DEFAULT_MATERIAL_OPTIONS: u32 = 3;

// ============================================================================
// Choice Vocabularies
// ============================================================================

/// Where the curtain hangs relative to the window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountType {
    /// Inside the frame (框內)
    Inside,
    /// Outside the frame (框外)
    #[default]
    Outside,
}

impl MountType {
    /// All variants for UI selection
    pub const ALL: [MountType; 2] = [MountType::Inside, MountType::Outside];

    /// Form value code
    pub fn code(&self) -> &'static str {
        match self {
            MountType::Inside => "inside",
            MountType::Outside => "outside",
        }
    }

    /// Label used on printed documents
    pub fn label(&self) -> &'static str {
        match self {
            MountType::Inside => "框內",
            MountType::Outside => "框外",
        }
    }

    /// Parse a form value. Anything other than "inside" counts as outside-frame.
    pub fn from_str_flexible(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "inside" | "inside-frame" | "框內" => MountType::Inside,
            _ => MountType::Outside,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            MountType::Inside => "Inside frame",
            MountType::Outside => "Outside frame",
        }
    }
}

impl std::fmt::Display for MountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// How the track is fixed. Only wall and ceiling mounting carry a surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallMethod {
    /// Wall mount (牆裝)
    Wall,
    /// Ceiling mount (天花板裝)
    Ceiling,
    /// Anything else (其他); never priced
    #[default]
    Other,
}

impl InstallMethod {
    /// All variants for UI selection
    pub const ALL: [InstallMethod; 3] = [InstallMethod::Wall, InstallMethod::Ceiling, InstallMethod::Other];

    /// Form value code
    pub fn code(&self) -> &'static str {
        match self {
            InstallMethod::Wall => "wall",
            InstallMethod::Ceiling => "ceiling",
            InstallMethod::Other => "other",
        }
    }

    /// Label used on printed documents
    pub fn label(&self) -> &'static str {
        match self {
            InstallMethod::Wall => "牆裝",
            InstallMethod::Ceiling => "天花板裝",
            InstallMethod::Other => "其他",
        }
    }

    /// Parse a form value; unmapped values fall back to `Other`.
    pub fn from_str_flexible(s: &str) -> Self {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "wall" | "wall-mount" | "牆裝" => InstallMethod::Wall,
            "ceiling" | "ceiling-mount" | "天花板裝" => InstallMethod::Ceiling,
            _ => InstallMethod::Other,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            InstallMethod::Wall => "Wall mount",
            InstallMethod::Ceiling => "Ceiling mount",
            InstallMethod::Other => "Other",
        }
    }
}

impl std::fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Curtain box (窗簾盒) above the window. The depth only matters when present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurtainBox {
    pub present: bool,
    pub depth_cm: f64,
}

impl CurtainBox {
    /// Document text: `有 (深度: 15cm)` or the `無` sentinel.
    pub fn describe(&self) -> String {
        if self.present {
            format!("有 (深度: {}cm)", crate::units::format_plain(self.depth_cm))
        } else {
            "無".to_string()
        }
    }
}

/// One priced material choice offered for a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialOption {
    /// 1-based option number, stable within the window
    pub index: u32,
    /// Free-text name shown on the quote (e.g. fabric series)
    pub label: String,
    /// Price per 才
    pub unit_price: f64,
}

impl MaterialOption {
    pub fn new(index: u32) -> Self {
        MaterialOption {
            index,
            label: format!("材質{}", index),
            unit_price: 0.0,
        }
    }
}

// ============================================================================
// Derived State
// ============================================================================

/// Price of one material option for the window's current area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OptionTotal {
    pub index: u32,
    pub total: f64,
}

/// Derived values written by the window calculator. Never edited directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowCosts {
    /// Area in 才, two-decimal precision
    pub area_tsai: f64,
    /// `area_tsai * unit_price` for every option, selected or not
    pub option_totals: Vec<OptionTotal>,
    /// Unit price of the selected option (0 when none)
    pub selected_unit_price: f64,
    /// Material subtotal of the selected option (0 when none)
    pub selected_material_cost: f64,
    /// Wall/ceiling surcharge (0 for other methods)
    pub install_cost: f64,
    /// Rounded window total
    pub grand_total: f64,
}

// ============================================================================
// Window Record
// ============================================================================

/// A single window/curtain unit in a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowRecord {
    /// Stable identifier assigned by the collection
    pub id: u32,

    /// Floor / room (樓層/空間)
    #[serde(default)]
    pub floor_space: String,
    #[serde(default)]
    pub width_cm: f64,
    #[serde(default)]
    pub height_cm: f64,
    #[serde(default)]
    pub mount_type: MountType,
    #[serde(default)]
    pub curtain_box: CurtainBox,
    /// Opening style, e.g. 雙開 / 單開左 (開法)
    #[serde(default)]
    pub opening_style: String,
    /// Curtain product type, e.g. 布簾 / 捲簾 (窗簾種類)
    #[serde(default)]
    pub curtain_type: String,
    /// Track type and colour (軌道種類)
    #[serde(default)]
    pub track_info: String,
    /// Fabric model / number (布料型號)
    #[serde(default)]
    pub fabric_model: String,
    /// Sheer model / number (紗料)
    #[serde(default)]
    pub sheer_info: String,
    /// Power requirement for motorised tracks (電源需求)
    #[serde(default)]
    pub power_requirement: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub install_reminder: String,
    #[serde(default)]
    pub factory_notes: String,
    /// Site photo chosen on the form
    #[serde(default)]
    pub site_photo: Option<PathBuf>,

    #[serde(default)]
    pub materials: Vec<MaterialOption>,
    /// `index` of the selected material option, if any
    #[serde(default)]
    pub selected_material: Option<u32>,
    #[serde(default)]
    pub install_method: InstallMethod,
    #[serde(default)]
    pub wall_mount_cost: f64,
    #[serde(default)]
    pub ceiling_mount_cost: f64,

    /// Derived values, kept current by the calculator
    #[serde(default)]
    pub costs: WindowCosts,
}

impl WindowRecord {
    /// Create an empty window with the default material options.
    ///
    /// Derived costs start at zero; the collection recomputes them on insert.
    pub fn new(id: u32) -> Self {
        WindowRecord {
            id,
            floor_space: String::new(),
            width_cm: 0.0,
            height_cm: 0.0,
            mount_type: MountType::default(),
            curtain_box: CurtainBox::default(),
            opening_style: String::new(),
            curtain_type: String::new(),
            track_info: String::new(),
            fabric_model: String::new(),
            sheer_info: String::new(),
            power_requirement: String::new(),
            remarks: String::new(),
            install_reminder: String::new(),
            factory_notes: String::new(),
            site_photo: None,
            materials: (1..=DEFAULT_MATERIAL_OPTIONS).map(MaterialOption::new).collect(),
            selected_material: None,
            install_method: InstallMethod::default(),
            wall_mount_cost: 0.0,
            ceiling_mount_cost: 0.0,
            costs: WindowCosts::default(),
        }
    }

    /// Title used in lists and document headings (`窗戶 3`).
    pub fn title(&self) -> String {
        format!("窗戶 {}", self.id)
    }

    /// The selected material option, if the selection points at one.
    pub fn selected_option(&self) -> Option<&MaterialOption> {
        let index = self.selected_material?;
        self.materials.iter().find(|m| m.index == index)
    }

    pub fn material(&self, index: u32) -> Option<&MaterialOption> {
        self.materials.iter().find(|m| m.index == index)
    }

    /// Mutable access to an option. When the form addresses an option that
    /// does not exist yet, that single option is inserted in index order;
    /// lower missing indexes stay absent.
    pub fn material_mut(&mut self, index: u32) -> &mut MaterialOption {
        let pos = match self.materials.iter().position(|m| m.index == index) {
            Some(pos) => pos,
            None => {
                self.materials.push(MaterialOption::new(index));
                self.materials.sort_by_key(|m| m.index);
                self.materials
                    .iter()
                    .position(|m| m.index == index)
                    .unwrap_or(self.materials.len() - 1)
            }
        };
        &mut self.materials[pos]
    }

    /// Display name of the site photo, or the "no file chosen" sentinel.
    pub fn site_photo_name(&self) -> String {
        crate::fields::read_file_name(self.site_photo.as_deref())
    }
}

// ============================================================================
// Field Vocabulary
// ============================================================================

/// Every user-editable field of a window, addressable by name from the form.
///
/// Field names are the snake_case codes below; material fields are
/// `material_<n>_label` and `material_<n>_unit_price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowField {
    FloorSpace,
    Width,
    Height,
    MountType,
    CurtainBox,
    CurtainBoxDepth,
    OpeningStyle,
    CurtainType,
    TrackInfo,
    FabricModel,
    SheerInfo,
    PowerRequirement,
    Remarks,
    InstallReminder,
    FactoryNotes,
    SitePhoto,
    MaterialLabel(u32),
    MaterialUnitPrice(u32),
    MaterialSelection,
    InstallMethod,
    WallMountCost,
    CeilingMountCost,
}

impl WindowField {
    /// Fields addressed by a fixed name (material fields are parameterised).
    pub const FIXED: [WindowField; 20] = [
        WindowField::FloorSpace,
        WindowField::Width,
        WindowField::Height,
        WindowField::MountType,
        WindowField::CurtainBox,
        WindowField::CurtainBoxDepth,
        WindowField::OpeningStyle,
        WindowField::CurtainType,
        WindowField::TrackInfo,
        WindowField::FabricModel,
        WindowField::SheerInfo,
        WindowField::PowerRequirement,
        WindowField::Remarks,
        WindowField::InstallReminder,
        WindowField::FactoryNotes,
        WindowField::SitePhoto,
        WindowField::MaterialSelection,
        WindowField::InstallMethod,
        WindowField::WallMountCost,
        WindowField::CeilingMountCost,
    ];

    /// Form name of the field
    pub fn name(&self) -> String {
        match self {
            WindowField::MaterialLabel(i) => format!("material_{}_label", i),
            WindowField::MaterialUnitPrice(i) => format!("material_{}_unit_price", i),
            other => other.fixed_name().to_string(),
        }
    }

    fn fixed_name(&self) -> &'static str {
        match self {
            WindowField::FloorSpace => "floor_space",
            WindowField::Width => "width_cm",
            WindowField::Height => "height_cm",
            WindowField::MountType => "mount_type",
            WindowField::CurtainBox => "curtain_box",
            WindowField::CurtainBoxDepth => "curtain_box_depth_cm",
            WindowField::OpeningStyle => "opening_style",
            WindowField::CurtainType => "curtain_type",
            WindowField::TrackInfo => "track_info",
            WindowField::FabricModel => "fabric_model",
            WindowField::SheerInfo => "sheer_info",
            WindowField::PowerRequirement => "power_requirement",
            WindowField::Remarks => "remarks",
            WindowField::InstallReminder => "install_reminder",
            WindowField::FactoryNotes => "factory_notes",
            WindowField::SitePhoto => "site_photo",
            WindowField::MaterialSelection => "material_selection",
            WindowField::InstallMethod => "install_method",
            WindowField::WallMountCost => "wall_mount_cost",
            WindowField::CeilingMountCost => "ceiling_mount_cost",
            WindowField::MaterialLabel(_) | WindowField::MaterialUnitPrice(_) => "material",
        }
    }

    /// Whether editing this field can change the derived costs.
    pub fn affects_costs(&self) -> bool {
        matches!(
            self,
            WindowField::Width
                | WindowField::Height
                | WindowField::MaterialUnitPrice(_)
                | WindowField::MaterialSelection
                | WindowField::InstallMethod
                | WindowField::WallMountCost
                | WindowField::CeilingMountCost
        )
    }

    /// Whether the field is one of the exclusive-choice groups.
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            WindowField::MountType
                | WindowField::CurtainBox
                | WindowField::MaterialSelection
                | WindowField::InstallMethod
        )
    }
}

impl FromStr for WindowField {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if let Some(field) = WindowField::FIXED.iter().find(|f| f.fixed_name() == name) {
            return Ok(*field);
        }

        if let Some(rest) = name.strip_prefix("material_") {
            if let Some(index) = rest.strip_suffix("_unit_price") {
                if let Ok(index) = index.parse::<u32>() {
                    if index > 0 {
                        return Ok(WindowField::MaterialUnitPrice(index));
                    }
                }
            }
            if let Some(index) = rest.strip_suffix("_label") {
                if let Ok(index) = index.parse::<u32>() {
                    if index > 0 {
                        return Ok(WindowField::MaterialLabel(index));
                    }
                }
            }
        }

        Err(CalcError::unknown_field(name))
    }
}

impl std::fmt::Display for WindowField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_window_defaults() {
        let window = WindowRecord::new(4);
        assert_eq!(window.id, 4);
        assert_eq!(window.materials.len(), DEFAULT_MATERIAL_OPTIONS as usize);
        assert_eq!(window.materials[0].index, 1);
        assert_eq!(window.mount_type, MountType::Outside);
        assert_eq!(window.install_method, InstallMethod::Other);
        assert!(window.selected_option().is_none());
        assert_eq!(window.title(), "窗戶 4");
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!(MountType::from_str_flexible("inside"), MountType::Inside);
        assert_eq!(MountType::from_str_flexible("框內"), MountType::Inside);
        assert_eq!(MountType::from_str_flexible(""), MountType::Outside);
        assert_eq!(InstallMethod::from_str_flexible("Wall Mount"), InstallMethod::Wall);
        assert_eq!(InstallMethod::from_str_flexible("天花板裝"), InstallMethod::Ceiling);
        assert_eq!(InstallMethod::from_str_flexible("magnets"), InstallMethod::Other);
    }

    #[test]
    fn test_curtain_box_description() {
        assert_eq!(CurtainBox::default().describe(), "無");
        let present = CurtainBox { present: true, depth_cm: 15.0 };
        assert_eq!(present.describe(), "有 (深度: 15cm)");
    }

    #[test]
    fn test_field_names_roundtrip() {
        for field in WindowField::FIXED {
            assert_eq!(field.name().parse::<WindowField>().unwrap(), field);
        }
        assert_eq!(
            "material_2_unit_price".parse::<WindowField>().unwrap(),
            WindowField::MaterialUnitPrice(2)
        );
        assert_eq!(
            "material_5_label".parse::<WindowField>().unwrap(),
            WindowField::MaterialLabel(5)
        );
        assert!("material_0_label".parse::<WindowField>().is_err());
        assert!("colour".parse::<WindowField>().is_err());
    }

    #[test]
    fn test_material_mut_appends_missing_option() {
        let mut window = WindowRecord::new(1);
        window.material_mut(5).unit_price = 900.0;
        assert_eq!(window.materials.len(), 4);
        assert_eq!(window.material(5).map(|m| m.unit_price), Some(900.0));
        assert_eq!(window.materials.last().map(|m| m.index), Some(5));
        assert!(window.material(4).is_none());
    }

    #[test]
    fn test_serialization_uses_codes() {
        let mut window = WindowRecord::new(1);
        window.install_method = InstallMethod::Wall;
        let json = serde_json::to_string(&window).unwrap();
        assert!(json.contains("\"install_method\":\"wall\""));
        assert!(json.contains("\"mount_type\":\"outside\""));
        let roundtrip: WindowRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, window);
    }
}
