//! # Window Collection
//!
//! The ordered set of windows in a project. The collection owns the
//! identifier counter and the project total, and keeps both in step with
//! every edit:
//!
//! - identifiers come from a monotonic counter and are never reused, so
//!   deleting window 2 of 3 leaves windows 1 and 3
//! - at least one window always exists; removing the last one is refused
//! - every edit recomputes the touched window and then the project total
//!   before returning
//!
//! ## Example
//!
//! ```rust
//! use drape_core::collection::WindowCollection;
//! use drape_core::window::WindowField;
//!
//! let mut windows = WindowCollection::new();
//! let second = windows.add_window().id;
//!
//! windows.set_field(second, WindowField::Width, "100").unwrap();
//! windows.set_field(second, WindowField::Height, "150").unwrap();
//! windows.set_field(second, WindowField::InstallMethod, "wall").unwrap();
//! windows.set_field(second, WindowField::WallMountCost, "300").unwrap();
//!
//! assert_eq!(windows.total(), 300.0);
//! assert!(windows.remove_window(1).is_ok());
//! assert!(windows.remove_window(second).is_err()); // last window stays
//! ```

use std::collections::HashSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::calculations::{aggregate, recompute};
use crate::errors::{CalcError, CalcResult};
use crate::fields::{read_flag, read_number, read_selection, read_string};
use crate::window::{InstallMethod, MountType, WindowField, WindowRecord};

/// Ordered window records plus their identifier counter and total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowCollection {
    /// Identifier handed to the next added window
    next_id: u32,
    windows: Vec<WindowRecord>,
    /// Sum of all window grand totals
    #[serde(default)]
    total: f64,
}

impl WindowCollection {
    /// A collection holding one fresh window (id 1).
    pub fn new() -> Self {
        let mut collection = WindowCollection {
            next_id: 1,
            windows: Vec::new(),
            total: 0.0,
        };
        collection.add_window();
        collection
    }

    /// Append a new empty window and return it.
    pub fn add_window(&mut self) -> &WindowRecord {
        let id = self.next_id;
        // Saturates instead of wrapping to 0; `refresh` rejects counters this high
        self.next_id = id.saturating_add(1);

        let mut window = WindowRecord::new(id);
        recompute(&mut window);
        self.windows.push(window);
        self.total = aggregate(&self.windows);

        info!(window = id, count = self.windows.len(), "Added window");
        let last = self.windows.len() - 1;
        &self.windows[last]
    }

    /// Remove a window by identifier.
    ///
    /// Fails with [`CalcError::LastWindow`] when it is the only window, and
    /// with [`CalcError::WindowNotFound`] for an unknown id. The collection
    /// is unchanged on failure.
    pub fn remove_window(&mut self, id: u32) -> CalcResult<WindowRecord> {
        let pos = self.position(id)?;
        if self.windows.len() <= 1 {
            warn!(window = id, "Refused to remove the last window");
            return Err(CalcError::LastWindow);
        }

        let removed = self.windows.remove(pos);
        self.total = aggregate(&self.windows);
        info!(window = id, count = self.windows.len(), "Removed window");
        Ok(removed)
    }

    /// Apply raw form text to one field of a window.
    ///
    /// The text goes through the field reader, so bad input degrades to a
    /// default rather than failing. Only an unknown window id is an error.
    pub fn set_field(&mut self, id: u32, field: WindowField, raw: &str) -> CalcResult<&WindowRecord> {
        debug!(window = id, field = %field, "Field changed");
        self.edit(id, |window| apply_raw(window, field, raw))
    }

    /// Select a material option (or clear the selection with `None`).
    pub fn select_material(&mut self, id: u32, index: Option<u32>) -> CalcResult<&WindowRecord> {
        self.edit(id, |window| window.selected_material = index)
    }

    /// Edit a window through the typed API; costs and total are refreshed
    /// before this returns.
    pub fn edit<F>(&mut self, id: u32, change: F) -> CalcResult<&WindowRecord>
    where
        F: FnOnce(&mut WindowRecord),
    {
        let pos = self.position(id)?;
        {
            let window = &mut self.windows[pos];
            change(window);
            // The id is the collection's handle; edits may not move it
            window.id = id;
            recompute(window);
        }
        self.total = aggregate(&self.windows);
        Ok(&self.windows[pos])
    }

    /// Recompute every window and the total, and restore the collection
    /// invariants after deserialization: at least one window, positive
    /// unique ids, counter ahead of every id.
    ///
    /// Windows with id 0 or a repeated id get a fresh id from the counter;
    /// the first window holding an id keeps it.
    ///
    /// # Errors
    ///
    /// [`CalcError::InvalidInput`] when the ids leave no room for the counter
    /// to advance (an id or counter near `u32::MAX`).
    pub fn refresh(&mut self) -> CalcResult<()> {
        let max_id = self.windows.iter().map(|w| w.id).max().unwrap_or(0);
        let next_id = self.next_id.max(max_id.saturating_add(1)).max(1);

        // Every window may need a fresh id, plus one for an empty collection
        let needed = u32::try_from(self.windows.len() + 1).unwrap_or(u32::MAX);
        if max_id == u32::MAX || next_id.checked_add(needed).is_none() {
            return Err(CalcError::invalid_input(
                "next_id",
                next_id.max(max_id).to_string(),
                "window ids exhausted",
            ));
        }
        self.next_id = next_id;

        if self.windows.is_empty() {
            self.add_window();
        }

        let mut seen = HashSet::new();
        for window in &mut self.windows {
            if window.id == 0 || !seen.insert(window.id) {
                let fresh = self.next_id;
                self.next_id += 1;
                warn!(old = window.id, new = fresh, "Reassigned invalid window id");
                window.id = fresh;
                seen.insert(fresh);
            }
            recompute(window);
        }
        self.total = aggregate(&self.windows);
        Ok(())
    }

    pub fn get(&self, id: u32) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    /// Windows in collection order
    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WindowRecord> {
        self.windows.iter()
    }

    pub fn ids(&self) -> Vec<u32> {
        self.windows.iter().map(|w| w.id).collect()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Always false for a collection built through this API.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Project total (sum of window grand totals)
    pub fn total(&self) -> f64 {
        self.total
    }

    /// Identifier the next added window will get
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    fn position(&self, id: u32) -> CalcResult<usize> {
        self.windows
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| CalcError::window_not_found(id))
    }
}

impl Default for WindowCollection {
    fn default() -> Self {
        WindowCollection::new()
    }
}

impl<'a> IntoIterator for &'a WindowCollection {
    type Item = &'a WindowRecord;
    type IntoIter = std::slice::Iter<'a, WindowRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.windows.iter()
    }
}

/// Write raw form text into the matching window field.
fn apply_raw(window: &mut WindowRecord, field: WindowField, raw: &str) {
    let text = Some(raw);
    match field {
        WindowField::FloorSpace => window.floor_space = read_string(text),
        WindowField::Width => window.width_cm = read_number(text, 0.0),
        WindowField::Height => window.height_cm = read_number(text, 0.0),
        WindowField::MountType => window.mount_type = MountType::from_str_flexible(raw),
        WindowField::CurtainBox => window.curtain_box.present = read_flag(raw),
        WindowField::CurtainBoxDepth => window.curtain_box.depth_cm = read_number(text, 0.0),
        WindowField::OpeningStyle => window.opening_style = read_string(text),
        WindowField::CurtainType => window.curtain_type = read_string(text),
        WindowField::TrackInfo => window.track_info = read_string(text),
        WindowField::FabricModel => window.fabric_model = read_string(text),
        WindowField::SheerInfo => window.sheer_info = read_string(text),
        WindowField::PowerRequirement => window.power_requirement = read_string(text),
        WindowField::Remarks => window.remarks = read_string(text),
        WindowField::InstallReminder => window.install_reminder = read_string(text),
        WindowField::FactoryNotes => window.factory_notes = read_string(text),
        WindowField::SitePhoto => {
            let path = read_string(text);
            window.site_photo = if path.is_empty() { None } else { Some(PathBuf::from(path)) };
        }
        WindowField::MaterialLabel(index) => window.material_mut(index).label = read_string(text),
        WindowField::MaterialUnitPrice(index) => {
            window.material_mut(index).unit_price = read_number(text, 0.0)
        }
        WindowField::MaterialSelection => window.selected_material = read_selection(raw),
        WindowField::InstallMethod => window.install_method = InstallMethod::from_str_flexible(raw),
        WindowField::WallMountCost => window.wall_mount_cost = read_number(text, 0.0),
        WindowField::CeilingMountCost => window.ceiling_mount_cost = read_number(text, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(collection: &mut WindowCollection, id: u32) {
        collection.set_field(id, WindowField::Width, "100").unwrap();
        collection.set_field(id, WindowField::Height, "150").unwrap();
        collection.set_field(id, WindowField::MaterialUnitPrice(1), "500").unwrap();
        collection.set_field(id, WindowField::MaterialSelection, "1").unwrap();
        collection.set_field(id, WindowField::InstallMethod, "wall").unwrap();
        collection.set_field(id, WindowField::WallMountCost, "300").unwrap();
    }

    #[test]
    fn test_new_collection_has_one_zero_window() {
        let collection = WindowCollection::new();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.ids(), vec![1]);
        assert_eq!(collection.total(), 0.0);
        assert_eq!(collection.windows()[0].costs.grand_total, 0.0);
    }

    #[test]
    fn test_cannot_remove_last_window() {
        let mut collection = WindowCollection::new();
        let before = collection.clone();

        let err = collection.remove_window(1).unwrap_err();
        assert_eq!(err, CalcError::LastWindow);
        assert_eq!(collection, before);
        assert_eq!(collection.windows()[0].costs.area_tsai, 0.0);
    }

    #[test]
    fn test_unknown_window() {
        let mut collection = WindowCollection::new();
        collection.add_window();
        assert_eq!(collection.remove_window(42).unwrap_err(), CalcError::window_not_found(42));
        assert!(collection.set_field(42, WindowField::Width, "1").is_err());
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn test_ids_are_stable_and_never_reused() {
        let mut collection = WindowCollection::new();
        for _ in 0..4 {
            collection.add_window();
        }
        assert_eq!(collection.ids(), vec![1, 2, 3, 4, 5]);

        priced(&mut collection, 4);
        let window_four = collection.get(4).cloned().unwrap();

        collection.remove_window(2).unwrap();
        collection.remove_window(5).unwrap();
        assert_eq!(collection.ids(), vec![1, 3, 4]);
        assert_eq!(collection.get(4), Some(&window_four));

        let added = collection.add_window().id;
        assert_eq!(added, 6);
    }

    #[test]
    fn test_edit_updates_total_synchronously() {
        let mut collection = WindowCollection::new();
        let second = collection.add_window().id;

        priced(&mut collection, 1);
        assert_eq!(collection.get(1).unwrap().costs.grand_total, 8470.0);
        assert_eq!(collection.total(), 8470.0);

        // Second window has no material and no install
        assert_eq!(collection.get(second).unwrap().costs.grand_total, 0.0);
        assert_eq!(collection.total(), 8470.0);

        collection.set_field(1, WindowField::InstallMethod, "other").unwrap();
        assert_eq!(collection.total(), 8170.0);

        collection.remove_window(1).unwrap();
        assert_eq!(collection.total(), 0.0);
    }

    #[test]
    fn test_invalid_input_degrades_to_zero() {
        let mut collection = WindowCollection::new();
        priced(&mut collection, 1);
        collection.set_field(1, WindowField::Width, "abc").unwrap();

        let window = collection.get(1).unwrap();
        assert_eq!(window.width_cm, 0.0);
        assert_eq!(window.costs.area_tsai, 0.0);
        assert_eq!(window.costs.grand_total, 300.0);
    }

    #[test]
    fn test_select_material_typed() {
        let mut collection = WindowCollection::new();
        priced(&mut collection, 1);
        collection.select_material(1, None).unwrap();
        assert_eq!(collection.total(), 300.0);
        collection.select_material(1, Some(1)).unwrap();
        assert_eq!(collection.total(), 8470.0);
    }

    #[test]
    fn test_edit_cannot_change_id() {
        let mut collection = WindowCollection::new();
        collection.edit(1, |w| w.id = 99).unwrap();
        assert_eq!(collection.ids(), vec![1]);
    }

    #[test]
    fn test_text_and_choice_fields() {
        let mut collection = WindowCollection::new();
        collection.set_field(1, WindowField::FloorSpace, " 2F 主臥 ").unwrap();
        collection.set_field(1, WindowField::MountType, "框內").unwrap();
        collection.set_field(1, WindowField::CurtainBox, "yes").unwrap();
        collection.set_field(1, WindowField::CurtainBoxDepth, "15").unwrap();
        collection.set_field(1, WindowField::SitePhoto, "/tmp/site.jpg").unwrap();
        collection.set_field(1, WindowField::MaterialLabel(2), "遮光布 A").unwrap();

        let window = collection.get(1).unwrap();
        assert_eq!(window.floor_space, "2F 主臥");
        assert_eq!(window.mount_type, MountType::Inside);
        assert_eq!(window.curtain_box.describe(), "有 (深度: 15cm)");
        assert_eq!(window.site_photo_name(), "site.jpg");
        assert_eq!(window.material(2).unwrap().label, "遮光布 A");
    }

    #[test]
    fn test_refresh_repairs_loaded_state() {
        let mut collection = WindowCollection::new();
        priced(&mut collection, 1);
        let mut json: serde_json::Value = serde_json::to_value(&collection).unwrap();
        json["next_id"] = serde_json::json!(1);
        json["total"] = serde_json::json!(0.0);
        json["windows"][0]["costs"] = serde_json::json!({});

        let mut loaded: WindowCollection = serde_json::from_value(json).unwrap();
        loaded.refresh().unwrap();
        assert_eq!(loaded.total(), 8470.0);
        assert_eq!(loaded.next_id(), 2);

        let mut empty: WindowCollection =
            serde_json::from_value(serde_json::json!({ "next_id": 7, "windows": [] })).unwrap();
        empty.refresh().unwrap();
        assert_eq!(empty.ids(), vec![7]);
    }

    fn from_json(json: serde_json::Value) -> WindowCollection {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_refresh_reassigns_duplicate_and_zero_ids() {
        let mut collection = from_json(serde_json::json!({
            "next_id": 3,
            "windows": [{ "id": 1, "floor_space": "客廳" }, { "id": 1, "floor_space": "主臥" }, { "id": 0 }]
        }));
        collection.refresh().unwrap();

        assert_eq!(collection.ids(), vec![1, 3, 4]);
        assert_eq!(collection.get(1).unwrap().floor_space, "客廳");
        assert_eq!(collection.get(3).unwrap().floor_space, "主臥");
        assert_eq!(collection.next_id(), 5);

        // Every window is reachable again
        assert!(collection.remove_window(3).is_ok());
        assert!(collection.remove_window(4).is_ok());
        assert_eq!(collection.ids(), vec![1]);
    }

    #[test]
    fn test_refresh_with_zero_counter() {
        let mut collection = from_json(serde_json::json!({ "next_id": 0, "windows": [{ "id": 0 }] }));
        collection.refresh().unwrap();
        assert_eq!(collection.ids(), vec![1]);
        assert_eq!(collection.next_id(), 2);

        let mut empty = from_json(serde_json::json!({ "next_id": 0, "windows": [] }));
        empty.refresh().unwrap();
        assert_eq!(empty.ids(), vec![1]);
    }

    #[test]
    fn test_refresh_rejects_exhausted_ids() {
        let mut at_max = from_json(serde_json::json!({ "next_id": 1, "windows": [{ "id": u32::MAX }] }));
        assert!(matches!(at_max.refresh(), Err(CalcError::InvalidInput { .. })));

        let mut counter_at_max = from_json(serde_json::json!({ "next_id": u32::MAX, "windows": [{ "id": 1 }] }));
        assert!(matches!(counter_at_max.refresh(), Err(CalcError::InvalidInput { .. })));
    }
}
