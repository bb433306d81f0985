//! # Window Calculator
//!
//! Computes area and price for one window.
//!
//! 1. `area = width × height / 918.09`, rounded to 0.01 才 (zero when either
//!    dimension is zero)
//! 2. every material option is priced at `area × unit_price`
//! 3. the selected option's total is the material cost (0 when nothing is
//!    selected or the selection points at a missing option)
//! 4. install cost is the wall or ceiling surcharge; `Other` costs nothing
//! 5. `grand_total = round(material + install)`
//!
//! ## Example
//!
//! ```rust
//! use drape_core::calculations::window::recompute;
//! use drape_core::window::{InstallMethod, WindowRecord};
//!
//! let mut window = WindowRecord::new(1);
//! window.width_cm = 100.0;
//! window.height_cm = 150.0;
//! window.material_mut(1).unit_price = 500.0;
//! window.selected_material = Some(1);
//! window.install_method = InstallMethod::Wall;
//! window.wall_mount_cost = 300.0;
//!
//! let costs = &recompute(&mut window).costs;
//! assert_eq!(costs.area_tsai, 16.34);
//! assert_eq!(costs.grand_total, 8470.0);
//! ```

use tracing::debug;

use crate::units::{Centimeters, Tsai};
use crate::window::{InstallMethod, OptionTotal, WindowCosts, WindowRecord};

/// Derive the cost fields from a window's current raw fields.
///
/// Pure: the same raw fields always give the same costs.
pub fn derive_costs(window: &WindowRecord) -> WindowCosts {
    let width = Centimeters(non_negative(window.width_cm));
    let height = Centimeters(non_negative(window.height_cm));
    let area = Tsai::from(width * height).rounded();

    let option_totals: Vec<OptionTotal> = window
        .materials
        .iter()
        .map(|option| OptionTotal {
            index: option.index,
            total: area.value() * non_negative(option.unit_price),
        })
        .collect();

    let (selected_unit_price, selected_material_cost) = window
        .selected_material
        .and_then(|selected| {
            let option = window.materials.iter().find(|m| m.index == selected)?;
            let total = option_totals.iter().find(|t| t.index == selected)?;
            Some((non_negative(option.unit_price), total.total))
        })
        .unwrap_or((0.0, 0.0));

    let install_cost = match window.install_method {
        InstallMethod::Wall => non_negative(window.wall_mount_cost),
        InstallMethod::Ceiling => non_negative(window.ceiling_mount_cost),
        InstallMethod::Other => 0.0,
    };

    let grand_total = (selected_material_cost + install_cost).round();

    WindowCosts {
        area_tsai: area.value(),
        option_totals,
        selected_unit_price,
        selected_material_cost,
        install_cost,
        grand_total,
    }
}

/// Recompute the derived costs in place and hand the record back.
pub fn recompute(window: &mut WindowRecord) -> &mut WindowRecord {
    window.costs = derive_costs(window);
    debug!(
        window = window.id,
        area_tsai = window.costs.area_tsai,
        grand_total = window.costs.grand_total,
        "Recomputed window"
    );
    window
}

/// Values from the typed API may bypass the field reader; clamp them so
/// totals can never go negative.
fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::CM2_PER_TSAI;

    fn sized(width: f64, height: f64) -> WindowRecord {
        let mut window = WindowRecord::new(1);
        window.width_cm = width;
        window.height_cm = height;
        window
    }

    #[test]
    fn test_reference_quote() {
        let mut window = sized(100.0, 150.0);
        window.material_mut(1).unit_price = 500.0;
        window.selected_material = Some(1);
        window.install_method = InstallMethod::Wall;
        window.wall_mount_cost = 300.0;

        let costs = derive_costs(&window);
        assert_eq!(costs.area_tsai, 16.34);
        assert_eq!(costs.selected_unit_price, 500.0);
        assert_eq!(costs.selected_material_cost.round(), 8170.0);
        assert_eq!(costs.install_cost, 300.0);
        assert_eq!(costs.grand_total, 8470.0);
    }

    #[test]
    fn test_area_matches_conversion() {
        for (w, h) in [(30.3, 30.3), (91.0, 200.0), (1.0, 1.0), (245.5, 180.25)] {
            let costs = derive_costs(&sized(w, h));
            let expected = ((w * h / CM2_PER_TSAI) * 100.0).round() / 100.0;
            assert_eq!(costs.area_tsai, expected, "{} x {}", w, h);
        }
    }

    #[test]
    fn test_zero_dimension_means_zero_money() {
        let mut window = sized(0.0, 150.0);
        window.material_mut(1).unit_price = 500.0;
        window.selected_material = Some(1);

        let costs = derive_costs(&window);
        assert_eq!(costs.area_tsai, 0.0);
        assert!(costs.option_totals.iter().all(|t| t.total == 0.0));
        assert_eq!(costs.selected_material_cost, 0.0);
        assert_eq!(costs.grand_total, 0.0);
    }

    #[test]
    fn test_all_options_are_priced() {
        let mut window = sized(100.0, 150.0);
        window.material_mut(1).unit_price = 100.0;
        window.material_mut(2).unit_price = 200.0;
        window.material_mut(3).unit_price = 300.0;

        let costs = derive_costs(&window);
        let totals: Vec<f64> = costs.option_totals.iter().map(|t| t.total.round()).collect();
        assert_eq!(totals, vec![1634.0, 3268.0, 4902.0]);
        // Nothing selected yet
        assert_eq!(costs.selected_material_cost, 0.0);
        assert_eq!(costs.selected_unit_price, 0.0);
    }

    #[test]
    fn test_no_selection_still_charges_install() {
        let mut window = sized(100.0, 150.0);
        window.material_mut(2).unit_price = 800.0;
        window.install_method = InstallMethod::Ceiling;
        window.ceiling_mount_cost = 450.0;
        window.wall_mount_cost = 300.0;

        let costs = derive_costs(&window);
        assert_eq!(costs.selected_material_cost, 0.0);
        assert_eq!(costs.install_cost, 450.0);
        assert_eq!(costs.grand_total, 450.0);
    }

    #[test]
    fn test_other_install_method_is_free() {
        let mut window = sized(100.0, 150.0);
        window.install_method = InstallMethod::Other;
        window.wall_mount_cost = 300.0;
        window.ceiling_mount_cost = 450.0;

        assert_eq!(derive_costs(&window).install_cost, 0.0);
    }

    #[test]
    fn test_selection_of_missing_option_costs_nothing() {
        let mut window = sized(100.0, 150.0);
        window.material_mut(1).unit_price = 500.0;
        window.selected_material = Some(9);

        let costs = derive_costs(&window);
        assert_eq!(costs.selected_material_cost, 0.0);
        assert_eq!(costs.grand_total, 0.0);
    }

    #[test]
    fn test_negative_typed_inputs_are_clamped() {
        let mut window = sized(-100.0, 150.0);
        window.material_mut(1).unit_price = -500.0;
        window.selected_material = Some(1);
        window.install_method = InstallMethod::Wall;
        window.wall_mount_cost = -300.0;

        let costs = derive_costs(&window);
        assert_eq!(costs.area_tsai, 0.0);
        assert_eq!(costs.grand_total, 0.0);

        window.width_cm = 100.0;
        let costs = derive_costs(&window);
        assert!(costs.grand_total >= 0.0);
        assert_eq!(costs.selected_unit_price, 0.0);
    }

    #[test]
    fn test_recompute_writes_back() {
        let mut window = sized(100.0, 150.0);
        window.install_method = InstallMethod::Wall;
        window.wall_mount_cost = 250.4;

        let updated = recompute(&mut window);
        assert_eq!(updated.costs.grand_total, 250.0);
        assert_eq!(window.costs, derive_costs(&window));
    }
}
