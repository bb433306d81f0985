//! Per-document layouts: which payload fields each document shows, under
//! which labels, and in what order.
//!
//! A field whose value is empty is left out entirely. The two exceptions
//! carry sentinels instead: the site photo prints `未選擇檔案` and the
//! curtain box prints `無`.

use serde::{Deserialize, Serialize};

use crate::units::{format_currency, format_plain};
use crate::window::WindowRecord;

use super::{DocumentKind, DocumentPayload};

/// Heading suffix used when a window has no floor/space entered.
const UNNAMED_SPACE: &str = "未指定空間";

/// Shown as the material when none is selected.
const NO_MATERIAL: &str = "未選擇";

/// One `label: value` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub label: String,
    pub value: String,
}

impl Line {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Line {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// The block printed for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub window_id: u32,
    pub heading: String,
    pub lines: Vec<Line>,
    /// Price rows (quote only; empty elsewhere)
    pub pricing: Vec<Line>,
}

/// A laid-out document, ready for any renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentView {
    pub kind: DocumentKind,
    pub shop_name: String,
    pub title: String,
    pub header: Vec<Line>,
    pub sections: Vec<Section>,
    /// Heading over the closing lines, if any
    pub closing_heading: Option<String>,
    pub closing: Vec<Line>,
    /// Emphasised grand total (quote only)
    pub total: Option<Line>,
}

/// Build the view of `kind` from a payload.
pub fn layout(payload: &DocumentPayload, kind: DocumentKind) -> DocumentView {
    let name = if payload.project.name.is_empty() {
        "專案"
    } else {
        payload.project.name.as_str()
    };

    let mut view = DocumentView {
        kind,
        shop_name: payload.shop.shop_name.clone(),
        title: format!("{} - {}", kind.title(), name),
        header: Vec::new(),
        sections: Vec::new(),
        closing_heading: None,
        closing: Vec::new(),
        total: None,
    };

    match kind {
        DocumentKind::Quote => quote(payload, &mut view),
        DocumentKind::FactoryOrder => factory_order(payload, &mut view),
        DocumentKind::InstallOrder => install_order(payload, &mut view),
    }

    view
}

fn quote(payload: &DocumentPayload, view: &mut DocumentView) {
    let info = &payload.project;
    let currency = payload.shop.currency_symbol.as_str();

    push(&mut view.header, "專案名稱/地址", &info.name);
    push(&mut view.header, "丈量日期", &info.measure_date);
    push(&mut view.header, "丈量人員", &info.surveyor);

    for window in &payload.windows {
        let mut lines = Vec::new();
        push_dimension(&mut lines, "窗戶寬度", window.width_cm, " cm");
        push_dimension(&mut lines, "窗戶高度", window.height_cm, " cm");
        lines.push(Line::new("計算面積", format!("{:.2} 才", window.costs.area_tsai)));
        lines.push(Line::new("窗簾盒", window.curtain_box.describe()));
        lines.push(Line::new("安裝位置", window.mount_type.label()));
        push(&mut lines, "窗簾種類", &window.curtain_type);
        push(&mut lines, "開法", &window.opening_style);
        push(&mut lines, "軌道種類", &window.track_info);
        push(&mut lines, "布料型號", &window.fabric_model);
        push(&mut lines, "紗料", &window.sheer_info);
        push(&mut lines, "電源需求", &window.power_requirement);
        push(&mut lines, "備註(此窗)", &window.remarks);

        let costs = &window.costs;
        let material = window
            .selected_option()
            .map(|m| m.label.clone())
            .unwrap_or_else(|| NO_MATERIAL.to_string());
        let unit_price = if costs.selected_unit_price > 0.0 {
            format!("{} /才", format_plain(costs.selected_unit_price))
        } else {
            "-".to_string()
        };
        let pricing = vec![
            Line::new("選用材質", material),
            Line::new("材質單價", unit_price),
            Line::new("材質小計", money(currency, costs.selected_material_cost)),
            Line::new("安裝方式", window.install_method.label()),
            Line::new("安裝加價", money(currency, costs.install_cost)),
            Line::new("窗戶小計", money(currency, costs.grand_total)),
        ];

        view.sections.push(Section {
            window_id: window.id,
            heading: heading("", window),
            lines,
            pricing,
        });
    }

    view.closing_heading = Some("整體備註與提醒".to_string());
    push(&mut view.closing, "專案備註(現場狀況)", &info.remarks);
    push(&mut view.closing, "施工提醒", &info.install_reminder);
    view.total = Some(Line::new("總計金額", money(currency, payload.total)));
}

fn factory_order(payload: &DocumentPayload, view: &mut DocumentView) {
    let info = &payload.project;
    view.header.push(Line::new("下單日期", payload.issued_on.format("%Y-%m-%d").to_string()));

    for window in &payload.windows {
        let mut lines = Vec::new();
        push(&mut lines, "製作標示 (樓層/空間)", &window.floor_space);
        push_dimension(&mut lines, "窗戶寬度(cm)", window.width_cm, "");
        push_dimension(&mut lines, "窗戶高度(cm)", window.height_cm, "");
        lines.push(Line::new("安裝位置", window.mount_type.label()));
        lines.push(Line::new("軌道依據 (窗簾盒)", window.curtain_box.describe()));
        push(&mut lines, "產品分類 (窗簾種類)", &window.curtain_type);
        push(&mut lines, "製作參數 (開法)", &window.opening_style);
        push(&mut lines, "核心資訊 (布料/布號)", &window.fabric_model);
        push(&mut lines, "核心資訊 (紗料/紗號)", &window.sheer_info);
        push(&mut lines, "軌道加工 (種類/顏色)", &window.track_info);
        lines.push(Line::new("配件選擇 (安裝方式)", window.install_method.label()));
        push(&mut lines, "關鍵製作 (電源需求)", &window.power_requirement);
        push(&mut lines, "備註(此窗)", &window.remarks);
        push(&mut lines, "工廠備註", &window.factory_notes);

        view.sections.push(Section {
            window_id: window.id,
            heading: heading("生產項目: ", window),
            lines,
            pricing: Vec::new(),
        });
    }

    push(&mut view.closing, "整體工廠備註", &info.factory_notes);
}

fn install_order(payload: &DocumentPayload, view: &mut DocumentView) {
    let info = &payload.project;
    push(&mut view.header, "專案地址", &info.name);
    push(&mut view.header, "丈量日期", &info.measure_date);
    push(&mut view.header, "丈量人員", &info.surveyor);

    for window in &payload.windows {
        let mut lines = Vec::new();
        push(&mut lines, "位置 (樓層/空間)", &window.floor_space);
        lines.push(Line::new("辨識 (現場照片)", window.site_photo_name()));
        push_dimension(&mut lines, "用料核對 (寬度cm)", window.width_cm, "");
        push_dimension(&mut lines, "用料核對 (高度cm)", window.height_cm, "");
        lines.push(Line::new("安裝位置(框)", window.mount_type.label()));
        lines.push(Line::new("安裝確認 (窗簾盒)", window.curtain_box.describe()));
        push(&mut lines, "安裝項目 (窗簾種類)", &window.curtain_type);
        push(&mut lines, "安裝方向 (開法)", &window.opening_style);
        push(&mut lines, "物料核對 (布料/布號)", &window.fabric_model);
        push(&mut lines, "物料核對 (紗料/紗號)", &window.sheer_info);
        push(&mut lines, "物料核對 (軌道種類/顏色)", &window.track_info);
        lines.push(Line::new("施工方式 (安裝方式)", window.install_method.label()));
        push(&mut lines, "現場注意 (備註)", &window.remarks);
        push(&mut lines, "重要提醒 (施工提醒)", &window.install_reminder);
        push(&mut lines, "電動相關 (電源需求)", &window.power_requirement);

        view.sections.push(Section {
            window_id: window.id,
            heading: heading("安裝位置: ", window),
            lines,
            pricing: Vec::new(),
        });
    }

    view.closing_heading = Some("整體備註與提醒".to_string());
    push(&mut view.closing, "專案備註(現場狀況)", &info.remarks);
    push(&mut view.closing, "施工提醒", &info.install_reminder);
}

/// `窗戶 3 (客廳)`, with an optional prefix.
fn heading(prefix: &str, window: &WindowRecord) -> String {
    let space = if window.floor_space.is_empty() {
        UNNAMED_SPACE
    } else {
        window.floor_space.as_str()
    };
    format!("{}{} ({})", prefix, window.title(), space)
}

fn push(lines: &mut Vec<Line>, label: &str, value: &str) {
    if !value.is_empty() {
        lines.push(Line::new(label, value));
    }
}

/// Dimensions of zero were never entered, so they are left out.
fn push_dimension(lines: &mut Vec<Line>, label: &str, value: f64, unit: &str) {
    if value > 0.0 {
        lines.push(Line::new(label, format!("{}{}", format_plain(value), unit)));
    }
}

fn money(currency: &str, amount: f64) -> String {
    format!("{}{}", currency, format_currency(amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::assemble_at;
    use crate::project::{Project, ProjectField};
    use crate::window::WindowField;
    use chrono::NaiveDate;

    fn payload() -> DocumentPayload {
        let mut project = Project::new("松仁路 100 號");
        project.set_info_field(ProjectField::Surveyor, "王小明");
        project.set_info_field(ProjectField::FactoryNotes, "統一用白色軌道");
        project.set_window_field(1, WindowField::FloorSpace, "客廳").unwrap();
        project.set_window_field(1, WindowField::Width, "100").unwrap();
        project.set_window_field(1, WindowField::Height, "150").unwrap();
        project.set_window_field(1, WindowField::MaterialLabel(1), "遮光布").unwrap();
        project.set_window_field(1, WindowField::MaterialUnitPrice(1), "500").unwrap();
        project.select_material(1, Some(1)).unwrap();
        project.set_window_field(1, WindowField::InstallMethod, "wall").unwrap();
        project.set_window_field(1, WindowField::WallMountCost, "300").unwrap();
        project.add_window();

        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        assemble_at(&project.info, &project.windows, date).with_shop(&project.settings)
    }

    fn find<'a>(lines: &'a [Line], label: &str) -> Option<&'a str> {
        lines.iter().find(|l| l.label == label).map(|l| l.value.as_str())
    }

    #[test]
    fn test_quote_pricing_block() {
        let view = layout(&payload(), DocumentKind::Quote);
        assert_eq!(view.title, "報價單 - 松仁路 100 號");
        assert_eq!(view.sections.len(), 2);

        let first = &view.sections[0];
        assert_eq!(first.heading, "窗戶 1 (客廳)");
        assert_eq!(find(&first.lines, "計算面積"), Some("16.34 才"));
        assert_eq!(find(&first.lines, "窗戶寬度"), Some("100 cm"));
        assert_eq!(find(&first.pricing, "選用材質"), Some("遮光布"));
        assert_eq!(find(&first.pricing, "材質單價"), Some("500 /才"));
        assert_eq!(find(&first.pricing, "材質小計"), Some("$8,170"));
        assert_eq!(find(&first.pricing, "安裝方式"), Some("牆裝"));
        assert_eq!(find(&first.pricing, "窗戶小計"), Some("$8,470"));

        let second = &view.sections[1];
        assert_eq!(second.heading, "窗戶 2 (未指定空間)");
        assert_eq!(find(&second.pricing, "選用材質"), Some("未選擇"));
        assert_eq!(find(&second.pricing, "材質單價"), Some("-"));

        assert_eq!(view.total, Some(Line::new("總計金額", "$8,470")));
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let view = layout(&payload(), DocumentKind::Quote);
        let second = &view.sections[1];
        assert!(find(&second.lines, "窗戶寬度").is_none());
        assert!(find(&second.lines, "開法").is_none());
        assert!(find(&view.header, "丈量日期").is_none());
        assert_eq!(find(&view.header, "丈量人員"), Some("王小明"));
        // Sentinels stay
        assert_eq!(find(&second.lines, "窗簾盒"), Some("無"));
    }

    #[test]
    fn test_factory_order_has_no_prices() {
        let view = layout(&payload(), DocumentKind::FactoryOrder);
        assert_eq!(view.title, "工廠下單單 - 松仁路 100 號");
        assert_eq!(find(&view.header, "下單日期"), Some("2026-03-14"));
        assert!(view.total.is_none());
        assert!(view.sections.iter().all(|s| s.pricing.is_empty()));
        assert_eq!(view.sections[0].heading, "生產項目: 窗戶 1 (客廳)");
        assert_eq!(find(&view.sections[0].lines, "窗戶寬度(cm)"), Some("100"));
        assert_eq!(find(&view.closing, "整體工廠備註"), Some("統一用白色軌道"));
    }

    #[test]
    fn test_install_order_sentinels() {
        let view = layout(&payload(), DocumentKind::InstallOrder);
        assert!(view.total.is_none());
        let first = &view.sections[0];
        assert_eq!(first.heading, "安裝位置: 窗戶 1 (客廳)");
        assert_eq!(find(&first.lines, "辨識 (現場照片)"), Some("未選擇檔案"));
        assert_eq!(find(&first.lines, "安裝確認 (窗簾盒)"), Some("無"));
        assert_eq!(find(&first.lines, "施工方式 (安裝方式)"), Some("牆裝"));
        assert_eq!(find(&view.header, "專案地址"), Some("松仁路 100 號"));
    }

    #[test]
    fn test_untitled_project() {
        let project = Project::default();
        let view = layout(&assemble_at(&project.info, &project.windows, NaiveDate::MIN), DocumentKind::InstallOrder);
        assert_eq!(view.title, "安裝施工單 - 專案");
        assert!(view.header.is_empty());
    }
}
