//! # Documents
//!
//! Turns the current project state into printable documents. Assembly is a
//! read-only snapshot: it copies what the collection already holds and never
//! recomputes.
//!
//! ```text
//! Project ──assemble──▶ DocumentPayload ──layout(kind)──▶ DocumentView
//!                                                          ├─▶ render_text (preview)
//!                                                          └─▶ pdf::render_document_pdf
//! ```
//!
//! ## Example
//!
//! ```rust
//! use drape_core::documents::{assemble, layout, render_text, DocumentKind};
//! use drape_core::project::Project;
//! use drape_core::window::WindowField;
//!
//! let mut project = Project::new("松仁路 100 號");
//! project.set_window_field(1, WindowField::Width, "100").unwrap();
//!
//! let payload = assemble(&project.info, &project.windows);
//! let view = layout(&payload, DocumentKind::FactoryOrder);
//! assert!(render_text(&view).contains("窗戶寬度(cm): 100"));
//! ```

pub mod layout;
pub mod text;

use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::collection::WindowCollection;
use crate::errors::CalcError;
use crate::project::{Project, ProjectInfo, ShopSettings};
use crate::window::WindowRecord;

pub use layout::{layout, DocumentView, Line, Section};
pub use text::render_text;

/// The three documents produced from a survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Customer quote with prices (報價單)
    Quote,
    /// Production order for the factory (工廠下單單)
    FactoryOrder,
    /// Work order for the install crew (安裝施工單)
    InstallOrder,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Quote,
        DocumentKind::FactoryOrder,
        DocumentKind::InstallOrder,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            DocumentKind::Quote => "quote",
            DocumentKind::FactoryOrder => "factory",
            DocumentKind::InstallOrder => "install",
        }
    }

    /// Printed document title
    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::Quote => "報價單",
            DocumentKind::FactoryOrder => "工廠下單單",
            DocumentKind::InstallOrder => "安裝施工單",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentKind::Quote => "Quote",
            DocumentKind::FactoryOrder => "Factory Order",
            DocumentKind::InstallOrder => "Install Order",
        }
    }

    /// Whether prices appear on this document
    pub fn shows_prices(&self) -> bool {
        matches!(self, DocumentKind::Quote)
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for DocumentKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "quote" | "報價單" => Ok(DocumentKind::Quote),
            "factory" | "factory-order" | "工廠下單單" => Ok(DocumentKind::FactoryOrder),
            "install" | "install-order" | "安裝施工單" => Ok(DocumentKind::InstallOrder),
            other => Err(CalcError::invalid_input(
                "document",
                other,
                "expected quote, factory or install",
            )),
        }
    }
}

/// Snapshot of everything a document can show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub project: ProjectInfo,
    pub shop: ShopSettings,
    /// Date printed as the order/issue date
    pub issued_on: NaiveDate,
    /// Raw and derived fields of every window, in collection order
    pub windows: Vec<WindowRecord>,
    /// Project total at assembly time
    pub total: f64,
}

impl DocumentPayload {
    /// Attach shop details for document headers.
    pub fn with_shop(mut self, shop: &ShopSettings) -> Self {
        self.shop = shop.clone();
        self
    }
}

/// Snapshot the project for document generation, dated today.
pub fn assemble(project: &ProjectInfo, windows: &WindowCollection) -> DocumentPayload {
    assemble_at(project, windows, Local::now().date_naive())
}

/// Snapshot the project with an explicit issue date.
pub fn assemble_at(project: &ProjectInfo, windows: &WindowCollection, issued_on: NaiveDate) -> DocumentPayload {
    DocumentPayload {
        project: project.clone(),
        shop: ShopSettings::default(),
        issued_on,
        windows: windows.windows().to_vec(),
        total: windows.total(),
    }
}

impl Project {
    /// Assemble this project's payload, including shop settings.
    pub fn document_payload(&self) -> DocumentPayload {
        assemble(&self.info, &self.windows).with_shop(&self.settings)
    }

    /// Lay out one document for this project.
    pub fn document(&self, kind: DocumentKind) -> DocumentView {
        layout(&self.document_payload(), kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::WindowField;

    fn sample_project() -> Project {
        let mut project = Project::new("松仁路 100 號");
        project.set_window_field(1, WindowField::Width, "100").unwrap();
        project.set_window_field(1, WindowField::Height, "150").unwrap();
        project.set_window_field(1, WindowField::MaterialUnitPrice(1), "500").unwrap();
        project.select_material(1, Some(1)).unwrap();
        project.set_window_field(1, WindowField::InstallMethod, "wall").unwrap();
        project.set_window_field(1, WindowField::WallMountCost, "300").unwrap();
        project.add_window();
        project
    }

    #[test]
    fn test_payload_snapshots_derived_values() {
        let project = sample_project();
        let payload = assemble(&project.info, &project.windows);

        assert_eq!(payload.windows.len(), 2);
        assert_eq!(payload.windows[0].id, 1);
        assert_eq!(payload.windows[0].costs.area_tsai, 16.34);
        assert_eq!(payload.windows[0].costs.grand_total, 8470.0);
        assert_eq!(payload.windows[1].costs.grand_total, 0.0);
        assert_eq!(payload.total, 8470.0);
    }

    #[test]
    fn test_assembly_does_not_recompute() {
        let project = sample_project();
        // Stale stored value; assembly must report it as-is
        let mut json = serde_json::to_value(&project.windows).unwrap();
        json["windows"][0]["costs"]["grand_total"] = serde_json::json!(1.0);
        let windows: WindowCollection = serde_json::from_value(json).unwrap();

        let payload = assemble(&project.info, &windows);
        assert_eq!(payload.windows[0].costs.grand_total, 1.0);
    }

    #[test]
    fn test_payload_order_follows_collection() {
        let mut project = sample_project();
        project.add_window();
        project.remove_window(2).unwrap();
        let payload = project.document_payload();
        let ids: Vec<u32> = payload.windows.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("quote".parse::<DocumentKind>().unwrap(), DocumentKind::Quote);
        assert_eq!("Factory Order".parse::<DocumentKind>().unwrap(), DocumentKind::FactoryOrder);
        assert_eq!("install".parse::<DocumentKind>().unwrap(), DocumentKind::InstallOrder);
        assert!("invoice".parse::<DocumentKind>().is_err());
        assert!(DocumentKind::Quote.shows_prices());
        assert!(!DocumentKind::InstallOrder.shows_prices());
    }
}
