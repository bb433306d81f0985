//! # drape_core - Curtain Survey and Pricing Engine
//!
//! `drape_core` is the engine behind Drapeline, the on-site form a curtain
//! shop uses to measure windows, price fabric options and print the quote,
//! factory order and install order from one survey. All types are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Forgiving input**: raw form text never fails; bad numbers read as zero
//! - **Always current**: every edit recomputes the window and project total
//!   before it returns
//! - **JSON-First**: all types implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use drape_core::documents::{render_text, DocumentKind};
//! use drape_core::project::Project;
//! use drape_core::window::WindowField;
//!
//! let mut project = Project::new("松仁路 100 號");
//! project.set_window_field(1, WindowField::Width, "100").unwrap();
//! project.set_window_field(1, WindowField::Height, "150").unwrap();
//! project.set_window_field(1, WindowField::MaterialUnitPrice(1), "500").unwrap();
//! project.select_material(1, Some(1)).unwrap();
//! project.set_window_field(1, WindowField::InstallMethod, "wall").unwrap();
//! project.set_window_field(1, WindowField::WallMountCost, "300").unwrap();
//!
//! assert_eq!(project.total(), 8470.0);
//! let quote = render_text(&project.document(DocumentKind::Quote));
//! assert!(quote.contains("總計金額: $8,470"));
//! ```
//!
//! ## Modules
//!
//! - [`project`] - Project container, site info and shop settings
//! - [`window`] - Window records and the form field vocabulary
//! - [`collection`] - Ordered windows with stable ids and the project total
//! - [`fields`] - Raw form text readers
//! - [`calculations`] - Area, material, install and total pricing
//! - [`documents`] - Quote, factory order and install order layouts
//! - [`pdf`] - Typst-based PDF rendering
//! - [`form`] - Bulk JSON form import
//! - [`file_io`] - File operations with atomic saves and locking
//! - [`settings`] - Application settings
//! - [`units`] - Type-safe unit wrappers and money formatting
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod collection;
pub mod documents;
pub mod errors;
pub mod fields;
pub mod file_io;
pub mod form;
pub mod pdf;
pub mod project;
pub mod settings;
pub mod units;
pub mod window;

// Re-export commonly used types at crate root for convenience
pub use collection::WindowCollection;
pub use documents::{DocumentKind, DocumentPayload, DocumentView};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_project, save_project, FileLock};
pub use project::{Project, ProjectField, ProjectInfo, ProjectMetadata, ShopSettings};
pub use settings::AppSettings;
pub use window::{WindowField, WindowRecord};
