//! UI module for the Drapeline survey form
//!
//! # Panel Structure
//! - `toolbar` - File operations (New, Open, Save, Import, Export PDF)
//! - `items_panel` - Left sidebar: Project Info, window list, total
//! - `input_panel` - Center panel: dispatches to input_* child modules
//! - `results_panel` - Right panel: document tabs and preview
//! - `status_bar` - Bottom status messages
//! - `modal` - Overlay dialogs
//!
//! # Input Panel Children
//! - `input_project_info` - Site details and shop name
//! - `input_window` - Measurements, product details, pricing, notes
//!
//! # Results Panel Children
//! - `result_project_info` - Per-window price summary
//! - `result_document` - Quote / factory order / installation order preview

// Top-level panels
pub mod toolbar;
pub mod items_panel;
pub mod input_panel;
pub mod results_panel;
pub mod status_bar;
pub mod modal;

// Input panel children
pub mod input_project_info;
pub mod input_window;

// Results panel children
pub mod result_project_info;
pub mod result_document;

// Shared form widgets
pub mod shared;
