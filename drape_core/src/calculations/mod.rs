//! # Pricing Calculations
//!
//! Each calculation is a pure function over serializable records:
//!
//! - [`window`] - area, per-option material totals, install cost and grand
//!   total for a single window
//! - [`total`] - project total across all windows
//!
//! The collection in [`crate::collection`] calls both after every edit, so
//! callers rarely need them directly.

pub mod total;
pub mod window;

pub use total::aggregate;
pub use window::{derive_costs, recompute};
