//! # Field Reader
//!
//! Turns raw form text into typed values. Every reader is total: absent,
//! malformed or negative input degrades to a default instead of an error,
//! so each keystroke still produces a renderable window.
//!
//! Exclusive-choice groups (radio groups) are read through a [`ChoiceScope`]
//! that belongs to one window, so two windows with a same-named group never
//! see each other's selection.
//!
//! ```rust
//! use drape_core::fields::{read_number, read_string, ChoiceScope};
//!
//! assert_eq!(read_number(Some(" 120.5cm"), 0.0), 120.5);
//! assert_eq!(read_number(Some("-3"), 0.0), 0.0);
//! assert_eq!(read_string(Some("  2F 主臥 ")), "2F 主臥");
//!
//! let mut scope = ChoiceScope::default();
//! scope.select("mount_type", "inside");
//! assert_eq!(scope.read("mount_type"), "inside");
//! assert_eq!(scope.read("curtain_box"), "");
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Shown when no file has been chosen.
pub const NO_FILE_CHOSEN: &str = "未選擇檔案";

/// Parse a non-negative number from form text.
///
/// Leading whitespace is skipped and the longest numeric prefix is used
/// (`"120cm"` reads as `120`). Returns `default` for absent, unparseable,
/// non-finite or negative input.
pub fn read_number(raw: Option<&str>, default: f64) -> f64 {
    let Some(raw) = raw else {
        return default;
    };

    match leading_number(raw) {
        Some(value) if value.is_finite() && value >= 0.0 => value,
        _ => default,
    }
}

/// Trimmed text, or an empty string when absent.
pub fn read_string(raw: Option<&str>) -> String {
    raw.map(|s| s.trim().to_string()).unwrap_or_default()
}

/// Display name of a chosen file, or [`NO_FILE_CHOSEN`].
pub fn read_file_name(path: Option<&Path>) -> String {
    path.and_then(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| NO_FILE_CHOSEN.to_string())
}

/// Read the selected value of `group` within one window's scope.
pub fn read_choice(scope: &ChoiceScope, group: &str) -> String {
    scope.read(group)
}

/// Parse a yes/no choice (`yes`, `true`, `1`, `有` are yes).
pub fn read_flag(raw: &str) -> bool {
    matches!(raw.trim().to_lowercase().as_str(), "yes" | "y" | "true" | "1" | "on" | "有")
}

/// Parse a material selection: a positive option number, or `None` for
/// empty / `none` / anything unparseable.
pub fn read_selection(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let raw = raw.strip_prefix("mat").unwrap_or(raw);
    raw.parse::<u32>().ok().filter(|index| *index > 0)
}

/// Longest prefix of `raw` (after leading whitespace) that parses as a float.
fn leading_number(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when followed by at least one digit
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Selected values of the exclusive-choice groups inside one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceScope {
    selected: BTreeMap<String, String>,
}

impl ChoiceScope {
    /// Mark `value` as the checked option of `group`, replacing any other.
    pub fn select(&mut self, group: impl Into<String>, value: impl Into<String>) {
        self.selected.insert(group.into(), value.into());
    }

    /// Uncheck every option of `group`.
    pub fn clear(&mut self, group: &str) {
        self.selected.remove(group);
    }

    /// The checked value of `group`, or an empty string.
    pub fn read(&self, group: &str) -> String {
        self.selected
            .get(group)
            .map(|v| v.trim().to_string())
            .unwrap_or_default()
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selected.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
