//! # Error Types
//!
//! Structured error types for drape_core. Form input never produces an error
//! (bad numbers degrade to zero, see [`crate::fields`]); these variants cover
//! structural edits that are refused and the ambient file/render failures.
//!
//! ## Example
//!
//! ```rust
//! use drape_core::errors::{CalcError, CalcResult};
//!
//! fn check_remaining(count: usize) -> CalcResult<()> {
//!     if count <= 1 {
//!         return Err(CalcError::LastWindow);
//!     }
//!     Ok(())
//! }
//!
//! assert_eq!(check_remaining(1).unwrap_err().error_code(), "LAST_WINDOW");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for drape_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for project operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (used for non-form inputs such as CLI arguments)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Attempt to delete the only remaining window
    #[error("至少需要保留一個窗戶資訊區塊 (at least one window must remain)")]
    LastWindow,

    /// No window with this identifier exists in the collection
    #[error("Window not found: {id}")]
    WindowNotFound { id: u32 },

    /// A field name that is not part of the window or project form
    #[error("Unknown field: {name}")]
    UnknownField { name: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Document could not be compiled or rendered
    #[error("Render failed: {stage} - {reason}")]
    RenderFailed { stage: String, reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a WindowNotFound error
    pub fn window_not_found(id: u32) -> Self {
        CalcError::WindowNotFound { id }
    }

    /// Create an UnknownField error
    pub fn unknown_field(name: impl Into<String>) -> Self {
        CalcError::UnknownField { name: name.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a RenderFailed error
    pub fn render_failed(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::RenderFailed {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Whether this error is a refused edit that should be shown as a notice
    /// rather than a failure.
    pub fn is_user_notice(&self) -> bool {
        matches!(self, CalcError::LastWindow)
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::LastWindow => "LAST_WINDOW",
            CalcError::WindowNotFound { .. } => "WINDOW_NOT_FOUND",
            CalcError::UnknownField { .. } => "UNKNOWN_FIELD",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::RenderFailed { .. } => "RENDER_FAILED",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError { reason: e.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::window_not_found(7);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("WindowNotFound"));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::LastWindow.error_code(), "LAST_WINDOW");
        assert_eq!(CalcError::unknown_field("colour").error_code(), "UNKNOWN_FIELD");
        assert_eq!(CalcError::render_failed("compile", "bad").error_code(), "RENDER_FAILED");
    }

    #[test]
    fn test_notice_classification() {
        assert!(CalcError::LastWindow.is_user_notice());
        assert!(!CalcError::window_not_found(1).is_user_notice());
        assert!(CalcError::file_locked("a.drp", "amy", "now").is_recoverable());
    }
}
