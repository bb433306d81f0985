//! Application settings shared by the GUI and CLI.
//!
//! Read with the `config` crate from an optional `Drapeline.toml` in the
//! working directory (or an explicit file), then overridden by `DRAPELINE_*`
//! environment variables:
//!
//! ```toml
//! output_dir = "exports"
//! font_dirs = ["/usr/share/fonts/opentype/noto"]
//! user_id = "lin"
//! ```
//!
//! `DRAPELINE_FONT_DIRS` takes a comma-separated list.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CalcError, CalcResult};
use crate::file_io::default_user_id;
use crate::pdf::FontSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Where exported documents are written
    pub output_dir: PathBuf,
    /// Extra font directories searched before the bundled fonts
    pub font_dirs: Vec<PathBuf>,
    /// Lock owner name; the OS user when unset
    pub user_id: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            output_dir: PathBuf::from("."),
            font_dirs: Vec::new(),
            user_id: None,
        }
    }
}

impl AppSettings {
    /// Load settings from `Drapeline.toml` (or `file`, which must exist)
    /// and the environment.
    pub fn load(file: Option<&Path>) -> CalcResult<Self> {
        let mut builder = Config::builder();
        builder = match file {
            Some(path) => builder.add_source(ConfigFile::from(path).required(true)),
            None => builder.add_source(ConfigFile::with_name("Drapeline").required(false)),
        };

        let settings = builder
            .add_source(
                Environment::with_prefix("DRAPELINE")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("font_dirs"),
            )
            .build()
            .and_then(|config| config.try_deserialize::<AppSettings>())
            .map_err(|e| {
                let source = file.map(|p| p.display().to_string()).unwrap_or_else(|| "Drapeline.toml".to_string());
                CalcError::file_error("read settings", source, e.to_string())
            })?;

        debug!(?settings, "Loaded settings");
        Ok(settings)
    }

    /// Name recorded in lock files.
    pub fn lock_user(&self) -> String {
        self.user_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(default_user_id)
    }

    /// Fonts for PDF rendering.
    pub fn fonts(&self) -> FontSet {
        if self.font_dirs.is_empty() {
            FontSet::bundled()
        } else {
            FontSet::with_dirs(&self.font_dirs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.output_dir, PathBuf::from("."));
        assert!(settings.font_dirs.is_empty());
        assert!(!settings.lock_user().is_empty());
    }

    #[test]
    fn test_load_explicit_file() {
        let path = std::env::temp_dir().join(format!("drapeline_settings_{}.toml", std::process::id()));
        fs::write(&path, "output_dir = \"exports\"\nfont_dirs = [\"/fonts/noto\"]\nuser_id = \"lin\"\n").unwrap();

        let settings = AppSettings::load(Some(&path)).unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("exports"));
        assert_eq!(settings.font_dirs, vec![PathBuf::from("/fonts/noto")]);
        assert_eq!(settings.lock_user(), "lin");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let missing = Path::new("/nonexistent/Drapeline.toml");
        assert!(matches!(AppSettings::load(Some(missing)), Err(CalcError::FileError { .. })));
    }
}
