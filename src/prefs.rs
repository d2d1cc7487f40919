//! Persisted interactive defaults.
//!
//! The last accepted username and output file name are stored in a small
//! TOML file under the platform config directory and offered as prompt
//! defaults on the next run. Losing or corrupting the file is harmless;
//! the prompts just come up without defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

const APP_DIR: &str = "gateway-listener";
const PREFS_FILE: &str = "prefs.toml";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Prompt defaults remembered between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub user: Option<String>,
    pub data_file_name: Option<String>,
}

impl Preferences {
    /// Location of the preferences file, when a config directory exists.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(PREFS_FILE))
    }

    /// Load stored preferences, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load() -> Self {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&content) {
            Ok(prefs) => prefs,
            Err(error) => {
                warn!(%error, path = %path.display(), "ignoring unreadable preferences");
                Self::default()
            }
        }
    }

    /// Persist the preferences for the next run.
    pub fn save(&self) -> Result<(), PrefsError> {
        match Self::path() {
            Some(path) => self.save_to(&path),
            None => Ok(()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), PrefsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.toml");
        let prefs = Preferences {
            user: Some("user@example.com".to_string()),
            data_file_name: Some("scan.csv".to_string()),
        };

        prefs.save_to(&path).unwrap();
        assert_eq!(Preferences::load_from(&path), prefs);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let prefs = Preferences::load_from(&dir.path().join("absent.toml"));
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn test_garbage_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "not = [valid").unwrap();

        let prefs = Preferences::load_from(&path);
        assert_eq!(prefs, Preferences::default());
    }

    #[test]
    fn test_partial_file_fills_missing_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        fs::write(&path, "user = \"user@example.com\"\n").unwrap();

        let prefs = Preferences::load_from(&path);
        assert_eq!(prefs.user.as_deref(), Some("user@example.com"));
        assert_eq!(prefs.data_file_name, None);
    }
}
