//! Theme Preference
//!
//! The dashboard's single persisted value: the light/dark theme, kept under
//! one key in a small JSON preferences file. Read once when the preference is
//! created, written through on every change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

/// Key under which the theme is stored
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(ThemeError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("Unknown theme: {0}")]
    Unknown(String),

    #[error("Failed to access preferences file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key/value storage for UI preferences
pub trait ThemeStore: Send + Sync {
    /// Raw stored value, if any
    fn load(&self) -> Option<String>;

    fn save(&self, value: &str) -> Result<(), ThemeError>;
}

/// Preferences persisted as a JSON object in a file.
///
/// Other keys in the file are preserved on write.
pub struct FileThemeStore {
    path: PathBuf,
}

impl FileThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    fn io_error(&self, error: std::io::Error) -> ThemeError {
        ThemeError::Io {
            path: self.path.clone(),
            error: error.to_string(),
        }
    }
}

impl ThemeStore for FileThemeStore {
    fn load(&self) -> Option<String> {
        self.read_all().remove(THEME_KEY)
    }

    fn save(&self, value: &str) -> Result<(), ThemeError> {
        let mut entries = self.read_all();
        entries.insert(THEME_KEY.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let content = serde_json::to_string_pretty(&entries)?;
        std::fs::write(&self.path, content).map_err(|e| self.io_error(e))
    }
}

/// In-process store, used by tests and by hosts without a writable disk
#[derive(Default)]
pub struct MemoryThemeStore {
    value: Mutex<Option<String>>,
}

impl MemoryThemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: &str) -> Self {
        Self {
            value: Mutex::new(Some(value.to_string())),
        }
    }
}

impl ThemeStore for MemoryThemeStore {
    fn load(&self) -> Option<String> {
        self.value.lock().clone()
    }

    fn save(&self, value: &str) -> Result<(), ThemeError> {
        *self.value.lock() = Some(value.to_string());
        Ok(())
    }
}

/// Current theme plus the store it is written through to
pub struct ThemePreference {
    store: Arc<dyn ThemeStore>,
    current: Theme,
}

impl ThemePreference {
    /// Read the stored theme once. Missing or unrecognized values fall back
    /// to [`Theme::Light`].
    pub fn load(store: Arc<dyn ThemeStore>) -> Self {
        let current = match store.load() {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("Ignoring stored theme: {}", e);
                Theme::default()
            }),
            None => Theme::default(),
        };

        Self { store, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Apply and persist a theme.
    ///
    /// The in-memory value changes even if persisting fails.
    pub fn set(&mut self, theme: Theme) -> Result<(), ThemeError> {
        self.current = theme;
        self.store.save(theme.as_str())
    }

    /// Flip between light and dark, returning the applied theme
    pub fn toggle(&mut self) -> Result<Theme, ThemeError> {
        let next = self.current.toggled();
        self.set(next)?;
        Ok(next)
    }
}
