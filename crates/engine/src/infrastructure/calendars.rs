//! Calendar type registry.
//!
//! Holds the built-in calendars plus any loaded from TOML, JSON, or YAML
//! files. Files deserialize straight into `CalendarType`, so every file goes
//! through the same validation as calendars built in code.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{Config, File};
use storyline_domain::CalendarType;
use thiserror::Error;

use super::settings::Settings;

/// File extensions picked up by [`CalendarRegistry::load_dir`].
const CALENDAR_EXTENSIONS: [&str; 4] = ["toml", "json", "yaml", "yml"];

/// Errors that can occur while loading calendar types.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Calendar file error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Calendar directory not found at {0}")]
    DirectoryNotFound(PathBuf),
    #[error("Calendar type '{0}' is already registered")]
    Duplicate(String),
}

/// Calendar types by name, shared read-only.
///
/// Names are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct CalendarRegistry {
    calendars: HashMap<String, Arc<CalendarType>>,
}

impl CalendarRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in "Human" and "Tantar" calendars.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for calendar in [CalendarType::human(), CalendarType::tantar()] {
            registry
                .calendars
                .insert(key(calendar.name()), Arc::new(calendar));
        }
        registry
    }

    /// Built-ins plus the calendar directory from `settings`, if any.
    pub fn from_settings(settings: &Settings) -> Result<Self, LoadError> {
        let mut registry = Self::with_builtins();
        if let Some(dir) = &settings.calendars_dir {
            registry.load_dir(dir, settings.skip_invalid_calendars)?;
        }
        Ok(registry)
    }

    /// Register a calendar type.
    ///
    /// # Errors
    /// Returns `LoadError::Duplicate` if a calendar with the same name exists.
    pub fn insert(&mut self, calendar: CalendarType) -> Result<Arc<CalendarType>, LoadError> {
        let key = key(calendar.name());
        if self.calendars.contains_key(&key) {
            return Err(LoadError::Duplicate(calendar.name().to_string()));
        }
        let calendar = Arc::new(calendar);
        self.calendars.insert(key, Arc::clone(&calendar));
        Ok(calendar)
    }

    pub fn get(&self, name: &str) -> Option<Arc<CalendarType>> {
        self.calendars.get(&key(name)).cloned()
    }

    /// Calendar names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.calendars.values().map(|c| c.name()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.calendars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calendars.is_empty()
    }

    /// Load and register one calendar file. The format follows the extension.
    pub fn load_file(&mut self, path: &Path) -> Result<Arc<CalendarType>, LoadError> {
        let calendar = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<CalendarType>()?;
        self.insert(calendar)
    }

    /// Load every calendar file in `dir` (not recursive), in file name order.
    ///
    /// With `skip_invalid`, files that fail to load are logged and skipped;
    /// otherwise the first failure aborts. Returns the number loaded.
    pub fn load_dir(&mut self, dir: &Path, skip_invalid: bool) -> Result<usize, LoadError> {
        if !dir.is_dir() {
            return Err(LoadError::DirectoryNotFound(dir.to_path_buf()));
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() && is_calendar_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match self.load_file(&path) {
                Ok(calendar) => {
                    tracing::info!(
                        calendar = calendar.name(),
                        path = %path.display(),
                        "Loaded calendar type"
                    );
                    loaded += 1;
                }
                Err(e) if skip_invalid => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping calendar file");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(loaded)
    }
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn is_calendar_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| CALENDAR_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}
