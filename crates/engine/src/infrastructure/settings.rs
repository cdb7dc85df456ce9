//! Engine settings.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults
//! 2. `storyline.{toml,json,yaml}` in the working directory (optional), or an
//!    explicit file passed to [`Settings::from_file`]
//! 3. `STORYLINE_*` environment variables (e.g. `STORYLINE_CALENDARS_DIR`),
//!    after loading `.env` through `dotenvy`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

/// Default `tracing` filter when neither the settings nor `RUST_LOG` set one.
pub const DEFAULT_LOG_FILTER: &str = "storyline_engine=info,storyline_domain=info";

const DEFAULT_SETTINGS_FILE: &str = "storyline";
const ENV_PREFIX: &str = "STORYLINE";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Directory of user-defined calendar files, loaded on top of the built-ins
    pub calendars_dir: Option<PathBuf>,
    /// Log and skip calendar files that fail to load instead of aborting
    pub skip_invalid_calendars: bool,
    pub log_filter: String,
}

impl Settings {
    /// Loads settings from `.env`, the optional `storyline.*` file, and the environment.
    ///
    /// # Errors
    /// Returns an error if a source cannot be read or a value has the wrong type.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_sources(
            File::with_name(DEFAULT_SETTINGS_FILE).required(false),
            environment(),
        )
    }

    /// Loads settings from an explicit file, still honouring environment overrides.
    ///
    /// # Errors
    /// Returns an error if the file is missing or malformed.
    pub fn from_file(path: &Path) -> Result<Self> {
        dotenvy::dotenv().ok();

        Self::from_sources(File::from(path), environment())
            .with_context(|| format!("loading settings from {}", path.display()))
    }

    fn from_sources<S>(file: S, environment: Environment) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = Config::builder()
            .set_default("skip_invalid_calendars", false)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .add_source(file)
            .add_source(environment)
            .build()?
            .try_deserialize::<Settings>()?;

        tracing::debug!(
            calendars_dir = ?settings.calendars_dir,
            skip_invalid_calendars = settings.skip_invalid_calendars,
            "Settings loaded"
        );

        Ok(settings)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .ignore_empty(true)
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn settings_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn isolated_env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(map))
    }

    #[test]
    fn defaults_apply_to_empty_file() {
        let file = settings_file("");
        let settings = Settings::from_sources(File::from(file.path()), isolated_env(&[])).unwrap();

        assert!(settings.calendars_dir.is_none());
        assert!(!settings.skip_invalid_calendars);
        assert_eq!(settings.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn file_values_override_defaults() {
        let file = settings_file(
            r#"
            calendars_dir = "/srv/calendars"
            skip_invalid_calendars = true
            log_filter = "storyline_engine=debug"
            "#,
        );
        let settings = Settings::from_sources(File::from(file.path()), isolated_env(&[])).unwrap();

        assert_eq!(settings.calendars_dir, Some(PathBuf::from("/srv/calendars")));
        assert!(settings.skip_invalid_calendars);
        assert_eq!(settings.log_filter, "storyline_engine=debug");
    }

    #[test]
    fn environment_overrides_file() {
        let file = settings_file("skip_invalid_calendars = false");
        let env = isolated_env(&[
            ("STORYLINE_SKIP_INVALID_CALENDARS", "true"),
            ("STORYLINE_CALENDARS_DIR", "/tmp/calendars"),
        ]);
        let settings = Settings::from_sources(File::from(file.path()), env).unwrap();

        assert!(settings.skip_invalid_calendars);
        assert_eq!(settings.calendars_dir, Some(PathBuf::from("/tmp/calendars")));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }

    #[test]
    fn wrong_type_is_an_error() {
        let file = settings_file("skip_invalid_calendars = \"sometimes\"");
        assert!(Settings::from_sources(File::from(file.path()), isolated_env(&[])).is_err());
    }
}
