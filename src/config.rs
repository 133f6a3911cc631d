//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rsenroll/rsenroll.toml`
//! 3. Local config: `./.rsenroll.toml` or the file passed with `--config`
//! 4. Environment variables: `RSENROLL_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::DEFAULT_INSTITUTE_NAME;

/// Name of the local config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".rsenroll.toml";

/// Raw settings for intermediate parsing (fields are Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub institute_name: Option<String>,
    pub log_file: Option<PathBuf>,
    pub file_logging: Option<bool>,
}

/// Unified configuration for rsenroll.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Institute every new student is attached to
    pub institute_name: String,
    /// Append-only record of register operations (default: ./record.txt)
    pub log_file: PathBuf,
    /// Write the record file at all
    pub file_logging: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            institute_name: DEFAULT_INSTITUTE_NAME.to_string(),
            log_file: PathBuf::from("record.txt"),
            file_logging: true,
        }
    }
}

/// Get the XDG config directory for rsenroll.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rsenroll").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rsenroll.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    /// Path of the record file, or `None` when file logging is off.
    pub fn record_file(&self) -> Option<&Path> {
        self.file_logging.then_some(self.log_file.as_path())
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.log_file = expand_path(&self.log_file);
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            institute_name: overlay
                .institute_name
                .clone()
                .unwrap_or_else(|| self.institute_name.clone()),
            log_file: overlay
                .log_file
                .clone()
                .unwrap_or_else(|| self.log_file.clone()),
            file_logging: overlay.file_logging.unwrap_or(self.file_logging),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local` - Explicit local config file. When `None`, `./.rsenroll.toml`
    ///   is used if it exists.
    ///
    /// An explicit `local` file that does not exist is an error.
    pub fn load(local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        match local {
            Some(path) => {
                current = current.merge_with(&load_raw_settings(path)?);
            }
            None => {
                let path = local_config_path(Path::new("."));
                if path.exists() {
                    current = current.merge_with(&load_raw_settings(&path)?);
                }
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply RSENROLL_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("RSENROLL").try_parsing(true))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("institute_name") {
            settings.institute_name = val;
        }
        if let Ok(val) = config.get_string("log_file") {
            settings.log_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_bool("file_logging") {
            settings.file_logging = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# rsenroll configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/rsenroll/rsenroll.toml
#   Local:  ./.rsenroll.toml (or --config <file>)
#   Env:    RSENROLL_* environment variables

# Institute assigned to every new student
# institute_name = "The Kiran Academy"

# Append-only record of register operations
# log_file = "record.txt"

# Set to false to skip the record file
# file_logging = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_defaults_when_created_then_use_kiran_academy_and_record_txt() {
        let settings = Settings::default();
        assert_eq!(settings.institute_name, "The Kiran Academy");
        assert_eq!(settings.record_file(), Some(Path::new("record.txt")));
    }

    #[test]
    fn given_file_logging_disabled_when_asking_record_file_then_none() {
        let settings = Settings {
            file_logging: false,
            ..Settings::default()
        };
        assert_eq!(settings.record_file(), None);
    }

    #[test]
    fn given_tilde_in_log_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            log_file: PathBuf::from("~/logs/record.txt"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let log = settings.log_file.to_string_lossy();
        assert!(log.starts_with(&home), "log_file should start with home: {}", log);
        assert!(!log.contains('~'));
    }

    #[test]
    fn given_partial_overlay_when_merging_then_keeps_unspecified_fields() {
        let base = Settings::default();
        let overlay = RawSettings {
            institute_name: Some("Rust Academy".into()),
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.institute_name, "Rust Academy");
        assert_eq!(merged.log_file, base.log_file);
        assert!(merged.file_logging);
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.institute_name.is_none());
    }

    #[test]
    fn given_settings_when_serializing_then_round_trips_fields() {
        let toml = Settings::default().to_toml().unwrap();
        assert!(toml.contains("institute_name = \"The Kiran Academy\""));
        assert!(toml.contains("file_logging = true"));
    }
}
