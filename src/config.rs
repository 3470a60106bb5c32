//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults (reproduce the classic `.inp`/`.cor` layout)
//! 2. Global config: `$XDG_CONFIG_HOME/testpp/testpp.toml`
//! 3. Local config: `<test_dir>/.testpp.toml`
//! 4. Environment variables: `TESTPP_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::LineRules;

/// Unified configuration for testpp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Metadata file expected inside the test directory
    pub meta_file: String,
    /// Extension of the judge input file
    pub input_extension: String,
    /// Extension of the expected-output file
    pub expected_extension: String,
    /// Line prefix marking expected-output-only lines
    pub annotation_prefix: String,
    /// Start of a comment; the rest of the line is dropped
    pub comment_marker: String,
    /// Final token written to both files
    pub terminator: String,
    /// Write a blank line after each test block in the expected output too
    pub expected_block_separator: bool,
    /// Reject structures whose ids are not exactly 1..=N
    pub require_contiguous_ids: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            meta_file: "meta.json".into(),
            input_extension: "inp".into(),
            expected_extension: "cor".into(),
            annotation_prefix: "  ".into(),
            comment_marker: ";".into(),
            terminator: "fin".into(),
            expected_block_separator: false,
            require_contiguous_ids: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub meta_file: Option<String>,
    pub input_extension: Option<String>,
    pub expected_extension: Option<String>,
    pub annotation_prefix: Option<String>,
    pub comment_marker: Option<String>,
    pub terminator: Option<String>,
    pub expected_block_separator: Option<bool>,
    pub require_contiguous_ids: Option<bool>,
}

/// Get the XDG config directory for testpp.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "testpp").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("testpp.toml"))
}

/// Get the path to the local config file in a test directory.
pub fn local_config_path(test_dir: &Path) -> PathBuf {
    test_dir.join(".testpp.toml")
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

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Merge overlay config onto self: overlay wins where it says something.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let pick = |o: &Option<String>, base: &String| o.clone().unwrap_or_else(|| base.clone());
        Self {
            meta_file: pick(&overlay.meta_file, &self.meta_file),
            input_extension: pick(&overlay.input_extension, &self.input_extension),
            expected_extension: pick(&overlay.expected_extension, &self.expected_extension),
            annotation_prefix: pick(&overlay.annotation_prefix, &self.annotation_prefix),
            comment_marker: pick(&overlay.comment_marker, &self.comment_marker),
            terminator: pick(&overlay.terminator, &self.terminator),
            expected_block_separator: overlay
                .expected_block_separator
                .unwrap_or(self.expected_block_separator),
            require_contiguous_ids: overlay
                .require_contiguous_ids
                .unwrap_or(self.require_contiguous_ids),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `test_dir` - Optional test directory that may carry a `.testpp.toml`
    pub fn load(test_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), test_dir)
    }

    /// Load settings from an explicit global config path instead of the XDG one.
    ///
    /// `None` skips the global layer; a path that does not exist is ignored.
    pub fn load_layers(
        global_path: Option<&Path>,
        test_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_path {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = test_dir {
            let local_path = local_config_path(dir);
            if local_path.is_file() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.validate()?;
        Ok(current)
    }

    /// Load only a specific file on top of the defaults (no global, no env).
    pub fn load_file(path: &Path) -> Result<Self, ApplicationError> {
        let raw = load_raw_settings(path)?;
        let settings = Self::default().merge_with(&raw);
        settings.validate()?;
        Ok(settings)
    }

    /// Apply TESTPP_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TESTPP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("meta_file") {
            settings.meta_file = val;
        }
        if let Ok(val) = config.get_string("input_extension") {
            settings.input_extension = val;
        }
        if let Ok(val) = config.get_string("expected_extension") {
            settings.expected_extension = val;
        }
        if let Ok(val) = config.get_string("annotation_prefix") {
            settings.annotation_prefix = val;
        }
        if let Ok(val) = config.get_string("comment_marker") {
            settings.comment_marker = val;
        }
        if let Ok(val) = config.get_string("terminator") {
            settings.terminator = val;
        }
        if let Ok(val) = config.get_bool("expected_block_separator") {
            settings.expected_block_separator = val;
        }
        if let Ok(val) = config.get_bool("require_contiguous_ids") {
            settings.require_contiguous_ids = val;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.meta_file.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "meta_file must not be empty".into(),
            });
        }
        if self.input_extension == self.expected_extension {
            return Err(ApplicationError::Config {
                message: format!(
                    "input_extension and expected_extension are both '{}'",
                    self.input_extension
                ),
            });
        }
        Ok(())
    }

    /// Line classification rules derived from these settings.
    pub fn line_rules(&self) -> LineRules {
        LineRules {
            annotation_prefix: self.annotation_prefix.clone(),
            comment_marker: self.comment_marker.clone(),
        }
    }

    /// Render settings as TOML (used by `--show-config`).
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_layout() {
        let s = Settings::default();
        assert_eq!(s.meta_file, "meta.json");
        assert_eq!(s.input_extension, "inp");
        assert_eq!(s.expected_extension, "cor");
        assert_eq!(s.line_rules(), LineRules::default());
        assert_eq!(s.terminator, "fin");
        assert!(!s.expected_block_separator);
        assert!(s.require_contiguous_ids);
    }

    #[test]
    fn test_merge_overlay_only_replaces_specified() {
        let overlay = RawSettings {
            terminator: Some("end".into()),
            expected_block_separator: Some(true),
            ..Default::default()
        };
        let merged = Settings::default().merge_with(&overlay);
        assert_eq!(merged.terminator, "end");
        assert!(merged.expected_block_separator);
        assert_eq!(merged.meta_file, "meta.json");
    }

    #[test]
    fn test_validate_rejects_same_extensions() {
        let s = Settings {
            expected_extension: "inp".into(),
            ..Default::default()
        };
        assert!(s.validate().is_err());
    }
}
