//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/bomtree/bomtree.toml`
//! 3. Local config: `<project_dir>/.bomtree.toml`
//! 4. Environment variables: `BOMTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::parents::{LABEL_SEPARATOR, ROOT_LABEL};
use crate::domain::{NewItemTemplate, NodeKind};

/// Raw new-item section for intermediate parsing (every field optional).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawNewItem {
    pub description: Option<String>,
    pub unit: Option<String>,
    pub code_prefix: Option<String>,
    pub quantity: Option<f64>,
    pub kind: Option<NodeKind>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub root_label: Option<String>,
    pub label_separator: Option<String>,
    pub new_item: RawNewItem,
}

/// Unified configuration for bomtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Label of the "no parent" option
    pub root_label: String,
    /// Separator between path segments in parent labels
    pub label_separator: String,
    /// Placeholder values for added nodes
    pub new_item: NewItemTemplate,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            root_label: ROOT_LABEL.into(),
            label_separator: LABEL_SEPARATOR.into(),
            new_item: NewItemTemplate::default(),
        }
    }
}

/// Get the XDG config directory for bomtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "bomtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("bomtree.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".bomtree.toml")
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

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let base = &self.new_item;
        let raw = &overlay.new_item;
        Self {
            root_label: overlay
                .root_label
                .clone()
                .unwrap_or_else(|| self.root_label.clone()),
            label_separator: overlay
                .label_separator
                .clone()
                .unwrap_or_else(|| self.label_separator.clone()),
            new_item: NewItemTemplate {
                description: raw
                    .description
                    .clone()
                    .unwrap_or_else(|| base.description.clone()),
                unit: raw.unit.clone().unwrap_or_else(|| base.unit.clone()),
                code_prefix: raw
                    .code_prefix
                    .clone()
                    .unwrap_or_else(|| base.code_prefix.clone()),
                quantity: raw.quantity.or(base.quantity),
                kind: raw.kind.unwrap_or(base.kind),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.bomtree.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = project_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        Self::apply_env_overrides(current)?.validated()
    }

    /// Reject placeholder values that a node could not hold.
    fn validated(self) -> Result<Self, ApplicationError> {
        if let Some(q) = self.new_item.quantity {
            if !q.is_finite() || q < 0.0 {
                return Err(ApplicationError::Config {
                    message: format!(
                        "new_item.quantity: {q} (expected a non-negative number)"
                    ),
                });
            }
        }
        Ok(self)
    }

    /// Apply BOMTREE_* environment variables as explicit overrides.
    ///
    /// Sections are separated by `__`, e.g. `BOMTREE_NEW_ITEM__UNIT=PC`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("BOMTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("root_label") {
            settings.root_label = val;
        }
        if let Ok(val) = config.get_string("label_separator") {
            settings.label_separator = val;
        }
        if let Ok(val) = config.get_string("new_item.description") {
            settings.new_item.description = val;
        }
        if let Ok(val) = config.get_string("new_item.unit") {
            settings.new_item.unit = val;
        }
        if let Ok(val) = config.get_string("new_item.code_prefix") {
            settings.new_item.code_prefix = val;
        }
        if let Ok(val) = config.get_float("new_item.quantity") {
            settings.new_item.quantity = Some(val);
        }
        if let Ok(val) = config.get_string("new_item.kind") {
            settings.new_item.kind = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("BOMTREE_NEW_ITEM__KIND: {e}"),
            })?;
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
        r#"# bomtree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/bomtree/bomtree.toml
#   Local:  <project_dir>/.bomtree.toml
#   Env:    BOMTREE_* environment variables (BOMTREE_NEW_ITEM__UNIT=PC)

# Label of the "no parent" choice when listing parent options
# root_label = "(root level)"

# Separator between ancestors in parent option labels
# label_separator = " / "

[new_item]
# Placeholder values for nodes created with `bomtree add`
# description = "New Item"
# unit = "EA"
# code_prefix = "NEW-"
# quantity = 1.0
# kind = "part"
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
    fn given_no_config_when_defaults_then_original_placeholders() {
        let settings = Settings::default();
        assert_eq!(settings.root_label, "(root level)");
        assert_eq!(settings.new_item.description, "New Item");
        assert_eq!(settings.new_item.kind, NodeKind::Part);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_given_fields_change() {
        let overlay: RawSettings = toml::from_str(
            r#"
root_label = "(top)"
[new_item]
unit = "PC"
kind = "assembly"
"#,
        )
        .expect("parse overlay");

        let merged = Settings::default().merge_with(&overlay);

        assert_eq!(merged.root_label, "(top)");
        assert_eq!(merged.label_separator, " / ");
        assert_eq!(merged.new_item.unit, "PC");
        assert_eq!(merged.new_item.kind, NodeKind::Assembly);
        assert_eq!(merged.new_item.description, "New Item");
    }

    #[test]
    fn given_negative_or_nan_quantity_when_validating_then_config_error() {
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            let mut settings = Settings::default();
            settings.new_item.quantity = Some(bad);
            assert!(matches!(
                settings.validated(),
                Err(ApplicationError::Config { .. })
            ));
        }
    }

    #[test]
    fn given_zero_or_absent_quantity_when_validating_then_accepted() {
        let mut settings = Settings::default();
        settings.new_item.quantity = Some(0.0);
        assert!(settings.clone().validated().is_ok());
        settings.new_item.quantity = None;
        assert!(settings.validated().is_ok());
    }

    #[test]
    fn given_template_when_parsing_then_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.root_label.is_none());
    }

    #[test]
    fn given_settings_when_to_toml_then_roundtrips() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }
}
