//! Project configuration.
//!
//! A project directory may hold a `sitewright.toml` that pins choices the
//! classifier and resolvers would otherwise make. Stock defaults are
//! serialized to a TOML value, the user file is merged on top with
//! [`merge_toml`], and the result is deserialized and validated. Command-line
//! flags are applied after that, in `main`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! # archetype = "warm-local"   # skip classification
//! pages = []                   # empty = industry family's page set
//!
//! [theme]
//! dark = false
//! medium = false               # dark wins when both are set
//!
//! [theme.colors]
//! # primary = "#7b4b2a"        # any of the nine color fields
//!
//! [theme.fonts]
//! # heading = "Georgia, serif"
//!
//! [theme.spacing]
//! # border_radius = "8px"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [theme.colors]
//! primary = "#0f766e"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::naming::snake_case;
use crate::site::GenerateOptions;
use crate::theme::{COLOR_FIELDS, ThemeOverrides};
use crate::types::PageKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in a project directory.
pub const CONFIG_FILE: &str = "sitewright.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `sitewright.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub site: SiteSettings,
    pub theme: ThemeOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSettings {
    /// Archetype id used instead of classification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archetype: Option<String>,
    /// Page kinds to build, in navigation order.
    pub pages: Vec<String>,
}

impl ProjectConfig {
    /// Validate values that deserialization alone cannot check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .site
            .archetype
            .as_deref()
            .is_some_and(|a| a.trim().is_empty())
        {
            return Err(ConfigError::Validation(
                "site.archetype must not be empty".into(),
            ));
        }

        let mut seen = BTreeSet::new();
        for name in &self.site.pages {
            let page: PageKind = name.parse().map_err(|_| {
                ConfigError::Validation(format!("site.pages: unknown page kind '{name}'"))
            })?;
            if !seen.insert(page) {
                return Err(ConfigError::Validation(format!(
                    "site.pages: '{name}' is listed twice"
                )));
            }
        }

        for (key, value) in &self.theme.colors {
            if !COLOR_FIELDS.contains(&snake_case(key).as_str()) {
                return Err(ConfigError::Validation(format!(
                    "theme.colors: unknown color field '{key}'"
                )));
            }
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "theme.colors.{key} must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// Requested pages. Names were checked by [`ProjectConfig::validate`].
    pub fn pages(&self) -> Vec<PageKind> {
        self.site
            .pages
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect()
    }

    /// Generation options described by this config.
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            archetype_override: self.site.archetype.clone(),
            theme_overrides: self.theme.clone(),
            ai_content: None,
            pages: self.pages(),
        }
    }
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user files are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ProjectConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `sitewright.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    read_raw_config(&config_path).map(Some)
}

/// Read a config file that must exist.
pub fn read_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ProjectConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ProjectConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `sitewright.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<ProjectConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, load_raw_config(dir)?)
}

/// Load config from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    resolve_config(stock_defaults_value()?, Some(read_raw_config(path)?))
}

/// Returns a fully-commented stock `sitewright.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Sitewright Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site structure
# ---------------------------------------------------------------------------
[site]
# Use this archetype instead of classifying the business.
# Run `sitewright archetypes` for the list.
# archetype = "warm-local"

# Pages to build, in navigation order. Empty builds the page set of the
# business's industry family.
# Known pages: home, menu, services, about, contact, gallery
pages = []

# ---------------------------------------------------------------------------
# Theme
# ---------------------------------------------------------------------------
[theme]
# Color mode. Dark wins when both are set.
dark = false
medium = false

# Per-field color overrides. These beat every other theme source.
# Fields: primary, secondary, accent, background, surface, text, text_muted,
#         border, on_primary
[theme.colors]
# primary = "#7b4b2a"

[theme.fonts]
# heading = "Georgia, serif"
# body = "system-ui, sans-serif"
# base_size = "16px"

[theme.spacing]
# border_radius = "8px"
# section_padding = "4rem"
# card_padding = "1.5rem"
# gap = "1.5rem"
# button_padding = "0.75rem 1.5rem"
"##
}
