// SPDX-License-Identifier: MPL-2.0
//! This module handles the user settings, including loading and saving the
//! persisted language selection to a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Active language and whether the OS locale is consulted
//!
//! # Path Resolution
//!
//! The config file location can be customized for testing or portable deployments:
//! 1. Use `load_from_path()`/`save_to_path()` with explicit path
//! 2. Pass `--config-dir`, recorded by [`crate::paths::init_cli_overrides`]
//! 3. Set `ARTHASETU_CONFIG_DIR` environment variable
//! 4. Falls back to platform-specific config directory
//!
//! # Migration
//!
//! Flat files holding a single top-level `language = "hi"` entry (the layout
//! the web front-end kept in local storage) are migrated to the sectioned
//! format when loaded. The next save writes the new format.
//!
//! # Examples
//!
//! ```no_run
//! use arthasetu_i18n::config::{self, Config};
//!
//! let (mut config, _warning) = config::load();
//! config.general.language = Some("kn".to_string());
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

pub use defaults::*;

use crate::error::{Error, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// Section Structs
// =============================================================================

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Active UI language code (e.g., "en", "hi", "kn", "tu").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Consult the OS locale when no language has been persisted yet.
    #[serde(
        default = "default_follow_system_locale",
        skip_serializing_if = "Option::is_none"
    )]
    pub follow_system_locale: Option<bool>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            language: None,
            follow_system_locale: default_follow_system_locale(),
        }
    }
}

/// User settings with logical sections.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
}

impl Config {
    /// Whether startup should fall back to the OS locale.
    pub fn follow_system_locale(&self) -> bool {
        self.general
            .follow_system_locale
            .unwrap_or(DEFAULT_FOLLOW_SYSTEM_LOCALE)
    }
}

/// Flat single-entry layout predating the sectioned file.
#[derive(Debug, Deserialize)]
struct LegacyConfig {
    language: Option<String>,
}

impl From<LegacyConfig> for Config {
    fn from(legacy: LegacyConfig) -> Self {
        Config {
            general: GeneralConfig {
                language: legacy.language,
                ..GeneralConfig::default()
            },
        }
    }
}

fn default_follow_system_locale() -> Option<bool> {
    Some(DEFAULT_FOLLOW_SYSTEM_LOCALE)
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config file path with an optional directory override.
pub fn config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// default config with a warning key explaining what went wrong.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable settings");
                    return (Config::default(), Some(CONFIG_LOAD_WARNING.to_string()));
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads configuration from a specific path.
///
/// Automatically migrates the legacy flat format to the sectioned format.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;

    if content.contains("[general]") {
        return Ok(toml::from_str::<Config>(&content)?);
    }

    if let Ok(legacy) = toml::from_str::<LegacyConfig>(&content) {
        return Ok(Config::from(legacy));
    }

    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

// =============================================================================
// Save Functions
// =============================================================================

/// Saves the configuration to the default path.
pub fn save(config: &Config) -> Result<()> {
    save_with_override(config, None)
}

/// Saves the configuration to a custom directory.
pub fn save_with_override(config: &Config, base_dir: Option<PathBuf>) -> Result<()> {
    match config_path_with_override(base_dir) {
        Some(path) => save_to_path(config, &path),
        None => Err(Error::Config(
            "no config directory available on this platform".to_string(),
        )),
    }
}

/// Saves configuration to a specific path.
pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config).map_err(Error::from)?;
    fs::write(path, content)?;
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
