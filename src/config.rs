//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/dragtree/dragtree.toml`
//! 3. Explicit config file (`--config <file>`)
//! 4. Environment variables: `DRAGTREE_*` prefix

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{Color, DEFAULT_INDENT_PER_LEVEL};

/// Hover time over a closed parent before it expands during a drag.
pub const DEFAULT_EXPAND_DELAY_MS: u64 = 500;

/// Unified configuration for dragtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Horizontal indent per nesting level, handed to the hitbox collaborator
    pub indent_per_level: u32,
    /// Expand-on-hover delay in milliseconds
    pub expand_delay_ms: u64,
    /// Colour for items added without one
    pub default_color: Color,
    /// Initial tree (TOML); the built-in demo tree when unset
    pub seed_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            indent_per_level: DEFAULT_INDENT_PER_LEVEL,
            expand_delay_ms: DEFAULT_EXPAND_DELAY_MS,
            default_color: Color::Gray,
            seed_file: None,
        }
    }
}

/// Raw settings for intermediate parsing; `None` means "not specified".
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub indent_per_level: Option<u32>,
    pub expand_delay_ms: Option<u64>,
    pub default_color: Option<Color>,
    pub seed_file: Option<PathBuf>,
}

/// Get the XDG config directory for dragtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dragtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("dragtree.toml"))
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

/// Expand `~`, `$VAR` and `${VAR}` in a path.
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(&raw)
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    pub fn expand_delay(&self) -> Duration {
        Duration::from_millis(self.expand_delay_ms)
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            indent_per_level: overlay.indent_per_level.unwrap_or(self.indent_per_level),
            expand_delay_ms: overlay.expand_delay_ms.unwrap_or(self.expand_delay_ms),
            default_color: overlay.default_color.unwrap_or(self.default_color),
            seed_file: overlay
                .seed_file
                .clone()
                .or_else(|| self.seed_file.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("loading global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Explicit config file
        if let Some(path) = config_file {
            debug!("loading config {}", path.display());
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        current.seed_file = current.seed_file.as_deref().map(expand_path);
        Ok(current)
    }

    /// Apply DRAGTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("DRAGTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_int("indent_per_level") {
            settings.indent_per_level = u32::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("indent_per_level out of range: {}", val),
            })?;
        }
        if let Ok(val) = config.get_int("expand_delay_ms") {
            settings.expand_delay_ms = u64::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("expand_delay_ms out of range: {}", val),
            })?;
        }
        if let Ok(val) = config.get_string("default_color") {
            settings.default_color = Color::parse(&val).ok_or_else(|| ApplicationError::Config {
                message: format!("unknown default_color: {}", val),
            })?;
        }
        if let Ok(val) = config.get_string("seed_file") {
            settings.seed_file = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Render settings as TOML for `config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}
