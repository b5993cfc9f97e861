//! # Quote Configuration
//!
//! Where the menu lives, how results are printed, and what gets logged.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FORNO_MENU_PATH=./menu.toml                                        │
//! │     FORNO_LOG=debug                                                    │
//! │     FORNO_PRETTY=false                                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, otherwise                                         │
//! │     ~/.config/forno/quote.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.forno.forno/quote.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     no menu, pretty output, "info,forno=debug"                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `RUST_LOG`, when set, still wins over the configured log filter.
//!
//! ## Configuration File Format
//! ```toml
//! # quote.toml
//! [menu]
//! path = "/srv/forno/menu.toml"   # .toml or .json
//!
//! [output]
//! pretty = true
//!
//! [logging]
//! filter = "info,forno=debug"
//! ```
//!
//! The discount rules are not configurable here or anywhere else.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// Log filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_LOG_FILTER: &str = "info,forno=debug";

// =============================================================================
// Sections
// =============================================================================

/// Menu location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSettings {
    /// Menu file, `.toml` or `.json`. Relative paths resolve against the
    /// working directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Result printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Pretty-print JSON results.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings { pretty: true }
    }
}

/// Logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `tracing-subscriber` filter directive.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_filter(),
        }
    }
}

// =============================================================================
// Quote Configuration
// =============================================================================

/// Complete app configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteConfig {
    #[serde(default)]
    pub menu: MenuSettings,

    #[serde(default)]
    pub output: OutputSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl QuoteConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (quote.toml)
    /// 3. Environment variables
    ///
    /// An explicit `config_path` must exist; the default location may be
    /// missing.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let explicit = config_path.is_some();
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading quote config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml_str(&contents)?;
            } else if explicit {
                return Err(ConfigError::ConfigLoadFailed(format!(
                    "config file not found: {}",
                    path.display()
                )));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a config document.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "logging.filter must not be empty".into(),
            ));
        }

        if let Some(ref path) = self.menu.path {
            if MenuFormat::of(path).is_none() {
                return Err(ConfigError::InvalidConfig(format!(
                    "menu.path must end in .toml or .json, got: {}",
                    path.display()
                )));
            }
        }

        Ok(())
    }

    /// Applies `FORNO_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("FORNO_MENU_PATH") {
            debug!(path = %path, "Overriding menu path from environment");
            self.menu.path = Some(PathBuf::from(path));
        }

        if let Some(filter) = lookup("FORNO_LOG") {
            self.logging.filter = filter;
        }

        if let Some(pretty) = lookup("FORNO_PRETTY") {
            match pretty.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.output.pretty = true,
                "0" | "false" | "no" => self.output.pretty = false,
                _ => warn!(value = %pretty, "Unknown FORNO_PRETTY value in environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "forno", "forno")
            .map(|dirs| dirs.config_dir().join("quote.toml"))
    }

    /// Returns the menu path if configured.
    pub fn menu_path(&self) -> Option<&Path> {
        self.menu.path.as_deref()
    }
}

// =============================================================================
// Menu Format
// =============================================================================

/// File format of a menu, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuFormat {
    Toml,
    Json,
}

impl MenuFormat {
    pub fn of(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_lowercase().as_str() {
            "toml" => Some(MenuFormat::Toml),
            "json" => Some(MenuFormat::Json),
            _ => None,
        }
    }
}
