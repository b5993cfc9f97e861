//! # Quote Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in forno-quote                            │
//! │                                                                         │
//! │  quote.toml / FORNO_* ──► ConfigError ──┐                               │
//! │                                         │                               │
//! │  input file / stdin ────► Io, Json ─────┼──► QuoteError ──► stderr      │
//! │                                         │                   exit != 0   │
//! │  forno-core ────────────► CoreError ────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use forno_core::CoreError;
use thiserror::Error;

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for the app.
pub type QuoteResult<T> = Result<T, QuoteError>;

// =============================================================================
// Config Error
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A setting has a value the app cannot use.
    #[error("Invalid quote configuration: {0}")]
    InvalidConfig(String),

    /// Config file could not be read or parsed.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ConfigLoadFailed(err.to_string())
    }
}

// =============================================================================
// Quote Error
// =============================================================================

/// Everything that can stop a command.
#[derive(Debug, Error)]
pub enum QuoteError {
    // =========================================================================
    // Usage Errors
    // =========================================================================
    /// Bad command line.
    #[error("{0}\nRun 'forno-quote --help' for usage.")]
    Usage(String),

    /// `order` was run without a menu.
    #[error("No menu configured. Set [menu] path in quote.toml or FORNO_MENU_PATH.")]
    MenuNotConfigured,

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Input or menu file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input document is not valid JSON, or not the expected shape.
    #[error("Invalid JSON in {origin}: {message}")]
    Json { origin: String, message: String },

    /// Menu file could not be parsed.
    #[error("Invalid menu {path}: {message}")]
    Menu { path: PathBuf, message: String },

    /// Result could not be written to stdout.
    #[error("Failed to write output: {0}")]
    Output(String),

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl QuoteError {
    /// Builds a JSON error tagged with where the document came from.
    pub fn json(origin: &str, err: serde_json::Error) -> Self {
        QuoteError::Json {
            origin: origin.to_string(),
            message: err.to_string(),
        }
    }
}
