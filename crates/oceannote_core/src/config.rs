//! Session configuration.
//!
//! # Invariants
//! - Every field has a default; partial JSON overrides are accepted.
//! - `validate()` must pass before a config is handed to a session.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

/// Blob name used by keyed sinks.
pub const DEFAULT_STORAGE_KEY: &str = "notes_v1";
const DEFAULT_DEBOUNCE_MS: u64 = 500;
const DEFAULT_PREVIEW_CHARS: usize = 40;
const DEFAULT_TITLE_PREVIEW_CHARS: usize = 32;

/// Configuration rejected by `NotesConfig::validate` or the JSON loader.
#[derive(Debug)]
pub enum ConfigError {
    EmptyStorageKey,
    ZeroPreviewLength(&'static str),
    Parse(serde_json::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStorageKey => write!(f, "storage_key cannot be empty"),
            Self::ZeroPreviewLength(field) => write!(f, "{field} must be greater than zero"),
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

/// Tunables for a note session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Quiet period before a debounced edit write fires.
    pub debounce_ms: u64,
    /// Blob name in keyed sinks (file name stem, SQLite row key).
    pub storage_key: String,
    /// Max chars of content preview in list rows.
    pub preview_chars: usize,
    /// Max chars of title in list rows.
    pub title_preview_chars: usize,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
            title_preview_chars: DEFAULT_TITLE_PREVIEW_CHARS,
        }
    }
}

impl NotesConfig {
    /// Parses overrides from JSON and validates the result.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if self.preview_chars == 0 {
            return Err(ConfigError::ZeroPreviewLength("preview_chars"));
        }
        if self.title_preview_chars == 0 {
            return Err(ConfigError::ZeroPreviewLength("title_preview_chars"));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
