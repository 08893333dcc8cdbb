//! Persistent configuration stored as JSON under the platform config directory.
//!
//! Settings live at `<config_dir>/hark/settings.json`. Loading never fails:
//! a missing or unreadable file yields the defaults. Environment variables act
//! as fallbacks for values not present in the file, so a one-off
//! `HARK_ENDPOINT=... hark` works without any config on disk.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable consulted when no endpoint is configured.
pub const ENDPOINT_ENV_VAR: &str = "HARK_ENDPOINT";

fn default_timeout_secs() -> u64 {
    crate::transcribe::DEFAULT_TIMEOUT_SECS
}

fn default_max_secs() -> u64 {
    600
}

/// User settings for recording and transcription.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Transcription endpoint URL (None = unset, fall back to HARK_ENDPOINT)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Selected microphone device name (None = system default)
    #[serde(default)]
    pub device: Option<String>,

    /// Request timeout for the transcription upload, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum recording length in seconds (0 = unlimited)
    #[serde(default = "default_max_secs")]
    pub max_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: None,
            device: None,
            timeout_secs: default_timeout_secs(),
            max_secs: default_max_secs(),
        }
    }
}

impl Settings {
    /// Load settings from disk, falling back to defaults if the file is
    /// missing or unparseable.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        Self::load_from(&path)
    }

    fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                crate::verbose!("ignoring corrupt settings at {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Persist settings to disk, creating the config directory if needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::path().context("Could not determine config directory")?;
        self.save_to(&path)
    }

    fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Location of the settings file (`<config_dir>/hark/settings.json`).
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hark").join("settings.json"))
    }

    /// Resolve the transcription endpoint: the settings file wins, then the
    /// HARK_ENDPOINT environment variable. Returns None if neither is set.
    pub fn resolve_endpoint(&self) -> Option<String> {
        self.endpoint
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| {
                std::env::var(ENDPOINT_ENV_VAR)
                    .ok()
                    .filter(|url| !url.trim().is_empty())
            })
    }
}
