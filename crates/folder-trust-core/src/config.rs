//! User settings
//!
//! Stored at ~/.config/folder-trust/settings.yaml:
//!
//! ```yaml
//! folder_trust:
//!   enabled: true
//! ```
//!
//! A missing file or a missing key leaves folder trust disabled.

use crate::paths::Paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Settings consumed by folder-trust tools
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Folder trust feature settings
    #[serde(default)]
    pub folder_trust: FolderTrustSettings,
}

/// Folder trust feature settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderTrustSettings {
    /// Whether trust checks run at all
    #[serde(default)]
    pub enabled: bool,
}

impl Settings {
    /// Settings with folder trust switched on or off
    pub fn with_folder_trust(enabled: bool) -> Self {
        Self {
            folder_trust: FolderTrustSettings { enabled },
        }
    }

    /// Load settings from default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Paths::new().settings())
    }

    /// Load settings from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let settings: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {:?}", path))?;
        Ok(settings)
    }

    /// Save settings to default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Paths::new().settings())
    }

    /// Save settings to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;
        Ok(())
    }

    pub fn is_folder_trust_enabled(&self) -> bool {
        self.folder_trust.enabled
    }
}
