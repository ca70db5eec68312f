//! Rule file storage
//!
//! A rule file is a single JSON object mapping paths to trust levels:
//!
//! ```json
//! {
//!   "/home/user/projectA": "TRUST_FOLDER",
//!   "/home/user/untrusted": "DO_NOT_TRUST"
//! }
//! ```
//!
//! Key order is preserved across load and save.

use crate::level::TrustLevel;
use anyhow::{Context, Result};
use serde::de::Error as _;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One rule file, held in memory in file order
#[derive(Debug, Clone)]
pub struct TrustRuleStore {
    path: PathBuf,
    rules: Vec<(String, TrustLevel)>,
}

impl TrustRuleStore {
    /// An empty store backed by `path`
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            rules: Vec::new(),
        }
    }

    /// Load a rule file
    ///
    /// A missing file is an empty store. A file that cannot be read or parsed
    /// is an error; the root cause carries the parser diagnostic.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no rule file");
            return Ok(Self::empty(path));
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read trusted folders from {:?}", path))?;
        let rules = parse_rules(&content)
            .with_context(|| format!("Failed to parse trusted folders from {:?}", path))?;

        debug!(path = %path.display(), count = rules.len(), "loaded rule file");
        Ok(Self {
            path: path.to_path_buf(),
            rules,
        })
    }

    /// Write the full mapping back to the backing file
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        let map: Map<String, Value> = self
            .rules
            .iter()
            .map(|(path, level)| (path.clone(), Value::from(level.as_str())))
            .collect();
        let content = serde_json::to_string_pretty(&map)?;

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write trusted folders to {:?}", self.path))?;
        Ok(())
    }

    /// Add or update a rule, then persist
    ///
    /// An existing key keeps its position; a new key is appended.
    pub fn set_value(&mut self, path: &str, level: TrustLevel) -> Result<()> {
        match self.rules.iter_mut().find(|(p, _)| p == path) {
            Some(existing) => existing.1 = level,
            None => self.rules.push((path.to_string(), level)),
        }
        self.save()
    }

    /// Remove a rule, persisting if it existed
    pub fn remove(&mut self, path: &str) -> Result<bool> {
        let before = self.rules.len();
        self.rules.retain(|(p, _)| p != path);
        if self.rules.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    /// Look up the level declared for an exact key
    pub fn get(&self, path: &str) -> Option<TrustLevel> {
        self.rules
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, level)| *level)
    }

    /// Rules in file order
    pub fn rules(&self) -> impl Iterator<Item = (&str, TrustLevel)> {
        self.rules.iter().map(|(p, level)| (p.as_str(), *level))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn parse_rules(content: &str) -> serde_json::Result<Vec<(String, TrustLevel)>> {
    let map: Map<String, Value> = serde_json::from_str(content)?;
    map.into_iter()
        .map(|(path, value)| {
            let level = serde_json::from_value::<TrustLevel>(value).map_err(|e| {
                serde_json::Error::custom(format!("invalid trust level for {:?}: {}", path, e))
            })?;
            Ok((path, level))
        })
        .collect()
}

/// Delete files, best-effort
///
/// Files that do not exist are skipped. Every other failure becomes a warning
/// in the returned list instead of an error.
pub fn remove_files(paths: &[PathBuf]) -> Vec<String> {
    let mut warnings = Vec::new();

    for path in paths {
        if !path.exists() {
            continue;
        }
        match fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "removed"),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not remove file");
                warnings.push(format!("Could not remove {}: {}", path.display(), e));
            }
        }
    }

    warnings
}
