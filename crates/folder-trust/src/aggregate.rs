//! Rule aggregation
//!
//! Loads every configured rule file and merges them into one ordered list:
//! source order first, then file order within a source. A broken file
//! contributes no rules and a recorded error; the load as a whole never
//! fails.

use crate::level::{PathTrust, TrustLevel};
use crate::resolver;
use crate::rule::{RuleLoadError, RuleSource, RuleSourceKind, TrustRule};
use crate::store::TrustRuleStore;
use anyhow::{bail, Result};
use folder_trust_core::Paths;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default rule files: the user's first, then the system's
pub fn default_sources(paths: &Paths) -> Vec<RuleSource> {
    vec![
        RuleSource::user(&paths.user_rules),
        RuleSource::system(&paths.system_rules),
    ]
}

/// A loaded rule file
#[derive(Debug, Clone)]
struct LoadedSource {
    kind: RuleSourceKind,
    store: TrustRuleStore,
    failed: bool,
}

/// All rules visible from a working directory
#[derive(Debug, Clone)]
pub struct TrustedFolders {
    sources: Vec<LoadedSource>,
    rules: Vec<TrustRule>,
    errors: Vec<RuleLoadError>,
    cwd: PathBuf,
}

impl TrustedFolders {
    /// Load every source
    ///
    /// `cwd` anchors relative rule paths during resolution. A relative `cwd`
    /// is made absolute against the process working directory.
    pub fn load(sources: &[RuleSource], cwd: &Path) -> Self {
        let mut loaded = Vec::with_capacity(sources.len());
        let mut errors = Vec::new();

        for source in sources {
            match TrustRuleStore::load_from(&source.path) {
                Ok(store) => loaded.push(LoadedSource {
                    kind: source.kind,
                    store,
                    failed: false,
                }),
                Err(e) => {
                    let error = RuleLoadError {
                        kind: source.kind,
                        path: source.path.clone(),
                        message: e.root_cause().to_string(),
                    };
                    warn!(%error, "ignoring unusable rule file");
                    errors.push(error);
                    loaded.push(LoadedSource {
                        kind: source.kind,
                        store: TrustRuleStore::empty(&source.path),
                        failed: true,
                    });
                }
            }
        }

        let mut folders = Self {
            sources: loaded,
            rules: Vec::new(),
            errors,
            cwd: resolver::absolute_dir(cwd),
        };
        folders.rebuild();
        debug!(
            rules = folders.rules.len(),
            errors = folders.errors.len(),
            "loaded trusted folders"
        );
        folders
    }

    /// Load the default sources
    pub fn load_default(cwd: &Path) -> Self {
        Self::load(&default_sources(&Paths::new()), cwd)
    }

    /// Merged rules in precedence order
    pub fn rules(&self) -> &[TrustRule] {
        &self.rules
    }

    /// Errors from every source that could not be used
    pub fn errors(&self) -> &[RuleLoadError] {
        &self.errors
    }

    /// The load error of the user's rule file, if any
    pub fn user_error(&self) -> Option<&RuleLoadError> {
        self.errors.iter().find(|e| e.kind == RuleSourceKind::User)
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Resolve a path against the merged rules
    pub fn is_path_trusted(&self, location: &Path) -> PathTrust {
        resolver::is_path_trusted(&self.rules, location, &self.cwd)
    }

    /// The rule that decides `location`, if any
    pub fn matching_rule(&self, location: &Path) -> Option<&TrustRule> {
        resolver::most_specific_rule(&self.rules, location, &self.cwd)
    }

    /// Add or update a rule in the user's rule file and persist it
    ///
    /// Refuses to write over a user file that failed to load, which would
    /// discard whatever the user had in it.
    pub fn set_value(&mut self, path: &str, level: TrustLevel) -> Result<()> {
        let user = self.user_store_mut()?;
        user.set_value(path, level)?;
        self.rebuild();
        Ok(())
    }

    /// Remove a rule from the user's rule file
    pub fn remove(&mut self, path: &str) -> Result<bool> {
        let removed = self.user_store_mut()?.remove(path)?;
        if removed {
            self.rebuild();
        }
        Ok(removed)
    }

    fn user_store_mut(&mut self) -> Result<&mut TrustRuleStore> {
        let Some(user) = self
            .sources
            .iter_mut()
            .find(|s| s.kind == RuleSourceKind::User)
        else {
            bail!("No user rule file configured");
        };

        if user.failed {
            bail!(
                "Refusing to overwrite {:?}: it could not be loaded",
                user.store.path()
            );
        }

        Ok(&mut user.store)
    }

    fn rebuild(&mut self) {
        self.rules = self
            .sources
            .iter()
            .flat_map(|source| {
                source.store.rules().map(move |(path, trust_level)| TrustRule {
                    path: path.to_string(),
                    trust_level,
                    source: source.kind,
                })
            })
            .collect();
    }
}
