//! Workspace trust decision
//!
//! The top-level policy. Checks run in order and the first one that applies
//! decides:
//!
//! 1. Folder trust disabled: trusted, no source.
//! 2. IDE reports a trust state: that state, source `ide`.
//! 3. Otherwise the rule files decide for the working directory, source
//!    `file`. An undecided path stays undecided (`is_trusted: None`).
//!
//! An unusable user rule file is fatal at step 3.

use crate::aggregate::{default_sources, TrustedFolders};
use crate::error::{Result, TrustError};
use crate::level::PathTrust;
use crate::resolver::absolute_dir;
use crate::rule::{RuleSource, RuleSourceKind};
use anyhow::Context;
use folder_trust_core::{IdeContextStore, Paths, Settings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Source of an IDE trust override
pub trait IdeTrustSource {
    /// Current trust state reported for the workspace, `None` for no override
    fn workspace_trust(&self) -> Option<bool>;
}

impl IdeTrustSource for IdeContextStore {
    fn workspace_trust(&self) -> Option<bool> {
        self.workspace_state().and_then(|state| state.is_trusted)
    }
}

/// A fixed override
impl IdeTrustSource for Option<bool> {
    fn workspace_trust(&self) -> Option<bool> {
        *self
    }
}

/// No IDE attached
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIdeOverride;

impl IdeTrustSource for NoIdeOverride {
    fn workspace_trust(&self) -> Option<bool> {
        None
    }
}

/// Authority behind a trust decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustSource {
    Ide,
    File,
}

/// Result of a workspace trust decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceTrust {
    /// `None` when nothing decided; callers usually prompt
    pub is_trusted: Option<bool>,

    /// `None` when folder trust is disabled
    pub source: Option<TrustSource>,
}

impl WorkspaceTrust {
    fn feature_disabled() -> Self {
        Self {
            is_trusted: Some(true),
            source: None,
        }
    }

    fn from_ide(is_trusted: bool) -> Self {
        Self {
            is_trusted: Some(is_trusted),
            source: Some(TrustSource::Ide),
        }
    }

    fn from_file(verdict: PathTrust) -> Self {
        Self {
            is_trusted: verdict.as_bool(),
            source: Some(TrustSource::File),
        }
    }
}

/// Decides whether the current workspace is trusted
pub struct WorkspaceTrustResolver {
    sources: Vec<RuleSource>,
    cwd: PathBuf,
    ide: Box<dyn IdeTrustSource>,
}

impl WorkspaceTrustResolver {
    /// Resolver for the process working directory and the default rule files
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to determine working directory")?;
        Ok(Self::with_sources(default_sources(&Paths::new()), cwd))
    }

    /// Resolver over specific rule files and working directory
    ///
    /// A relative `cwd` is made absolute against the process working directory.
    pub fn with_sources(sources: Vec<RuleSource>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            sources,
            cwd: absolute_dir(&cwd.into()),
            ide: Box::new(NoIdeOverride),
        }
    }

    /// Attach an IDE override source
    pub fn with_ide(mut self, ide: impl IdeTrustSource + 'static) -> Self {
        self.ide = Box::new(ide);
        self
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Load the rule files fresh
    pub fn load_trusted_folders(&self) -> TrustedFolders {
        TrustedFolders::load(&self.sources, &self.cwd)
    }

    /// Decide whether the working directory is trusted
    pub fn is_workspace_trusted(&self, settings: &Settings) -> Result<WorkspaceTrust> {
        if !settings.is_folder_trust_enabled() {
            debug!("folder trust disabled");
            return Ok(WorkspaceTrust::feature_disabled());
        }

        // One read per decision; later changes apply to the next decision.
        if let Some(is_trusted) = self.ide.workspace_trust() {
            debug!(is_trusted, "using IDE trust override");
            return Ok(WorkspaceTrust::from_ide(is_trusted));
        }

        let folders = self.load_trusted_folders();

        if let Some(error) = folders.user_error() {
            return Err(TrustError::FatalConfig {
                path: error.path.clone(),
                message: error.message.clone(),
            });
        }
        for error in folders
            .errors()
            .iter()
            .filter(|e| e.kind != RuleSourceKind::User)
        {
            warn!(%error, "continuing without rule file");
        }

        let verdict = folders.is_path_trusted(&self.cwd);
        debug!(cwd = %self.cwd.display(), %verdict, "resolved workspace trust from rules");
        Ok(WorkspaceTrust::from_file(verdict))
    }
}

/// Decide trust for the process working directory with the default rule files
pub fn is_workspace_trusted(
    settings: &Settings,
    ide: impl IdeTrustSource + 'static,
) -> Result<WorkspaceTrust> {
    WorkspaceTrustResolver::new()?
        .with_ide(ide)
        .is_workspace_trusted(settings)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::level::TrustLevel;
    use folder_trust_core::IdeWorkspaceState;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    struct Fixture {
        _dir: TempDir,
        paths: Paths,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempdir().unwrap();
            let paths = Paths::with_root(dir.path());
            Self { _dir: dir, paths }
        }

        fn with_user_rules(self, content: &str) -> Self {
            write(&self.paths.user_rules, content);
            self
        }

        fn resolver(&self, cwd: &str) -> WorkspaceTrustResolver {
            WorkspaceTrustResolver::with_sources(default_sources(&self.paths), cwd)
        }
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn enabled() -> Settings {
        Settings::with_folder_trust(true)
    }

    #[test]
    fn test_disabled_is_always_trusted() {
        let fixture =
            Fixture::new().with_user_rules(r#"{"/home/user/untrusted": "DO_NOT_TRUST"}"#);
        let resolver = fixture.resolver("/home/user/untrusted").with_ide(Some(false));

        let result = resolver.is_workspace_trusted(&Settings::default()).unwrap();
        assert_eq!(
            result,
            WorkspaceTrust {
                is_trusted: Some(true),
                source: None
            }
        );
    }

    #[test]
    fn test_disabled_ignores_broken_rule_file() {
        let fixture = Fixture::new().with_user_rules("{ broken");
        let resolver = fixture.resolver("/home/user");

        let result = resolver
            .is_workspace_trusted(&Settings::with_folder_trust(false))
            .unwrap();
        assert_eq!(result.is_trusted, Some(true));
    }

    #[test]
    fn test_ide_override_wins() {
        let fixture = Fixture::new().with_user_rules(r#"{"/home/user/projectA": "TRUST_FOLDER"}"#);

        let result = fixture
            .resolver("/home/user/projectA")
            .with_ide(Some(false))
            .is_workspace_trusted(&enabled())
            .unwrap();
        assert_eq!(
            result,
            WorkspaceTrust {
                is_trusted: Some(false),
                source: Some(TrustSource::Ide)
            }
        );

        let result = fixture
            .resolver("/nowhere")
            .with_ide(Some(true))
            .is_workspace_trusted(&enabled())
            .unwrap();
        assert_eq!(result.is_trusted, Some(true));
        assert_eq!(result.source, Some(TrustSource::Ide));
    }

    #[test]
    fn test_ide_override_skips_broken_rule_file() {
        let fixture = Fixture::new().with_user_rules("{ broken");

        let result = fixture
            .resolver("/home/user")
            .with_ide(Some(true))
            .is_workspace_trusted(&enabled())
            .unwrap();
        assert_eq!(result.source, Some(TrustSource::Ide));
    }

    #[test]
    fn test_ide_store_snapshot_per_decision() {
        let fixture = Fixture::new().with_user_rules(r#"{"/home/user/projectA": "TRUST_FOLDER"}"#);
        let store = IdeContextStore::new();
        let resolver = fixture.resolver("/home/user/projectA").with_ide(store.clone());

        let result = resolver.is_workspace_trusted(&enabled()).unwrap();
        assert_eq!(result.source, Some(TrustSource::File));

        store.set(IdeWorkspaceState {
            is_trusted: Some(false),
        });
        let result = resolver.is_workspace_trusted(&enabled()).unwrap();
        assert_eq!(result.is_trusted, Some(false));
        assert_eq!(result.source, Some(TrustSource::Ide));

        store.set(IdeWorkspaceState { is_trusted: None });
        let result = resolver.is_workspace_trusted(&enabled()).unwrap();
        assert_eq!(result.source, Some(TrustSource::File));
        assert_eq!(result.is_trusted, Some(true));
    }

    #[test]
    fn test_trusted_folder_from_file() {
        let fixture = Fixture::new().with_user_rules(r#"{"/home/user/projectA": "TRUST_FOLDER"}"#);

        let result = fixture
            .resolver("/home/user/projectA/src")
            .is_workspace_trusted(&enabled())
            .unwrap();
        assert_eq!(
            result,
            WorkspaceTrust {
                is_trusted: Some(true),
                source: Some(TrustSource::File)
            }
        );
    }

    #[test]
    fn test_untrusted_folder_from_file() {
        let fixture =
            Fixture::new().with_user_rules(r#"{"/home/user/untrusted": "DO_NOT_TRUST"}"#);

        let result = fixture
            .resolver("/home/user/untrusted")
            .is_workspace_trusted(&enabled())
            .unwrap();
        assert_eq!(
            result,
            WorkspaceTrust {
                is_trusted: Some(false),
                source: Some(TrustSource::File)
            }
        );
    }

    #[test]
    fn test_no_matching_rule_is_undecided() {
        let fixture = Fixture::new().with_user_rules(r#"{"/home/user/projectA": "TRUST_FOLDER"}"#);

        let result = fixture
            .resolver("/home/user/projectB")
            .is_workspace_trusted(&enabled())
            .unwrap();
        assert_eq!(
            result,
            WorkspaceTrust {
                is_trusted: None,
                source: Some(TrustSource::File)
            }
        );
    }

    #[test]
    fn test_no_rule_file_is_undecided() {
        let fixture = Fixture::new();

        let result = fixture
            .resolver("/home/user")
            .is_workspace_trusted(&enabled())
            .unwrap();
        assert_eq!(result.is_trusted, None);
        assert_eq!(result.source, Some(TrustSource::File));
    }

    #[test]
    fn test_broken_user_file_is_fatal() {
        let fixture = Fixture::new().with_user_rules("{ broken");

        let err = fixture
            .resolver("/home/user")
            .is_workspace_trusted(&enabled())
            .unwrap_err();
        match err {
            TrustError::FatalConfig { path, message } => {
                assert_eq!(path, fixture.paths.user_rules);
                assert!(!message.is_empty());
            }
            other => panic!("expected fatal config error, got {other:?}"),
        }
    }

    #[test]
    fn test_unreadable_user_file_is_fatal() {
        let fixture = Fixture::new();
        fs::create_dir_all(&fixture.paths.user_rules).unwrap();

        let err = fixture
            .resolver("/home/user")
            .is_workspace_trusted(&enabled())
            .unwrap_err();
        match err {
            TrustError::FatalConfig { path, message } => {
                assert_eq!(path, fixture.paths.user_rules);
                assert!(!message.is_empty());
            }
            other => panic!("expected fatal config error, got {other:?}"),
        }
    }

    #[test]
    fn test_relative_cwd_does_not_match_itself_twice() {
        let fixture = Fixture::new().with_user_rules(r#"{"./proj": "TRUST_FOLDER"}"#);

        let resolver = fixture.resolver("proj");
        assert!(resolver.cwd().is_absolute());

        let result = resolver.is_workspace_trusted(&enabled()).unwrap();
        assert_eq!(
            result,
            WorkspaceTrust {
                is_trusted: None,
                source: Some(TrustSource::File)
            }
        );
    }

    #[test]
    fn test_broken_system_file_is_not_fatal() {
        let fixture = Fixture::new().with_user_rules(r#"{"/home/user/projectA": "TRUST_FOLDER"}"#);
        write(&fixture.paths.system_rules, "{ broken");

        let result = fixture
            .resolver("/home/user/projectA")
            .is_workspace_trusted(&enabled())
            .unwrap();
        assert_eq!(result.is_trusted, Some(true));
    }

    #[test]
    fn test_decision_sees_new_rule() {
        let fixture = Fixture::new();
        let resolver = fixture.resolver("/home/user/projectC");

        let mut folders = resolver.load_trusted_folders();
        folders
            .set_value("/home/user/projectC", TrustLevel::TrustFolder)
            .unwrap();

        let result = resolver.is_workspace_trusted(&enabled()).unwrap();
        assert_eq!(result.is_trusted, Some(true));
    }

    #[test]
    fn test_wire_format() {
        let undecided = WorkspaceTrust::from_file(PathTrust::Unknown);
        assert_eq!(
            serde_json::to_string(&undecided).unwrap(),
            r#"{"isTrusted":null,"source":"file"}"#
        );

        let ide = WorkspaceTrust::from_ide(false);
        assert_eq!(
            serde_json::to_string(&ide).unwrap(),
            r#"{"isTrusted":false,"source":"ide"}"#
        );
    }
}
