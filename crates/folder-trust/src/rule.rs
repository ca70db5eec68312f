//! Trust rules and where they come from

use crate::level::TrustLevel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Which rule file a rule was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSourceKind {
    /// The user's own rule file. Canonical and writable.
    User,
    /// Administrator-managed rule file. Read-only.
    System,
}

impl RuleSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSourceKind::User => "user",
            RuleSourceKind::System => "system",
        }
    }
}

impl fmt::Display for RuleSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rule file to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSource {
    pub kind: RuleSourceKind,
    pub path: PathBuf,
}

impl RuleSource {
    pub fn user(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: RuleSourceKind::User,
            path: path.into(),
        }
    }

    pub fn system(path: impl Into<PathBuf>) -> Self {
        Self {
            kind: RuleSourceKind::System,
            path: path.into(),
        }
    }
}

/// A single path rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustRule {
    /// Path as written in the rule file (absolute, relative or `~`-prefixed)
    pub path: String,

    pub trust_level: TrustLevel,

    /// Rule file this rule was read from
    pub source: RuleSourceKind,
}

/// A rule file that could not be used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleLoadError {
    pub kind: RuleSourceKind,
    pub path: PathBuf,
    pub message: String,
}

impl fmt::Display for RuleLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.path.display(), self.kind, self.message)
    }
}
