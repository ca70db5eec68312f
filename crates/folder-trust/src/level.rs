//! Trust levels and verdicts
//!
//! A rule assigns one of three levels to a path. Resolving a path yields one
//! of three verdicts; `Unknown` means no rule applied at all and is never the
//! same thing as `Untrusted`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trust level declared for a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrustLevel {
    /// The path and everything beneath it is trusted
    TrustFolder,

    /// Same reach as `TrustFolder`: the declared path and its descendants.
    /// Siblings and ancestors are not covered.
    TrustParent,

    /// The path and everything beneath it is untrusted, unless a deeper rule
    /// says otherwise
    DoNotTrust,
}

impl TrustLevel {
    /// Parse from string
    ///
    /// Accepts the file tokens (`TRUST_FOLDER`) in any case, with `-` or `_`.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "trust_folder" | "trust" | "folder" => Some(TrustLevel::TrustFolder),
            "trust_parent" | "parent" => Some(TrustLevel::TrustParent),
            "do_not_trust" | "distrust" | "untrust" => Some(TrustLevel::DoNotTrust),
            _ => None,
        }
    }

    /// Get the token used in rule files
    pub fn as_str(&self) -> &'static str {
        match self {
            TrustLevel::TrustFolder => "TRUST_FOLDER",
            TrustLevel::TrustParent => "TRUST_PARENT",
            TrustLevel::DoNotTrust => "DO_NOT_TRUST",
        }
    }

    /// Whether a match on this level grants trust
    pub fn grants_trust(&self) -> bool {
        match self {
            TrustLevel::TrustFolder | TrustLevel::TrustParent => true,
            TrustLevel::DoNotTrust => false,
        }
    }
}

impl fmt::Display for TrustLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verdict for a single path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathTrust {
    /// Most specific matching rule grants trust
    Trusted,
    /// Most specific matching rule is `DO_NOT_TRUST`
    Untrusted,
    /// No rule covers the path
    Unknown,
}

impl PathTrust {
    /// `None` for `Unknown`
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PathTrust::Trusted => Some(true),
            PathTrust::Untrusted => Some(false),
            PathTrust::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PathTrust::Trusted => "trusted",
            PathTrust::Untrusted => "untrusted",
            PathTrust::Unknown => "unknown",
        }
    }
}

impl From<TrustLevel> for PathTrust {
    fn from(level: TrustLevel) -> Self {
        if level.grants_trust() {
            PathTrust::Trusted
        } else {
            PathTrust::Untrusted
        }
    }
}

impl fmt::Display for PathTrust {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
