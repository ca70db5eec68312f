//! Path trust resolution
//!
//! A rule covers its own path and everything beneath it. When several rules
//! cover a path, the deepest one decides, so a `TRUST_FOLDER` rule can carve
//! a trusted island out of a `DO_NOT_TRUST` tree. Matching is by path
//! component: `/a/bc` is not under `/a/b`. There are no globs.

use crate::level::PathTrust;
use crate::rule::TrustRule;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Resolve a path against a rule list
///
/// Relative paths, both `location` and rule paths, are anchored at `cwd`.
pub fn is_path_trusted(rules: &[TrustRule], location: &Path, cwd: &Path) -> PathTrust {
    match most_specific_rule(rules, location, cwd) {
        Some(rule) => {
            debug!(
                location = %location.display(),
                rule = %rule.path,
                level = %rule.trust_level,
                "matched trust rule"
            );
            rule.trust_level.into()
        }
        None => {
            debug!(location = %location.display(), "no trust rule covers path");
            PathTrust::Unknown
        }
    }
}

/// The deepest rule whose path is `location` or one of its ancestors
///
/// On equal depth the earlier rule wins.
pub fn most_specific_rule<'a>(
    rules: &'a [TrustRule],
    location: &Path,
    cwd: &Path,
) -> Option<&'a TrustRule> {
    let candidate = normalize_path(location, cwd);

    let mut best_match: Option<(usize, &TrustRule)> = None;

    for rule in rules {
        let rule_path = normalize_path(Path::new(&rule.path), cwd);
        if !candidate.starts_with(&rule_path) {
            continue;
        }

        let specificity = rule_path.components().count();
        if best_match.map_or(true, |(s, _)| specificity > s) {
            best_match = Some((specificity, rule));
        }
    }

    best_match.map(|(_, rule)| rule)
}

/// Make a path absolute and lexically clean
///
/// Expands a leading `~`, joins relative paths onto `cwd` and folds `.` and
/// `..` without touching the filesystem. Paths that do not exist normalize
/// the same way as those that do.
pub fn normalize_path(path: &Path, cwd: &Path) -> PathBuf {
    let expanded = match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).as_ref()),
        None => path.to_path_buf(),
    };

    let joined = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    fold_case(normalized)
}

/// Make a working directory absolute
///
/// A relative `dir` is taken relative to the process working directory.
pub fn absolute_dir(dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        return normalize_path(dir, dir);
    }

    match std::env::current_dir() {
        Ok(process_cwd) => normalize_path(dir, &process_cwd),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot make working directory absolute");
            dir.to_path_buf()
        }
    }
}

// Windows paths compare case-insensitively.
#[cfg(windows)]
fn fold_case(path: PathBuf) -> PathBuf {
    PathBuf::from(path.to_string_lossy().to_lowercase())
}

#[cfg(not(windows))]
fn fold_case(path: PathBuf) -> PathBuf {
    path
}
