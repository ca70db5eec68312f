//! Standard paths used by folder-trust tools

use std::env;
use std::path::{Path, PathBuf};

/// Overrides the location of the user rule file
pub const RULES_PATH_ENV: &str = "FOLDER_TRUST_RULES_PATH";

/// Overrides the location of the system rule file
pub const SYSTEM_RULES_PATH_ENV: &str = "FOLDER_TRUST_SYSTEM_RULES_PATH";

/// File name of every rule file
pub const RULES_FILE_NAME: &str = "trustedFolders.json";

/// File name of the settings file inside the config directory
pub const SETTINGS_FILE_NAME: &str = "settings.yaml";

/// Standard folder-trust paths
#[derive(Debug, Clone)]
pub struct Paths {
    /// Config directory (~/.config/folder-trust)
    pub config: PathBuf,
    /// User rule file (~/.config/folder-trust/trustedFolders.json)
    pub user_rules: PathBuf,
    /// Administrator-managed rule file (/etc/folder-trust/trustedFolders.json)
    pub system_rules: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let config = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("folder-trust");

        let user_rules =
            env_path(RULES_PATH_ENV).unwrap_or_else(|| config.join(RULES_FILE_NAME));

        let system_rules = env_path(SYSTEM_RULES_PATH_ENV)
            .unwrap_or_else(|| system_config_dir().join(RULES_FILE_NAME));

        Self {
            config,
            user_rules,
            system_rules,
        }
    }

    /// Root every path under a single directory, ignoring the environment
    pub fn with_root(root: &Path) -> Self {
        let config = root.join("config");
        Self {
            user_rules: config.join(RULES_FILE_NAME),
            system_rules: root.join("system").join(RULES_FILE_NAME),
            config,
        }
    }

    /// Get the settings file path
    pub fn settings(&self) -> PathBuf {
        self.config.join(SETTINGS_FILE_NAME)
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

#[cfg(windows)]
fn system_config_dir() -> PathBuf {
    PathBuf::from(r"C:\ProgramData\folder-trust")
}

#[cfg(not(windows))]
fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc/folder-trust")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_root_layout() {
        let paths = Paths::with_root(Path::new("/tmp/ft"));
        assert_eq!(paths.config, PathBuf::from("/tmp/ft/config"));
        assert_eq!(
            paths.user_rules,
            PathBuf::from("/tmp/ft/config/trustedFolders.json")
        );
        assert_eq!(
            paths.system_rules,
            PathBuf::from("/tmp/ft/system/trustedFolders.json")
        );
        assert_eq!(
            paths.settings(),
            PathBuf::from("/tmp/ft/config/settings.yaml")
        );
    }

    #[test]
    fn test_settings_live_in_config_dir() {
        let paths = Paths::new();
        assert_eq!(paths.settings(), paths.config.join(SETTINGS_FILE_NAME));
        assert!(paths.config.ends_with("folder-trust"));
    }
}
