//! Folder Trust Core - Shared functionality for folder-trust tools
//!
//! Where things live on disk, what the user switched on, and what the
//! hosting editor currently says about the open workspace.

pub mod config;
pub mod ide;
pub mod paths;

pub use config::{FolderTrustSettings, Settings};
pub use ide::{IdeContextStore, IdeWorkspaceState};
pub use paths::Paths;
