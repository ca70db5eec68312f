//! Workspace state reported by a hosting IDE
//!
//! An editor integration pushes its view of the open workspace here. Readers
//! take a snapshot; the integration may replace or clear it at any time.

use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// What the IDE reports about the current workspace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdeWorkspaceState {
    /// `None` when the IDE has no trust opinion
    #[serde(default)]
    pub is_trusted: Option<bool>,
}

/// Shared, process-wide handle to the IDE workspace state
///
/// Clones share the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct IdeContextStore {
    state: Arc<RwLock<Option<IdeWorkspaceState>>>,
}

impl IdeContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current workspace state
    pub fn set(&self, state: IdeWorkspaceState) {
        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(state);
    }

    /// Forget any reported state
    pub fn clear(&self) {
        let mut guard = self.state.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    /// Snapshot of the current workspace state
    pub fn workspace_state(&self) -> Option<IdeWorkspaceState> {
        *self.state.read().unwrap_or_else(|e| e.into_inner())
    }
}
