//! Errors surfaced by trust decisions

use std::path::PathBuf;
use thiserror::Error;

/// Trust-specific errors
#[derive(Error, Debug)]
pub enum TrustError {
    /// The user's rule file exists but cannot be used. A trust decision
    /// cannot be made until it is fixed or removed.
    #[error("Error in {}: {message}\nFix or remove the trusted folders file to continue.", .path.display())]
    FatalConfig { path: PathBuf, message: String },

    #[error("Unknown trust level: {0} (expected TRUST_FOLDER, TRUST_PARENT or DO_NOT_TRUST)")]
    InvalidLevel(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TrustError>;
