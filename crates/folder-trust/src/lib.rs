//! Folder Trust - decide whether a workspace may be trusted
//!
//! Users declare trust per folder in a JSON rule file:
//!
//! ```json
//! {
//!   "/home/user/code": "TRUST_FOLDER",
//!   "/home/user/code/vendor": "DO_NOT_TRUST"
//! }
//! ```
//!
//! A path is decided by the deepest rule covering it. When no rule covers it
//! the answer is "unknown", not "untrusted", so callers can ask the user
//! instead of silently blocking. A hosting IDE can override the rule files
//! entirely.

pub mod aggregate;
pub mod error;
pub mod level;
pub mod resolver;
pub mod rule;
pub mod store;
pub mod workspace;

pub use aggregate::{default_sources, TrustedFolders};
pub use error::TrustError;
pub use level::{PathTrust, TrustLevel};
pub use resolver::is_path_trusted;
pub use rule::{RuleLoadError, RuleSource, RuleSourceKind, TrustRule};
pub use store::TrustRuleStore;
pub use workspace::{
    is_workspace_trusted, IdeTrustSource, NoIdeOverride, TrustSource, WorkspaceTrust,
    WorkspaceTrustResolver,
};
