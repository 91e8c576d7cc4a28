//! ---
//! act_section: "05-access-control"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Flat-file user roles and usage logging."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
//! Access control for AirCheck TH.
//!
//! Users and their roles live in a flat TOML file; every login and
//! generation run is appended to a JSON-lines usage log. The configured
//! administrator account is seeded on first open, and only administrators
//! may read back the usage log.
#![warn(missing_docs)]

/// Result alias used throughout the access crate.
pub type Result<T> = std::result::Result<T, AccessError>;

/// Error type for the access subsystem.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Wrapper for IO errors on the users file or usage log.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Wrapper for users-file decode failures.
    #[error("users file decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    /// Wrapper for users-file encode failures.
    #[error("users file encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),
    /// Wrapper for usage-log serialization issues.
    #[error("usage log serialization error: {0}")]
    Json(#[from] serde_json::Error),
    /// Reported when a username is empty after trimming.
    #[error("invalid username {0:?}")]
    InvalidUsername(String),
    /// Reported when adding a username that is already stored.
    #[error("user {0:?} already exists")]
    UserExists(String),
    /// Reported when changing the role of an unknown user.
    #[error("user {0:?} not found")]
    UnknownUser(String),
    /// Reported when a non-administrator requests an admin-only view.
    #[error("administrator role required to view {0}")]
    AdminRequired(&'static str),
}

pub mod service;
pub mod usage;
pub mod users;

pub use service::{AccessControl, Session};
pub use usage::{tail, UsageAction, UsageEvent, UsageLogReader, UsageLogWriter, DEFAULT_TAIL_LIMIT};
pub use users::{Role, UserRecord, UserStore};
