//! ---
//! act_section: "05-access-control"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Flat-file user roles and usage logging."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
//! Flat-file user store.
//!
//! Usernames are case-insensitive and stored normalized (trimmed,
//! lowercased). Unknown names resolve to the plain user role; the
//! configured administrator name always resolves to admin, whether or not
//! it has been stored yet. Every mutation rewrites the TOML file in full,
//! which is fine at the scale of a per-site operator list.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info};

use aircheck_common::AccessConfig;

use crate::{AccessError, Result};

/// Role attached to a stored user.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    /// May additionally read the usage log and manage users.
    Admin,
    /// Regular operator.
    #[default]
    User,
}

impl Role {
    /// True for the administrator role.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// One stored user row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Normalized username.
    pub username: String,
    /// Stored role.
    pub role: Role,
    /// When the user was first recorded.
    pub created_at: DateTime<Utc>,
}

/// On-disk shape of the users file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: Vec<UserRecord>,
}

/// Flat-file user store backing login role resolution.
#[derive(Debug)]
pub struct UserStore {
    path: PathBuf,
    admin_username: String,
    users: IndexMap<String, UserRecord>,
}

impl UserStore {
    /// Load the users file, seeding the configured administrator when the
    /// store does not know it yet.
    pub fn open(config: &AccessConfig) -> Result<Self> {
        let mut store = Self {
            path: config.users_path.clone(),
            admin_username: normalize(&config.admin_username)?,
            users: IndexMap::new(),
        };
        if store.path.exists() {
            let body = fs::read_to_string(&store.path)?;
            let file: UsersFile = toml::from_str(&body)?;
            for record in file.users {
                store.users.insert(record.username.clone(), record);
            }
            debug!(
                users = store.users.len(),
                path = %store.path.display(),
                "user store loaded"
            );
        }
        if config.seed_admin && !store.users.contains_key(&store.admin_username) {
            let admin = store.admin_username.clone();
            store.insert(admin, Role::Admin)?;
            info!(username = %store.admin_username, "administrator seeded");
        }
        Ok(store)
    }

    /// Resolve the role a login under `username` should receive.
    pub fn resolve_role(&self, username: &str) -> Result<Role> {
        let key = normalize(username)?;
        if let Some(record) = self.users.get(&key) {
            return Ok(record.role);
        }
        if key == self.admin_username {
            return Ok(Role::Admin);
        }
        Ok(Role::User)
    }

    /// Look up a stored user by name.
    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        let key = normalize(username).ok()?;
        self.users.get(&key)
    }

    /// Record a login, storing first-seen names with their resolved role.
    pub fn record_login(&mut self, username: &str) -> Result<UserRecord> {
        let key = normalize(username)?;
        if let Some(record) = self.users.get(&key) {
            return Ok(record.clone());
        }
        let role = if key == self.admin_username {
            Role::Admin
        } else {
            Role::User
        };
        self.insert(key, role)
    }

    /// Add a user explicitly; fails when the name is already stored.
    pub fn add(&mut self, username: &str, role: Role) -> Result<UserRecord> {
        let key = normalize(username)?;
        if self.users.contains_key(&key) {
            return Err(AccessError::UserExists(key));
        }
        self.insert(key, role)
    }

    /// Change a stored user's role.
    pub fn set_role(&mut self, username: &str, role: Role) -> Result<UserRecord> {
        let key = normalize(username)?;
        match self.users.get_mut(&key) {
            Some(record) => {
                record.role = role;
                let updated = record.clone();
                self.save()?;
                Ok(updated)
            }
            None => Err(AccessError::UnknownUser(key)),
        }
    }

    /// Stored users in insertion order.
    pub fn users(&self) -> impl Iterator<Item = &UserRecord> {
        self.users.values()
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// True when no user has been stored yet.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn insert(&mut self, key: String, role: Role) -> Result<UserRecord> {
        let record = UserRecord {
            username: key.clone(),
            role,
            created_at: Utc::now(),
        };
        self.users.insert(key, record.clone());
        self.save()?;
        Ok(record)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = UsersFile {
            users: self.users.values().cloned().collect(),
        };
        let body = toml::to_string_pretty(&file)?;
        fs::write(&self.path, body)?;
        Ok(())
    }
}

fn normalize(username: &str) -> Result<String> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(AccessError::InvalidUsername(username.to_owned()));
    }
    Ok(trimmed.to_lowercase())
}
