//! ---
//! act_section: "05-access-control"
//! act_subsection: "module"
//! act_type: "source"
//! act_scope: "code"
//! act_description: "Flat-file user roles and usage logging."
//! act_version: "v0.1.0"
//! act_owner: "tbd"
//! ---
//! Facade tying the user store and the usage log together.

use std::path::PathBuf;

use serde_json::json;
use tracing::info;
use uuid::Uuid;

use aircheck_common::AccessConfig;

use crate::usage::{tail, UsageAction, UsageEvent, UsageLogWriter};
use crate::users::{Role, UserStore};
use crate::{AccessError, Result};

/// A resolved login: who is acting and with which role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Random identifier tying log entries of one run together.
    pub id: Uuid,
    /// Normalized username.
    pub username: String,
    /// Role the login resolved to.
    pub role: Role,
}

impl Session {
    /// True when the session may use admin-only views.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// User store plus usage log behind one handle.
pub struct AccessControl {
    store: UserStore,
    log: UsageLogWriter,
    log_path: PathBuf,
}

impl AccessControl {
    /// Open both backing files, creating them as needed.
    pub fn open(config: &AccessConfig) -> Result<Self> {
        let store = UserStore::open(config)?;
        let log = UsageLogWriter::open(&config.usage_log_path)?;
        Ok(Self {
            store,
            log,
            log_path: config.usage_log_path.clone(),
        })
    }

    /// Resolve the caller's role, store first-seen names, and record the
    /// login in the usage log.
    pub fn login(&mut self, username: &str) -> Result<Session> {
        let record = self.store.record_login(username)?;
        let session = Session {
            id: Uuid::new_v4(),
            username: record.username.clone(),
            role: record.role,
        };
        self.log.append(UsageEvent::new(
            &session.username,
            UsageAction::Login,
            json!({ "session": session.id, "role": session.role }),
        ))?;
        info!(username = %session.username, role = %session.role, "login recorded");
        Ok(session)
    }

    /// Record a completed generation run against the session.
    pub fn record_generation(
        &mut self,
        session: &Session,
        detail: serde_json::Value,
    ) -> Result<u64> {
        self.log.append(UsageEvent::new(
            &session.username,
            UsageAction::Generate,
            with_session(session, detail),
        ))
    }

    /// Record a standalone reference fetch against the session.
    pub fn record_fetch(&mut self, session: &Session, detail: serde_json::Value) -> Result<u64> {
        self.log.append(UsageEvent::new(
            &session.username,
            UsageAction::Fetch,
            with_session(session, detail),
        ))
    }

    /// Admin-only view of the most recent usage events, oldest first.
    pub fn recent_activity(&self, session: &Session, limit: usize) -> Result<Vec<UsageEvent>> {
        if !session.is_admin() {
            return Err(AccessError::AdminRequired("usage log"));
        }
        tail(&self.log_path, limit)
    }

    /// Read access to the user store.
    pub fn store(&self) -> &UserStore {
        &self.store
    }

    /// Mutable access for user management commands.
    pub fn store_mut(&mut self) -> &mut UserStore {
        &mut self.store
    }
}

fn with_session(session: &Session, detail: serde_json::Value) -> serde_json::Value {
    match detail {
        serde_json::Value::Object(mut map) => {
            map.insert("session".to_owned(), json!(session.id));
            serde_json::Value::Object(map)
        }
        other => json!({ "session": session.id, "detail": other }),
    }
}
