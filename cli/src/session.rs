//! Session file
//!
//! `login` records who is using the CLI; every other command loads it once
//! and hands the resulting [`AuthContext`] to the view it runs.

use crate::output::Tabular;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use netdesk_core::{AuthContext, Role, UserId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const SESSION_FILE: &str = "session.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub role: Role,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    pub fn auth(&self) -> AuthContext {
        AuthContext::new(self.user_id, self.role)
    }
}

impl Tabular for Session {
    fn headers(&self) -> Vec<String> {
        vec!["User".into(), "Role".into(), "Since".into()]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            self.user_id.to_string(),
            self.role.to_string(),
            self.logged_in_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        ]]
    }
}

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(SESSION_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn login(&self, user_id: UserId, role: Role) -> Result<Session> {
        let session = Session {
            user_id,
            role,
            logged_in_at: Utc::now(),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, toml::to_string_pretty(&session)?)
            .with_context(|| format!("writing {}", self.path.display()))?;
        tracing::info!(user = user_id, %role, "session started");
        Ok(session)
    }

    /// Returns whether a session existed.
    pub fn logout(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path).with_context(|| format!("removing {}", self.path.display()))?;
        Ok(true)
    }

    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let session = toml::from_str(&content)
            .with_context(|| format!("corrupt session file {}", self.path.display()))?;
        Ok(Some(session))
    }

    /// The current auth context, or an error telling the user to log in.
    pub fn require(&self) -> Result<AuthContext> {
        self.load()?
            .map(|s| s.auth())
            .ok_or_else(|| anyhow!("not logged in; run `netdesk login --user-id <ID> --role <ROLE>`"))
    }
}
