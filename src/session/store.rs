//! Session files on disk.
//!
//! A session is stored as `<username>.session` holding a JSON record of the
//! cookies and the username. Nothing transport-specific is written.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::transport::StoredCookie;
use crate::error::{Error, Result};
use crate::fs::sanitize_filename;

/// File extension of saved sessions.
pub const SESSION_EXTENSION: &str = "session";

/// Durable part of an authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub username: String,
    pub cookies: Vec<StoredCookie>,
    pub saved_at: DateTime<Utc>,
}

impl PersistedSession {
    pub fn new(username: impl Into<String>, cookies: Vec<StoredCookie>) -> Self {
        Self {
            username: username.into(),
            cookies,
            saved_at: Utc::now(),
        }
    }
}

/// Directory of saved sessions keyed by username.
#[derive(Debug, Clone)]
pub struct SessionStore {
    directory: PathBuf,
}

impl SessionStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the session file for `username`.
    pub fn path_for(&self, username: &str) -> Result<PathBuf> {
        let name = sanitize_filename(username)?;
        Ok(self
            .directory
            .join(format!("{}.{}", name, SESSION_EXTENSION)))
    }

    /// Write a session file, creating the directory if needed.
    pub fn save(&self, session: &PersistedSession) -> Result<PathBuf> {
        let path = self.path_for(&session.username)?;
        fs::create_dir_all(&self.directory)?;

        let content = serde_json::to_vec_pretty(session)?;
        fs::write(&path, content)?;

        tracing::debug!("Saved session for {} to {}", session.username, path.display());
        Ok(path)
    }

    /// Read the session file for `username`.
    pub fn load(&self, username: &str) -> Result<PersistedSession> {
        let path = self.path_for(username)?;
        let content = fs::read(&path)?;
        let session: PersistedSession = serde_json::from_slice(&content)?;

        if session.username != username {
            return Err(Error::Config(format!(
                "Session file {} belongs to '{}', not '{}'",
                path.display(),
                session.username,
                username
            )));
        }

        Ok(session)
    }
}
