//! File-backed session storage

use super::errors::SessionError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Session file name inside the home directory
pub const SESSION_FILE: &str = "session.json";

/// Credentials of a logged-in user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// JWT access token
    pub access_token: String,

    /// Organization the user belongs to
    pub organization: String,

    /// User name
    pub username: String,
}

/// Stores the current session as JSON under the home directory
#[derive(Debug, Clone)]
pub struct SessionManager {
    path: PathBuf,
}

impl SessionManager {
    /// Creates a manager for `home/session.json`
    #[must_use]
    pub fn new(home: &Path) -> Self {
        Self {
            path: home.join(SESSION_FILE),
        }
    }

    /// Session file location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saves a session, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Io`] if the file cannot be written
    pub fn create(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(session).map_err(|e| SessionError::Io(e.to_string()))?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Loads the current session
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoSession`] if none was created, and
    /// [`SessionError::Io`] if the file cannot be read or parsed
    pub fn current(&self) -> Result<Session, SessionError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(SessionError::NoSession),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&json).map_err(|e| SessionError::Io(e.to_string()))
    }
}
