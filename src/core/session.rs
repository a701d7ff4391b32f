//! # Session
//!
//! Authentication state for the current user, the validator contract the
//! gate relies on, and persistence of signed-in credentials to
//! `~/.switchboard/session.json`.
//!
//! Lifecycle:
//!
//! ```text
//! bootstrap ── restore(credentials?) ──► Session
//! sign_in(credentials)   epoch += 1
//! sign_out()             epoch += 1, credentials dropped
//! ```
//!
//! The epoch lets async results (validation, module loads) tell whether the
//! session they started under is still the current one.
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`).

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::backend::BackendError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// What a successful sign-in leaves behind.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub token: String,
    pub user: UserProfile,
    pub signed_in_at: i64,
}

impl Credentials {
    pub fn new(token: impl Into<String>, user: UserProfile) -> Self {
        Self {
            token: token.into(),
            user,
            signed_in_at: Utc::now().timestamp(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"***")
            .field("user", &self.user)
            .field("signed_in_at", &self.signed_in_at)
            .finish()
    }
}

/// A password that never shows up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(Debug, Default)]
pub struct Session {
    credentials: Option<Credentials>,
    epoch: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bootstrap from persisted credentials, if any.
    pub fn restore(credentials: Option<Credentials>) -> Self {
        Self {
            credentials,
            epoch: 0,
        }
    }

    pub fn sign_in(&mut self, credentials: Credentials) {
        debug!("Session signed in as {}", credentials.user.email);
        self.credentials = Some(credentials);
        self.epoch += 1;
    }

    pub fn sign_out(&mut self) -> Option<Credentials> {
        self.epoch += 1;
        self.credentials.take()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.credentials.as_ref().map(|c| &c.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.token.as_str())
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Backend check that a token still represents a live session.
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// `Ok(false)` means the backend rejected the session. `Err` means the
    /// question could not be answered; callers treat both as invalid.
    async fn validate_session(&self, token: &str) -> Result<bool, BackendError>;
}

// ============================================================================
// Persistence
// ============================================================================

/// Returns `~/.switchboard/session.json`.
pub fn session_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".switchboard").join("session.json"))
}

fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

pub fn save_credentials(path: &Path, credentials: &Credentials) -> io::Result<()> {
    atomic_write_json(path, credentials)
}

/// `Ok(None)` when nothing has been saved yet.
pub fn load_credentials(path: &Path) -> io::Result<Option<Credentials>> {
    if !path.exists() {
        return Ok(None);
    }
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub fn clear_credentials(path: &Path) -> io::Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Restore credentials from the default location. Unreadable files are
/// logged and ignored; the user simply signs in again.
pub fn restore_persisted() -> Option<Credentials> {
    let path = session_path()?;
    match load_credentials(&path) {
        Ok(credentials) => credentials,
        Err(e) => {
            warn!("Ignoring unreadable session file {}: {}", path.display(), e);
            None
        }
    }
}

/// Save the current session to `path`, or clear it when signed out.
pub fn persist(path: &Path, session: &Session) {
    let result = match session.credentials() {
        Some(credentials) => save_credentials(path, credentials),
        None => clear_credentials(path),
    };
    match result {
        Ok(()) => debug!("Session file updated: {}", path.display()),
        Err(e) => warn!("Failed to update session file: {}", e),
    }
}
