//! Local user session: registration, login state and the dashboard greeting.
//!
//! State lives in a [`SessionSnapshot`] that a [`SessionBackend`] loads once
//! and saves after every change. Backend failures are logged; they never
//! change the outcome reported to the caller.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::macros::format_description;
use time::Date;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
}

/// Everything persisted between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Registered users, username to password.
    #[serde(default)]
    pub users: BTreeMap<String, String>,
    /// Logged-in user, if any.
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session storage is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait SessionBackend {
    fn load(&self) -> Result<SessionSnapshot, SessionError>;
    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionError>;
}

/// Keeps the last saved snapshot in memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    saved: Mutex<SessionSnapshot>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            saved: Mutex::new(snapshot),
        }
    }

    pub fn saved(&self) -> SessionSnapshot {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SessionBackend for MemoryBackend {
    fn load(&self) -> Result<SessionSnapshot, SessionError> {
        Ok(self.saved())
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
        let mut guard = self
            .saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = snapshot.clone();
        Ok(())
    }
}

/// One JSON document on disk. A missing file loads as an empty snapshot.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SessionBackend for FileBackend {
    fn load(&self) -> Result<SessionSnapshot, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(SessionSnapshot::default()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(SessionSnapshot::default()),
            Err(error) => Err(self.io_error(error)),
        }
    }

    fn save(&self, snapshot: &SessionSnapshot) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }
}

pub struct SessionStore<B: SessionBackend> {
    backend: B,
    snapshot: SessionSnapshot,
}

impl<B: SessionBackend> SessionStore<B> {
    /// Loads persisted state. Unreadable state is logged and replaced by an
    /// empty session.
    pub fn open(backend: B) -> Self {
        let snapshot = backend.load().unwrap_or_else(|error| {
            warn!(%error, "session state could not be loaded, starting empty");
            SessionSnapshot::default()
        });
        Self { backend, snapshot }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    pub fn current_user(&self) -> Option<&User> {
        self.snapshot.user.as_ref()
    }

    pub fn is_registered(&self, username: &str) -> bool {
        self.snapshot.users.contains_key(username)
    }

    /// Logs in on an exact password match. The username is trimmed the same
    /// way `signup` trims it.
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        let username = username.trim();
        let matches = self
            .snapshot
            .users
            .get(username)
            .is_some_and(|stored| stored == password);
        if !matches {
            debug!(username, "login rejected");
            return false;
        }

        self.snapshot.user = Some(User {
            username: username.to_owned(),
        });
        self.persist();
        info!(username, "logged in");
        true
    }

    /// Registers a new user and logs them in. Fails for a blank username or
    /// password, or a username that is already taken.
    pub fn signup(&mut self, username: &str, password: &str) -> bool {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            debug!("signup rejected: blank credentials");
            return false;
        }
        if self.is_registered(username) {
            debug!(username, "signup rejected: username taken");
            return false;
        }

        self.snapshot
            .users
            .insert(username.to_owned(), password.to_owned());
        self.snapshot.user = Some(User {
            username: username.to_owned(),
        });
        self.persist();
        info!(username, "signed up");
        true
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.snapshot.user.take() {
            self.persist();
            info!(username = %user.username, "logged out");
        }
    }

    /// `"Hello, alice. Friday, October 16"` for a logged-in user.
    pub fn greeting(&self, date: Date) -> Option<String> {
        let user = self.current_user()?;
        Some(format!("Hello, {}. {}", user.username, date_label(date)))
    }

    fn persist(&self) {
        if let Err(error) = self.backend.save(&self.snapshot) {
            warn!(%error, "session state could not be saved");
        }
    }
}

/// Long weekday and month with an unpadded day, e.g. `Friday, October 16`.
pub fn date_label(date: Date) -> String {
    date.format(format_description!(
        "[weekday repr:long], [month repr:long] [day padding:none]"
    ))
    .unwrap_or_else(|_| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn store() -> SessionStore<MemoryBackend> {
        SessionStore::open(MemoryBackend::new())
    }

    #[test]
    fn signup_logs_in_and_persists() {
        let mut store = store();
        assert!(store.signup("alice", "s3cret"));

        assert_eq!(store.current_user().map(|u| u.username.as_str()), Some("alice"));
        let saved = store.backend().saved();
        assert_eq!(saved.users.get("alice").map(String::as_str), Some("s3cret"));
        assert_eq!(saved.user, store.current_user().cloned());
    }

    #[test]
    fn blank_credentials_are_rejected() {
        let mut store = store();
        assert!(!store.signup("   ", "pw"));
        assert!(!store.signup("bob", ""));
        assert!(store.snapshot().users.is_empty());
        assert!(store.current_user().is_none());
    }

    #[test]
    fn login_requires_exact_password() {
        let mut store = store();
        assert!(store.signup("alice", "pw"));
        store.logout();

        assert!(!store.login("alice", "PW"));
        assert!(!store.login("mallory", "pw"));
        assert!(store.current_user().is_none());
        assert!(store.login("alice", "pw"));
    }

    #[test]
    fn greeting_needs_a_user() {
        let mut store = store();
        let day = date!(2026 - 10 - 16);
        assert_eq!(store.greeting(day), None);

        assert!(store.signup("alice", "pw"));
        assert_eq!(
            store.greeting(day).as_deref(),
            Some("Hello, alice. Friday, October 16")
        );
    }

    #[test]
    fn date_label_does_not_pad_day() {
        assert_eq!(date_label(date!(2026 - 03 - 02)), "Monday, March 2");
    }

    #[test]
    fn snapshot_json_shape() {
        let mut snapshot = SessionSnapshot::default();
        snapshot.users.insert(String::from("alice"), String::from("pw"));
        let json = serde_json::to_value(&snapshot).expect("serialize");
        assert_eq!(json["users"]["alice"], "pw");
        assert!(json["user"].is_null());
    }
}
