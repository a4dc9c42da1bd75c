//! Behavior tests for the local session store.

use std::fs;

use tickerboard_core::{
    FileBackend, MemoryBackend, SessionBackend, SessionError, SessionSnapshot, SessionStore,
};
use time::macros::date;

/// Backend whose writes always fail.
struct ReadOnlyBackend;

impl SessionBackend for ReadOnlyBackend {
    fn load(&self) -> Result<SessionSnapshot, SessionError> {
        Ok(SessionSnapshot::default())
    }

    fn save(&self, _snapshot: &SessionSnapshot) -> Result<(), SessionError> {
        Err(SessionError::Io {
            path: "read-only".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

#[test]
fn when_username_is_taken_signup_fails_and_password_is_unchanged() {
    // Given: alice is registered with their original password
    let mut store = SessionStore::open(MemoryBackend::new());
    assert!(store.signup("alice", "first"));
    store.logout();

    // When: Someone signs up as alice again
    let accepted = store.signup("alice", "second");

    // Then: Signup is refused and only the original password works
    assert!(!accepted);
    assert!(store.current_user().is_none());
    assert!(!store.login("alice", "second"));
    assert!(store.login("alice", "first"));
}

#[test]
fn when_username_is_padded_login_matches_signup() {
    // Given: alice signed up with surrounding whitespace and logged out
    let mut store = SessionStore::open(MemoryBackend::new());
    assert!(store.signup(" alice ", "pw"));
    store.logout();

    // When: The same padded input is used to log in
    let accepted = store.login(" alice ", "pw");

    // Then: Login succeeds under the trimmed name
    assert!(accepted);
    assert_eq!(
        store.current_user().map(|user| user.username.as_str()),
        Some("alice")
    );
    assert!(store.login("alice", "pw"));
}

#[test]
fn when_user_logs_out_greeting_disappears() {
    let mut store = SessionStore::open(MemoryBackend::new());
    assert!(store.signup("alice", "pw"));
    assert!(store.greeting(date!(2026 - 10 - 16)).is_some());

    store.logout();

    assert!(store.current_user().is_none());
    assert_eq!(store.greeting(date!(2026 - 10 - 16)), None);
    assert!(store.is_registered("alice"));
}

#[test]
fn when_file_backend_is_reopened_state_survives() {
    // Given: A session file with one logged-in user
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("session.json");
    {
        let mut store = SessionStore::open(FileBackend::new(&path));
        assert!(store.signup("bob", "hunter2"));
    }

    // When: The store is reopened from the same path
    let mut reopened = SessionStore::open(FileBackend::new(&path));

    // Then: bob is still logged in and can log in again after logging out
    assert_eq!(
        reopened.current_user().map(|u| u.username.as_str()),
        Some("bob")
    );
    reopened.logout();
    let reloaded = SessionStore::open(FileBackend::new(&path));
    assert!(reloaded.current_user().is_none());
    assert!(reloaded.is_registered("bob"));
}

#[test]
fn file_backend_writes_users_and_user_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.json");
    let mut store = SessionStore::open(FileBackend::new(&path));
    assert!(store.signup("carol", "pw"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("file written")).expect("json");
    assert_eq!(json["users"]["carol"], "pw");
    assert_eq!(json["user"]["username"], "carol");
}

#[test]
fn when_session_file_is_missing_or_corrupt_store_starts_empty() {
    let dir = tempfile::tempdir().expect("tempdir");

    let missing = SessionStore::open(FileBackend::new(dir.path().join("absent.json")));
    assert!(missing.current_user().is_none());
    assert!(missing.snapshot().users.is_empty());

    let corrupt_path = dir.path().join("corrupt.json");
    fs::write(&corrupt_path, "{not json").expect("write");
    assert!(matches!(
        FileBackend::new(&corrupt_path).load(),
        Err(SessionError::Json(_))
    ));
    let corrupt = SessionStore::open(FileBackend::new(&corrupt_path));
    assert!(corrupt.snapshot().users.is_empty());
}

#[test]
fn when_persistence_fails_results_are_unchanged() {
    // Given: A backend that rejects every write
    let mut store = SessionStore::open(ReadOnlyBackend);

    // When/Then: Signup and login still report success in memory
    assert!(store.signup("dave", "pw"));
    store.logout();
    assert!(store.login("dave", "pw"));
    assert_eq!(
        store.greeting(date!(2026 - 10 - 16)).as_deref(),
        Some("Hello, dave. Friday, October 16")
    );
}

#[test]
fn memory_backend_can_be_seeded() {
    let mut snapshot = SessionSnapshot::default();
    snapshot
        .users
        .insert(String::from("erin"), String::from("pw"));
    let mut store = SessionStore::open(MemoryBackend::with_snapshot(snapshot));

    assert!(store.current_user().is_none());
    assert!(store.login("erin", "pw"));
    assert_eq!(
        store.backend().saved().user.map(|u| u.username),
        Some(String::from("erin"))
    );
}
