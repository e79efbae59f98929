//! Session Store
//!
//! The only state that outlives a run: a token and a username, persisted
//! under two fixed keys. [`SessionContext`] is the explicit handle the
//! controllers pass around instead of reading storage ad hoc.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::Session;

/// Storage key holding the session token
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the username
pub const USERNAME_KEY: &str = "username";

/// Errors from the durable session storage
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Storage backend missing or refusing access (e.g. browser storage disabled)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}

/// Durable home of the session fields
pub trait SessionStore {
    /// Read both fields; `None` unless both are present
    fn load(&self) -> Result<Option<Session>, SessionError>;

    /// Persist both fields
    fn save(&self, session: &Session) -> Result<(), SessionError>;

    /// Remove both fields
    fn clear(&self) -> Result<(), SessionError>;
}

/// Rebuild a session from raw key/value lookups
pub fn session_from_fields(token: Option<String>, username: Option<String>) -> Option<Session> {
    match (token, username) {
        (Some(token), Some(username)) => Some(Session { token, username }),
        _ => None,
    }
}

/// JSON file holding `{"token": ..., "username": ...}`
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_fields(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        let mut fields = self.read_fields()?;
        Ok(session_from_fields(
            fields.remove(TOKEN_KEY),
            fields.remove(USERNAME_KEY),
        ))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut fields = BTreeMap::new();
        fields.insert(TOKEN_KEY, session.token.as_str());
        fields.insert(USERNAME_KEY, session.username.as_str());

        std::fs::write(&self.path, serde_json::to_string_pretty(&fields)?)?;
        tracing::debug!("Session saved to {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store, keyed like durable storage
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    fields: RefCell<BTreeMap<&'static str, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: &Session) -> Self {
        let store = Self::new();
        {
            let mut fields = store.fields.borrow_mut();
            fields.insert(TOKEN_KEY, session.token.clone());
            fields.insert(USERNAME_KEY, session.username.clone());
        }
        store
    }

    /// Raw value under a storage key
    pub fn field(&self, key: &str) -> Option<String> {
        self.fields.borrow().get(key).cloned()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(session_from_fields(self.field(TOKEN_KEY), self.field(USERNAME_KEY)))
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        let mut fields = self.fields.borrow_mut();
        fields.insert(TOKEN_KEY, session.token.clone());
        fields.insert(USERNAME_KEY, session.username.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut fields = self.fields.borrow_mut();
        fields.remove(TOKEN_KEY);
        fields.remove(USERNAME_KEY);
        Ok(())
    }
}

/// The current session plus the store it is mirrored to
#[derive(Debug)]
pub struct SessionContext<S> {
    store: S,
    current: Option<Session>,
}

impl<S: SessionStore> SessionContext<S> {
    /// Read the store once. An unreadable store starts signed out.
    pub fn open(store: S) -> Self {
        let current = match store.load() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Ignoring unreadable session: {}", e);
                None
            }
        };

        if let Some(session) = &current {
            tracing::debug!("Restored session for {}", session.username);
        }

        Self { store, current }
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.username.as_str())
    }

    /// Persist and adopt a freshly issued session
    pub fn commit(&mut self, session: Session) -> Result<(), SessionError> {
        self.store.save(&session)?;
        tracing::info!("Signed in as {}", session.username);
        self.current = Some(session);
        Ok(())
    }

    /// Drop the session in memory and in storage
    pub fn logout(&mut self) -> Result<(), SessionError> {
        let previous = self.current.take();
        self.store.clear()?;
        if let Some(session) = previous {
            tracing::info!("Signed out {}", session.username);
        }
        Ok(())
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn alice() -> Session {
        Session::new("abc123", "alice")
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

        assert_eq!(store.load().unwrap(), None);

        store.save(&alice()).unwrap();
        assert_eq!(store.load().unwrap(), Some(alice()));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw[TOKEN_KEY], "abc123");
        assert_eq!(raw[USERNAME_KEY], "alice");

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.load().unwrap(), None);

        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_requires_both_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"token": "abc123"}"#).unwrap();

        let store = FileSessionStore::new(&path);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_opens_signed_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileSessionStore::new(&path);
        assert!(matches!(store.load(), Err(SessionError::Serialization(_))));

        let ctx = SessionContext::open(store);
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn test_context_commit_and_logout() {
        let mut ctx = SessionContext::open(MemorySessionStore::new());
        assert!(!ctx.is_authenticated());

        ctx.commit(alice()).unwrap();
        assert_eq!(ctx.username(), Some("alice"));
        assert_eq!(ctx.store().field(TOKEN_KEY).as_deref(), Some("abc123"));

        ctx.logout().unwrap();
        assert!(ctx.current().is_none());
        assert_eq!(ctx.store().field(TOKEN_KEY), None);
        assert_eq!(ctx.store().field(USERNAME_KEY), None);
    }

    #[test]
    fn test_context_restores_persisted_session() {
        let ctx = SessionContext::open(MemorySessionStore::with_session(&alice()));
        assert_eq!(ctx.current(), Some(&alice()));
    }
}
