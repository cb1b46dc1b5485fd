//! Session store
//!
//! Owns the current credential. Mirrors browser storage: the session is
//! written to a JSON file so it survives a restart, and is removed from
//! both memory and disk on logout or when the backend answers 401.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;

use crate::models::session::Session;

/// Session store errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session encoding error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Lock poisoned")]
    LockPoisoned,
}

/// Holder of the current session
///
/// Single writer (login flow or the interceptor), many readers.
#[derive(Debug)]
pub struct SessionStore {
    current: RwLock<Option<Session>>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Store that never touches the disk
    pub fn in_memory() -> Self {
        Self {
            current: RwLock::new(None),
            path: None,
        }
    }

    /// Open a file-backed store, restoring a previously saved session
    ///
    /// An unreadable or corrupt file is treated as "no session".
    pub fn open(path: PathBuf) -> Self {
        let restored = match load_session(&path) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Discarding unreadable session file {:?}: {}", path, e);
                None
            }
        };

        if restored.is_some() {
            tracing::info!("Restored session from {:?}", path);
        }

        Self {
            current: RwLock::new(restored),
            path: Some(path),
        }
    }

    /// Persist a new session, replacing any existing one
    pub fn set(&self, session: Session) -> Result<(), SessionError> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(&session)?;
            std::fs::write(path, json)?;
        }

        let mut current = self.current.write().map_err(|_| SessionError::LockPoisoned)?;
        *current = Some(session);
        Ok(())
    }

    /// Current session, if any
    pub fn get(&self) -> Option<Session> {
        self.current.read().ok().and_then(|s| s.clone())
    }

    /// Bearer token of the current session
    pub fn token(&self) -> Option<String> {
        self.current
            .read()
            .ok()
            .and_then(|s| s.as_ref().map(|session| session.token.clone()))
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().map(|s| s.is_some()).unwrap_or(false)
    }

    /// Remove the session from memory and disk
    ///
    /// Memory is always cleared, even when the file cannot be removed.
    pub fn clear(&self) -> Result<(), SessionError> {
        match self.current.write() {
            Ok(mut current) => *current = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }

        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(SessionError::Io(e)),
            }
        }

        Ok(())
    }

    /// Backing file, if the store is persistent
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn load_session(path: &Path) -> Result<Option<Session>, SessionError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&raw)?))
}
