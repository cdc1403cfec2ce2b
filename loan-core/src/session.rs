//! The signed-in user's bearer token.
//!
//! A [`SessionContext`] is created once at startup and shared (behind an
//! `Arc`) with the HTTP client and the route guard. Where the token lives is
//! decided by the [`TokenStore`] it wraps.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("token file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("token store lock poisoned")]
    Poisoned,
}

/// Storage for a single token string. Absence is a valid state.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, SessionError>;

    fn save(
        &self,
        token: &str,
    ) -> Result<(), SessionError>;

    fn remove(&self) -> Result<(), SessionError>;
}

/// Keeps the token for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        let guard = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(
        &self,
        token: &str,
    ) -> Result<(), SessionError> {
        let mut guard = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), SessionError> {
        let mut guard = self.token.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

/// Keeps the token in a file so it survives between CLI invocations.
///
/// A missing or blank file means nobody is signed in.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(
        &self,
        source: std::io::Error,
    ) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(
        &self,
        token: &str,
    ) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, token).map_err(|e| self.io_error(e))
    }

    fn remove(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

pub struct SessionContext {
    store: Box<dyn TokenStore>,
}

impl SessionContext {
    pub fn new(store: Box<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// A session held only in memory, initially anonymous.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryTokenStore::new()))
    }

    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(FileTokenStore::new(path)))
    }

    /// The current token. A store that cannot be read is treated as
    /// anonymous.
    pub fn token(&self) -> Option<String> {
        match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "could not read session token; continuing anonymously");
                None
            }
        }
    }

    pub fn set_token(
        &self,
        token: &str,
    ) -> Result<(), SessionError> {
        self.store.save(token)?;
        debug!("session token stored");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.remove()?;
        debug!("session token cleared");
        Ok(())
    }

    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.clear()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}
