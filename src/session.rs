//! Session Token Lifecycle
//!
//! A single optional bearer token. Persistence is a capability seam so that
//! swallowing storage failures is a deliberate choice made here, once, and
//! so tests can run against an in-memory store.

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

use crate::config::TOKEN_KEY;

#[derive(Debug, Clone, PartialEq)]
pub struct StorageError(pub String);

pub trait TokenStorage {
    fn get(&self) -> Result<Option<String>, StorageError>;
    fn set(&self, token: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}

/// `localStorage`-backed token persistence. Storage may be blocked entirely
/// in some browsers; every access reports that as an error for the session
/// layer to swallow.
pub struct BrowserTokenStorage;

impl BrowserTokenStorage {
    fn local_storage(&self) -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|window| window.local_storage().ok().flatten())
            .ok_or_else(|| StorageError("localStorage unavailable".to_string()))
    }
}

impl TokenStorage for BrowserTokenStorage {
    fn get(&self) -> Result<Option<String>, StorageError> {
        let storage = self.local_storage()?;
        storage
            .get_item(TOKEN_KEY)
            .map_err(|_| StorageError("read blocked".to_string()))
    }

    fn set(&self, token: &str) -> Result<(), StorageError> {
        let storage = self.local_storage()?;
        storage
            .set_item(TOKEN_KEY, token)
            .map_err(|_| StorageError("write blocked".to_string()))
    }

    fn clear(&self) -> Result<(), StorageError> {
        let storage = self.local_storage()?;
        storage
            .remove_item(TOKEN_KEY)
            .map_err(|_| StorageError("remove blocked".to_string()))
    }
}

/// In-memory token persistence, used by the engine tests. Clones share the
/// same slot so a test can observe what the session persisted.
#[cfg(test)]
#[derive(Default, Clone)]
pub struct MemoryTokenStorage {
    token: Rc<RefCell<Option<String>>>,
}

#[cfg(test)]
impl MemoryTokenStorage {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Rc::new(RefCell::new(Some(token.to_string()))),
        }
    }

    pub fn persisted(&self) -> Option<String> {
        self.token.borrow().clone()
    }
}

#[cfg(test)]
impl TokenStorage for MemoryTokenStorage {
    fn get(&self) -> Result<Option<String>, StorageError> {
        Ok(self.token.borrow().clone())
    }

    fn set(&self, token: &str) -> Result<(), StorageError> {
        *self.token.borrow_mut() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.token.borrow_mut() = None;
        Ok(())
    }
}

/// The held session token plus its persistence. A held token means the
/// client is believed authenticated; callers invalidate it when the server
/// disagrees.
pub struct Session<S> {
    token: Option<String>,
    storage: S,
}

impl<S: TokenStorage> Session<S> {
    /// Reads any persisted token. Inaccessible storage is the same as no
    /// token.
    pub fn restore(storage: S) -> Self {
        let token = match storage.get() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(err) => {
                log::warn!("token restore failed: {}", err.0);
                None
            }
        };
        Self { token, storage }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    /// Hold and persist a fresh token. Persistence is best-effort: on
    /// failure the user stays logged in for this page load only.
    pub fn save(&mut self, token: String) {
        if let Err(err) = self.storage.set(&token) {
            log::warn!("token persist failed: {}", err.0);
        }
        self.token = Some(token);
    }

    /// Drop the token, best-effort on the persisted copy.
    pub fn clear(&mut self) {
        if let Err(err) = self.storage.clear() {
            log::warn!("token clear failed: {}", err.0);
        }
        self.token = None;
    }
}
