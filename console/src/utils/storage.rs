use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Keys under which the session tokens are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKey {
    AccessToken,
    RefreshToken,
}

impl TokenKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKey::AccessToken => "access_token",
            TokenKey::RefreshToken => "refresh_token",
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("session store lock poisoned")]
    Poisoned,
}

/// Client-local key/value storage for the session tokens.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    fn get(&self, key: TokenKey) -> Result<Option<String>, SessionError>;
    fn set(&self, key: TokenKey, value: &str) -> Result<(), SessionError>;
    fn clear(&self, key: TokenKey) -> Result<(), SessionError>;
}

/// Removes both tokens, leaving the store in a fully logged-out state.
pub fn clear_session(store: &dyn SessionStore) -> Result<(), SessionError> {
    store.clear(TokenKey::AccessToken)?;
    store.clear(TokenKey::RefreshToken)
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    tokens: Mutex<HashMap<TokenKey, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access_token: Option<&str>, refresh_token: Option<&str>) -> Self {
        let store = Self::new();
        if let Ok(mut tokens) = store.tokens.lock() {
            if let Some(token) = access_token {
                tokens.insert(TokenKey::AccessToken, token.to_string());
            }
            if let Some(token) = refresh_token {
                tokens.insert(TokenKey::RefreshToken, token.to_string());
            }
        }
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: TokenKey) -> Result<Option<String>, SessionError> {
        let tokens = self.tokens.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(tokens.get(&key).cloned())
    }

    fn set(&self, key: TokenKey, value: &str) -> Result<(), SessionError> {
        let mut tokens = self.tokens.lock().map_err(|_| SessionError::Poisoned)?;
        tokens.insert(key, value.to_string());
        Ok(())
    }

    fn clear(&self, key: TokenKey) -> Result<(), SessionError> {
        let mut tokens = self.tokens.lock().map_err(|_| SessionError::Poisoned)?;
        tokens.remove(&key);
        Ok(())
    }
}

/// JSON file backed store, shared by successive CLI invocations.
///
/// The file is re-read on every access so that several processes observe the
/// same session. Writes go through a temporary file and a rename.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> SessionError {
        SessionError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_tokens(&self) -> Result<BTreeMap<String, String>, SessionError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(self.io_error(err)),
        };
        match serde_json::from_slice(&raw) {
            Ok(tokens) => Ok(tokens),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "session file is unreadable, treating session as empty"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    /// Writes through a uniquely named owner-only temp file in the same
    /// directory, then renames it over the session file.
    fn write_tokens(&self, tokens: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
                parent
            }
            None => Path::new("."),
        };
        let payload = serde_json::to_vec_pretty(tokens)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(&payload).map_err(|e| self.io_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path)
            .map(|_| ())
            .map_err(|e| self.io_error(e.error))
    }

    fn update<F>(&self, apply: F) -> Result<(), SessionError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.write_lock.lock().map_err(|_| SessionError::Poisoned)?;
        let mut tokens = self.read_tokens()?;
        apply(&mut tokens);
        self.write_tokens(&tokens)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: TokenKey) -> Result<Option<String>, SessionError> {
        Ok(self.read_tokens()?.remove(key.as_str()))
    }

    fn set(&self, key: TokenKey, value: &str) -> Result<(), SessionError> {
        self.update(|tokens| {
            tokens.insert(key.as_str().to_string(), value.to_string());
        })
    }

    fn clear(&self, key: TokenKey) -> Result<(), SessionError> {
        self.update(|tokens| {
            tokens.remove(key.as_str());
        })
    }
}
