//! Session token storage and the explicit session context handed to view-models.

use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use anyhow::{Context, Result};
use tracing::debug;

use crate::error::ClientError;

/// Holder of the single opaque session token. The core only reads and
/// writes through this trait and never persists tokens on its own.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn set(&self, token: &str) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| anyhow::anyhow!("token lock poisoned"))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| anyhow::anyhow!("token lock poisoned"))?;
        *guard = None;
        Ok(())
    }
}

/// Token kept in a single file, one line.
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
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        let raw = fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!(
                    "failed to create token directory '{}'",
                    parent.display()
                )
            })?;
        }
        let mut file = open_private(&self.path)
            .with_context(|| format!("failed to open token file '{}'", self.path.display()))?;
        // mode() only applies on creation; tighten a file that already existed
        restrict_permissions(&self.path)?;
        file.write_all(token.as_bytes())
            .with_context(|| format!("failed to write token file '{}'", self.path.display()))?;
        debug!(path = %self.path.display(), "session token stored");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| {
                format!("failed to remove token file '{}'", self.path.display())
            }),
        }
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("failed to restrict permissions on '{}'", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// Explicit session handle. Token presence is the only authentication
/// signal the view-models consult.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn TokenStore>,
}

impl SessionContext {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.store.get().filter(|token| !token.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn require_token(&self) -> Result<String, ClientError> {
        self.token().ok_or(ClientError::Unauthenticated)
    }

    pub fn sign_in(&self, token: &str) -> Result<(), ClientError> {
        self.store
            .set(token)
            .map_err(|err| ClientError::TokenStore(format!("{err:#}")))
    }

    pub fn sign_out(&self) -> Result<(), ClientError> {
        self.store
            .clear()
            .map_err(|err| ClientError::TokenStore(format!("{err:#}")))
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
