//! Bearer-token store.
//!
//! The token is the opaque credential returned by login and attached to
//! every subsequent request. It lives in memory behind a mutex and is
//! optionally mirrored to a file so it survives process restarts.

use parking_lot::Mutex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared token cell. Cloning is cheap; all clones see the same token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    token: Mutex<Option<String>>,
    path: Option<PathBuf>,
}

impl TokenStore {
    /// Memory-only store; the token is gone when the process exits.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Inner {
                token: Mutex::new(None),
                path: None,
            }),
        }
    }

    /// File-backed store at an explicit path. Any token already in the
    /// file is loaded immediately.
    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let token = fs::read_to_string(&path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self {
            inner: Arc::new(Inner {
                token: Mutex::new(token),
                path: Some(path),
            }),
        }
    }

    /// File-backed store at the default per-user data path. `None` when
    /// no home directory can be determined.
    pub fn persistent() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("io", "keyfob", "keyfob")?;
        Some(Self::with_file(dirs.data_dir().join("token")))
    }

    /// Current token, if any.
    pub fn get(&self) -> Option<String> {
        self.inner.token.lock().clone()
    }

    /// Store a token, mirroring it to the backing file when configured.
    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        if let Some(path) = &self.inner.path {
            if let Err(e) = write_token_file(path, &token) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to persist token");
            }
        }
        *self.inner.token.lock() = Some(token);
    }

    /// Discard the token and remove the backing file when configured.
    pub fn clear(&self) {
        if let Some(path) = &self.inner.path {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove token file");
                }
            }
        }
        *self.inner.token.lock() = None;
    }
}

fn write_token_file(path: &Path, token: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, token)
}

// ── Tests ────────────────────────────────────────────────────────
