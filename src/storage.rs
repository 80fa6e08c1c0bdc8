//! Session-scoped persistence for sidebar state
//!
//! This module provides:
//! - The `SessionStore` seam the controller reads and writes through
//! - An in-memory store (one shared map per process, standing in for a tab)
//! - A file-backed store for native builds that must survive restarts

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[cfg(not(target_arch = "wasm32"))]
use std::{fs, path::PathBuf};

/// Collapsed flag, stored as `"true"` / `"false"`.
pub const SIDEBAR_COLLAPSED_KEY: &str = "sidebarCollapsed";
/// Scroll offset of the conversation list, consumed once on the next load.
pub const SIDEBAR_SCROLL_KEY: &str = "sidebarScrollTop";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Tab-scoped key/value storage.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// ============================================
// In-memory backend
// ============================================

static TAB_STORAGE: Lazy<MemorySessionStore> = Lazy::new(MemorySessionStore::default);

#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the process-wide store. Every controller built from it sees
    /// the same values, the way reloads within one tab do.
    pub fn tab() -> Self {
        TAB_STORAGE.clone()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

// ============================================
// File backend (native platforms)
// ============================================

/// One file per key under a session directory.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Debug)]
pub struct FileSessionStore {
    root: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileSessionStore {
    /// Store rooted in the platform's local data directory, falling back to
    /// a relative `cache/` directory when none is known.
    pub fn for_session(session: &str) -> Self {
        let base = match dirs::data_local_dir() {
            Some(data_dir) => data_dir.join("memoria"),
            None => PathBuf::from("cache"),
        };
        Self::under(base, session)
    }

    /// Store for `session` inside `base`, at `base/session/<session>`.
    pub fn under(base: impl Into<PathBuf>, session: &str) -> Self {
        Self {
            root: base.into().join("session").join(sanitize_key(session)),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.txt", sanitize_key(key)))
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ============================================
// Store selection
// ============================================

/// Session store for the running platform. Native builds keep one directory
/// per server so state survives restarts; the web build shares the tab store.
#[cfg(not(target_arch = "wasm32"))]
pub fn open_session_store(session: &str) -> Arc<dyn SessionStore> {
    let store = FileSessionStore::for_session(session);
    tracing::debug!(root = %store.root.display(), "using file session store");
    Arc::new(store)
}

#[cfg(target_arch = "wasm32")]
pub fn open_session_store(_session: &str) -> Arc<dyn SessionStore> {
    Arc::new(MemorySessionStore::tab())
}

/// Sanitize storage key for filesystem use
#[cfg(not(target_arch = "wasm32"))]
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect()
}
