//! Persisted identity state.
//!
//! A small key-value slot holding the bearer credential and the signed-in
//! user's profile. It is read by every outgoing request and cleared as a
//! whole when any request comes back 401.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::ClientError;

/// Bearer credential sent as `Authorization: Bearer <token>`.
pub const KEY_AUTH_TOKEN: &str = "authToken";
pub const KEY_USER_NAME: &str = "userName";
pub const KEY_USER_EMAIL: &str = "userEmail";
pub const KEY_USER_PICTURE_URL: &str = "userPictureUrl";

/// Every key that belongs to the signed-in identity.
pub const IDENTITY_KEYS: &[&str] = &[
    KEY_AUTH_TOKEN,
    KEY_USER_PICTURE_URL,
    KEY_USER_NAME,
    KEY_USER_EMAIL,
];

/// Key-value storage for session state.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError>;

    fn remove(&self, key: &str) -> Result<(), ClientError>;

    /// Remove all identity keys.
    fn clear_identity(&self) -> Result<(), ClientError> {
        for key in IDENTITY_KEYS {
            self.remove(key)?;
        }
        Ok(())
    }

    /// The stored bearer credential, if any. Empty strings count as absent.
    fn auth_token(&self) -> Option<String> {
        self.get(KEY_AUTH_TOKEN).filter(|t| !t.is_empty())
    }
}

/* --------------------------------------------------------------------------
In-memory store
-------------------------------------------------------------------------- */

/// Non-persistent store for tests and one-shot runs.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store
            .write_entries()
            .insert(KEY_AUTH_TOKEN.to_string(), token.to_string());
        store
    }

    fn write_entries(&self) -> std::sync::RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.write_entries()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.write_entries().remove(key);
        Ok(())
    }
}

/* --------------------------------------------------------------------------
File-backed store
-------------------------------------------------------------------------- */

/// Store persisted as a flat JSON object on disk.
///
/// The whole file is rewritten on every mutation through a sibling
/// temporary file and a rename, so a crash never leaves a torn file.
pub struct FileSessionStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileSessionStore {
    /// Open the store at `path`, loading existing entries if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        let entries = match std::fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                ClientError::Session(format!("Corrupt session file {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), keys = entries.len(), "Session store opened");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `f` to a copy of the entries and swap it in only once the copy
    /// is on disk. A failed write leaves memory and file unchanged.
    fn mutate<F>(&self, f: F) -> Result<(), ClientError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        let mut next = entries.clone();
        f(&mut next);
        persist(&self.path, &next)?;
        *entries = next;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ClientError> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), ClientError> {
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    /// All identity keys go in one write, so the file never holds a
    /// partial identity.
    fn clear_identity(&self) -> Result<(), ClientError> {
        self.mutate(|entries| {
            for key in IDENTITY_KEYS {
                entries.remove(*key);
            }
        })
    }
}

fn persist(path: &Path, entries: &BTreeMap<String, String>) -> Result<(), ClientError> {
    let json = serde_json::to_vec_pretty(entries)
        .map_err(|e| ClientError::Session(format!("Failed to encode session: {e}")))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
