//! Typed persisted state.
//!
//! A single JSON document (`state.json`) holds the handful of values the
//! client keeps between runs. Every key is a [`StateKey`] carrying its value
//! type, so callers never parse or stringify by hand.

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use proconect_types::SessionUser;

use crate::config::DATA_DIR_ENV;
use crate::error::ClientError;

const DATA_DIR: &str = ".proconect";
const STATE_FILE: &str = "state.json";

/// Proposal count per listing id, as last seen by the watcher.
pub type ProposalCounts = BTreeMap<i64, usize>;

/// A named slot in the persisted document, typed by its value.
#[derive(Debug)]
pub struct StateKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StateKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self { name, _marker: PhantomData }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }
}

/// Keys used by the client.
pub mod keys {
    use super::{ProposalCounts, SessionUser, StateKey};

    pub const USUARIO_LOGADO: StateKey<SessionUser> = StateKey::new("usuarioLogado");
    pub const ACCESS_TOKEN: StateKey<String> = StateKey::new("access_token");
    pub const REFRESH_TOKEN: StateKey<String> = StateKey::new("refresh_token");
    pub const PROPOSTAS_CONTADAS: StateKey<ProposalCounts> =
        StateKey::new("ultimasPropostasContadas");
}

/// Get data directory path.
///
/// Priority:
/// 1. `PROCONECT_DATA_DIR` environment variable
/// 2. `~/.proconect`
pub fn get_data_dir() -> Result<PathBuf, ClientError> {
    let data_dir = if let Ok(custom_dir) = std::env::var(DATA_DIR_ENV) {
        PathBuf::from(custom_dir)
    } else {
        let home = dirs::home_dir()
            .ok_or_else(|| ClientError::Storage("Cannot get home directory".to_string()))?;
        home.join(DATA_DIR)
    };

    if !data_dir.exists() {
        fs::create_dir_all(&data_dir)?;
    }

    Ok(data_dir)
}

/// JSON-document key/value store with typed accessors.
#[derive(Debug)]
pub struct PersistedState {
    path: Option<PathBuf>,
    entries: Mutex<Map<String, Value>>,
}

impl PersistedState {
    /// State that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self { path: None, entries: Mutex::new(Map::new()) }
    }

    /// Open `state.json` inside `dir`, creating the directory if needed.
    pub fn open_in(dir: &Path) -> Result<Self, ClientError> {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        Self::open(dir.join(STATE_FILE))
    }

    /// Open the document at `path`.
    ///
    /// A missing file is an empty state. A corrupt file is logged and
    /// replaced on the next write.
    pub fn open(path: PathBuf) -> Result<Self, ClientError> {
        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str::<Map<String, Value>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Discarding unreadable state file");
                    Map::new()
                },
            }
        } else {
            Map::new()
        };
        Ok(Self { path: Some(path), entries: Mutex::new(entries) })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read a value; a stored value of the wrong shape reads as absent.
    pub fn get<T: DeserializeOwned>(&self, key: &StateKey<T>) -> Option<T> {
        let raw = self.entries.lock().get(key.name)?.clone();
        match serde_json::from_value(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = key.name, error = %e, "Ignoring malformed persisted value");
                None
            },
        }
    }

    pub fn set<T: Serialize>(&self, key: &StateKey<T>, value: &T) -> Result<(), ClientError> {
        let encoded = serde_json::to_value(value)?;
        let mut entries = self.entries.lock();
        entries.insert(key.name.to_string(), encoded);
        self.flush(&entries)
    }

    pub fn remove<T>(&self, key: &StateKey<T>) -> Result<(), ClientError> {
        let mut entries = self.entries.lock();
        if entries.remove(key.name).is_none() {
            return Ok(());
        }
        self.flush(&entries)
    }

    /// Read-modify-write under one lock; absent or malformed values start
    /// from `T::default()`.
    pub fn update<T, F>(&self, key: &StateKey<T>, updater: F) -> Result<T, ClientError>
    where
        T: Serialize + DeserializeOwned + Default + Clone,
        F: FnOnce(&mut T),
    {
        let mut entries = self.entries.lock();
        let mut value = entries
            .get(key.name)
            .cloned()
            .and_then(|raw| serde_json::from_value::<T>(raw).ok())
            .unwrap_or_default();
        updater(&mut value);
        entries.insert(key.name.to_string(), serde_json::to_value(&value)?);
        self.flush(&entries)?;
        Ok(value)
    }

    /// Merge `patch` into the stored map, keeping keys it does not mention.
    pub fn merge<K, V>(&self, key: &StateKey<BTreeMap<K, V>>, patch: BTreeMap<K, V>) -> Result<BTreeMap<K, V>, ClientError>
    where
        K: Ord + Serialize + DeserializeOwned + Clone,
        V: Serialize + DeserializeOwned + Clone,
    {
        self.update(key, |current| current.extend(patch))
    }

    fn flush(&self, entries: &Map<String, Value>) -> Result<(), ClientError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = serde_json::to_string_pretty(entries)?;
        let temp_path = path.with_extension("json.tmp");

        // Atomic write
        fs::write(&temp_path, content)
            .map_err(|e| ClientError::Storage(format!("Failed to write {}: {e}", temp_path.display())))?;
        fs::rename(&temp_path, path)
            .map_err(|e| ClientError::Storage(format!("Failed to save {}: {e}", path.display())))
    }
}
