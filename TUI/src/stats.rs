//! Usage counters and their best-effort persistence.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Storage key holding the JSON-encoded counters
pub const STATS_KEY: &str = "flechazoStats";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Conversations analyzed
    pub analyzed: u64,
    /// Ice-breaker batches generated
    pub generated: u64,
}

/// Client-local key-value storage.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One file per key: `<dir>/<key>.json`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

#[cfg(test)]
impl<S: KeyValueStore + Sync + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Reads and writes [`Stats`] under [`STATS_KEY`]. Never fails: a missing or
/// corrupt value loads as zeros, and a failed write is only logged.
pub struct CounterStore {
    store: Box<dyn KeyValueStore>,
}

impl CounterStore {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> Stats {
        let raw = match self.store.get(STATS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Stats::default(),
            Err(e) => {
                log::error!("Could not read stats from storage: {}", e);
                return Stats::default();
            }
        };

        match parse_stats(&raw) {
            Ok(stats) => stats,
            Err(e) => {
                log::error!("Could not parse stats from storage: {}", e);
                Stats::default()
            }
        }
    }

    pub fn save(&self, stats: &Stats) {
        let result = serde_json::to_string(stats)
            .map_err(StorageError::from)
            .and_then(|json| self.store.set(STATS_KEY, &json));

        if let Err(e) = result {
            log::error!("Could not save stats to storage: {}", e);
        }
    }
}

/// Only a JSON object is a valid payload. The derived deserializer would also
/// take a sequence like `[1,2]` positionally.
fn parse_stats(raw: &str) -> Result<Stats, StorageError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_object() {
        return Err(StorageError::Serialize(serde::de::Error::custom(
            "stats payload is not a JSON object",
        )));
    }
    Ok(serde_json::from_value(value)?)
}
