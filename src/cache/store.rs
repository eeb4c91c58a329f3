// Cache store for reading and writing cached API responses.
// Handles JSON serialization, snapshot envelopes, and filesystem operations.

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::Result;

use super::paths::{CacheKey, CacheLayout};

/// Envelope for whole-collection caches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<T> {
    /// When the collection was captured.
    pub timestamp: DateTime<Utc>,
    /// Whether pagination reached the last page.
    #[serde(default)]
    pub complete: bool,
    /// The collected items.
    pub items: T,
}

impl<T> Snapshot<T> {
    pub fn new(items: T, complete: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            complete,
            items,
        }
    }
}

/// Key-value store of JSON files under a cache root.
///
/// Entries never expire; they stay valid until [`CacheStore::invalidate`]
/// removes them.
#[derive(Debug, Clone)]
pub struct CacheStore {
    layout: CacheLayout,
}

impl CacheStore {
    pub fn new(layout: CacheLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }

    /// Check if an entry exists for `key`.
    pub fn exists(&self, key: &CacheKey) -> bool {
        self.layout.path_for(key).exists()
    }

    /// Read the entry for `key`.
    ///
    /// Returns `Ok(None)` when nothing is cached and an error when the file
    /// exists but cannot be read or decoded.
    pub fn load<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>> {
        let path = self.layout.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)?;
        let value = serde_json::from_str(&contents)?;
        Ok(Some(value))
    }

    /// Write the entry for `key`, replacing any previous one.
    pub fn save<T: Serialize>(&self, key: &CacheKey, value: &T) -> Result<()> {
        let json = match key {
            CacheKey::PokemonList | CacheKey::EvolutionChainList => {
                serde_json::to_string_pretty(value)?
            }
            _ => serde_json::to_string(value)?,
        };
        write_atomic(&self.layout.path_for(key), json.as_bytes())
    }

    /// Remove the entry for `key`. Missing entries are not an error.
    pub fn invalidate(&self, key: &CacheKey) -> Result<()> {
        let path = self.layout.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Write bytes via a temp file and rename, creating parent directories.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}
