// Cache stores for memoized API responses.
// Entries carry their write time; readers pass the TTL and get nothing back once it has elapsed.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::error::{ForgeError, Result};

use super::paths;

/// Default TTL for cached responses: one hour.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Wrapper for cached data with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    /// Full cache key, kept so on-disk entries can be checked against the requested key.
    pub key: String,
    /// The cached data.
    pub data: T,
    /// When the data was cached.
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(key: impl Into<String>, data: T) -> Self {
        Self {
            key: key.into(),
            data,
            cached_at: Utc::now(),
        }
    }

    /// Check if this cached data has expired based on TTL.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        let elapsed = Utc::now()
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        elapsed >= ttl
    }

    pub fn is_valid(&self, ttl: Duration) -> bool {
        !self.is_expired(ttl)
    }
}

/// Key/value store backing `ForgeClient`'s response memoization.
///
/// Implementations must be safe to share between tasks; the client never
/// locks around them.
pub trait CacheStore: Send + Sync {
    /// Return the value stored under `key` if it was written less than `ttl` ago.
    fn read(&self, key: &str, ttl: Duration) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing any previous entry.
    fn write(&self, key: &str, value: &Value) -> Result<()>;
}

/// Process-local store. Every read drops all entries older than the TTL it is given.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, CachedData<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, CachedData<Value>>>> {
        self.entries
            .lock()
            .map_err(|_| ForgeError::Io(std::io::Error::other("memory cache lock poisoned")))
    }
}

impl CacheStore for MemoryStore {
    fn read(&self, key: &str, ttl: Duration) -> Result<Option<Value>> {
        let mut entries = self.lock()?;
        entries.retain(|_, cached| cached.is_valid(ttl));
        Ok(entries.get(key).map(|cached| cached.data.clone()))
    }

    fn write(&self, key: &str, value: &Value) -> Result<()> {
        self.lock()?
            .insert(key.to_string(), CachedData::new(key, value.clone()));
        Ok(())
    }
}

/// One JSON file per entry under a cache directory. Survives process restarts.
#[derive(Debug, Clone)]
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the platform cache directory (~/.cache/github-forge on Linux).
    pub fn default_location() -> Result<Self> {
        paths::responses_dir()
            .map(Self::new)
            .ok_or_else(|| ForgeError::Config("could not determine cache directory".to_string()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CacheStore for DiskStore {
    fn read(&self, key: &str, ttl: Duration) -> Result<Option<Value>> {
        let path = paths::entry_path(&self.dir, key);
        match read_cached::<Value>(&path)? {
            Some(cached) if cached.key == key && cached.is_valid(ttl) => Ok(Some(cached.data)),
            _ => Ok(None),
        }
    }

    fn write(&self, key: &str, value: &Value) -> Result<()> {
        let path = paths::entry_path(&self.dir, key);
        write_cached(&path, key, value)
    }
}

/// Read cached JSON data from a file.
pub fn read_cached<T: DeserializeOwned>(path: &Path) -> Result<Option<CachedData<T>>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    let cached: CachedData<T> = serde_json::from_str(&contents)?;
    Ok(Some(cached))
}

/// Write data to cache as JSON.
pub fn write_cached<T: Serialize>(path: &Path, key: &str, data: &T) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let cached = CachedData::new(key, data);
    let json = serde_json::to_string(&cached)?;

    // Write atomically via a uniquely named temp file in the same directory
    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(json.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| ForgeError::Io(e.error))?;

    Ok(())
}
