//! Disk-based cache of fare lookups.
//!
//! Each entry is one JSON file named `<key>.json` holding the unix timestamp
//! at which it was written and the leg record itself. Lookups honour the TTL;
//! scanning the whole cache to build a leg store does not, since an old fare
//! is still a fare.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::connector::PaymentType;
use crate::domain::{LegRecord, LocationCode, format_date};

/// Default cache TTL: 24 hours.
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Error from the leg cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Filesystem failure
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Entry could not be encoded
    #[error("failed to serialize cache entry: {0}")]
    Serialize(#[from] serde_json::Error),

    /// System clock is before the unix epoch
    #[error("system time before unix epoch")]
    Clock,
}

/// Configuration for the leg cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Directory holding one file per entry.
    pub dir: PathBuf,
    /// How long an entry satisfies a lookup.
    pub ttl: Duration,
}

impl CacheConfig {
    /// Create a config for `dir` with the default TTL (24 hours).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::new("cache")
    }
}

/// Identifies one fare lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub connector: String,
    pub origin: LocationCode,
    pub destination: LocationCode,
    pub date: NaiveDate,
    pub payment: PaymentType,
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}_flight_{}",
            self.connector,
            self.origin,
            self.destination,
            format_date(self.date),
            self.payment
        )
    }
}

/// On-disk entry.
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    /// Unix timestamp (seconds) when the entry was written.
    timestamp: f64,
    /// The cached leg.
    result: LegRecord,
}

/// Disk cache of leg records.
#[derive(Debug, Clone)]
pub struct LegCache {
    config: CacheConfig,
}

impl LegCache {
    /// Create a new cache with the given config.
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.config.dir.join(format!("{key}.json"))
    }

    /// Fetch the record stored under `key`.
    ///
    /// Returns `None` if the entry doesn't exist, is invalid, or has expired.
    pub fn get(&self, key: &CacheKey) -> Option<LegRecord> {
        let contents = std::fs::read_to_string(self.path_for(key)).ok()?;
        let entry: CacheEntry = serde_json::from_str(&contents).ok()?;

        let age = now_secs().ok()? - entry.timestamp;
        if age >= self.config.ttl.as_secs_f64() {
            debug!(key = %key, age_secs = age, "Cache entry expired");
            return None;
        }

        Some(entry.result)
    }

    /// Store `record` under `key`, stamped with the current time.
    ///
    /// Creates the cache directory if it doesn't exist.
    pub fn set(&self, key: &CacheKey, record: &LegRecord) -> Result<(), CacheError> {
        let entry = CacheEntry {
            timestamp: now_secs()?,
            result: record.clone(),
        };

        let dir = &self.config.dir;
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir).map_err(|source| CacheError::Io {
                path: dir.clone(),
                source,
            })?;
        }

        let json = serde_json::to_string(&entry)?;
        let path = self.path_for(key);
        std::fs::write(&path, json).map_err(|source| CacheError::Io { path, source })?;

        debug!(key = %key, "Cached leg");
        Ok(())
    }

    /// Read every record in the cache, ignoring the TTL.
    ///
    /// Files that fail to parse are logged and skipped. A missing directory
    /// yields no records. Records come back ordered by file name.
    pub fn load_all(&self) -> Result<Vec<LegRecord>, CacheError> {
        let dir = &self.config.dir;
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(CacheError::Io {
                    path: dir.clone(),
                    source,
                });
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            match read_entry(&path) {
                Ok(entry) => records.push(entry.result),
                Err(reason) => warn!(path = %path.display(), %reason, "Skipping unreadable cache file"),
            }
        }

        debug!(dir = %dir.display(), records = records.len(), "Loaded cache");
        Ok(records)
    }

    /// Get the cache directory.
    pub fn dir(&self) -> &Path {
        &self.config.dir
    }

    /// Get the cache TTL.
    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }
}

fn read_entry(path: &Path) -> Result<CacheEntry, String> {
    let contents = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&contents).map_err(|e| e.to_string())
}

fn now_secs() -> Result<f64, CacheError> {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .map_err(|_| CacheError::Clock)
}
