//! Persistence gateway over a key-value blob store.
//!
//! The whole `AppState` is written as one JSON blob under a key that embeds
//! the schema version. Bumping the version is the migration strategy: blobs
//! under an older key are ignored, never transformed.
//!
//! Loading never fails. Missing or unusable data falls back to a fresh
//! default state, and write failures are logged and swallowed so the
//! in-memory state stays authoritative for the session.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{ImportError, StoreError};
use crate::model::{default_start_date, AppState, RecordId, TestRecord, UiState};

/// Version of the persisted layout.
pub const SCHEMA_VERSION: u32 = 4;

/// Key the state blob lives under.
pub const STORAGE_KEY: &str = "ielts_tracker_data_v4";

/// A string key-value store.
pub trait BlobStore {
    /// Fetch the blob stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the blob stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, optionally capped at a number of bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that refuses writes once its contents would exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota: Some(bytes),
        }
    }

    fn used_except(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let needed = key.len() + value.len();
            let available = quota.saturating_sub(self.used_except(key));
            if needed > available {
                return Err(StoreError::QuotaExceeded { needed, available });
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Decode a state blob.
///
/// Only `records` is mandatory. A missing or unparsable `startDate` falls
/// back to the default anchor and a missing or malformed `uiState` to the
/// library view. Bands are re-derived from the stored scores.
///
/// A bad record never costs the others their progress: out-of-range score
/// fields are cleared, a record that does not decode is rebuilt from its id
/// (or dropped without one), and repeated ids keep their first occurrence.
pub fn decode_state(payload: &str) -> Result<AppState, ImportError> {
    let value: Value = serde_json::from_str(payload)?;

    let Some(Value::Array(items)) = value.get("records") else {
        return Err(ImportError::MissingRecords);
    };

    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Some(mut record) = decode_record(index, item) else {
            continue;
        };
        if !seen.insert(record.id) {
            tracing::warn!("record {index}: duplicate id {}, dropped", record.id);
            continue;
        }
        // The id is authoritative.
        record.book_number = record.id.book;
        record.test_number = record.id.test;
        for error in record.scores.clear_invalid() {
            tracing::warn!("record {}: {error}, field cleared", record.id);
        }
        records.push(record);
    }

    let start_date = value
        .get("startDate")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(default_start_date);

    let ui_state = value
        .get("uiState")
        .and_then(|v| UiState::deserialize(v).ok())
        .unwrap_or_default();

    let mut state = AppState {
        start_date,
        records,
        ui_state,
    };
    state.refresh_bands();
    Ok(state)
}

/// Decode one record, salvaging what can be salvaged.
fn decode_record(index: usize, item: &Value) -> Option<TestRecord> {
    let error = match TestRecord::deserialize(item) {
        Ok(record) => return Some(record),
        Err(e) => e,
    };

    if let Value::Object(fields) = item {
        let mut stripped = fields.clone();
        stripped.remove("scores");
        stripped.remove("calculatedBand");
        if let Ok(record) = TestRecord::deserialize(&Value::Object(stripped)) {
            tracing::warn!("record {}: unreadable scores discarded: {error}", record.id);
            return Some(record);
        }
    }

    match item
        .get("id")
        .and_then(Value::as_str)
        .and_then(|id| id.parse::<RecordId>().ok())
    {
        Some(id) => {
            tracing::warn!("record {id}: malformed, reset to untouched: {error}");
            Some(TestRecord::new(id.book, id.test))
        }
        None => {
            tracing::warn!("record {index}: malformed and without a usable id, dropped: {error}");
            None
        }
    }
}

/// Loads and saves the application state through a `BlobStore`.
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S: BlobStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the stored state, or a fresh default one.
    pub fn load(&self) -> AppState {
        let blob = match self.store.get(STORAGE_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                tracing::debug!("no stored state under {STORAGE_KEY}, starting fresh");
                return AppState::default();
            }
            Err(e) => {
                tracing::warn!("failed to read stored state: {e}");
                return AppState::default();
            }
        };

        match decode_state(&blob) {
            Ok(state) => {
                tracing::debug!("loaded {} records", state.records.len());
                state
            }
            Err(e) => {
                tracing::warn!("stored state is unusable, starting fresh: {e}");
                AppState::default()
            }
        }
    }

    /// Write the state. Failures are logged, never returned.
    pub fn save(&mut self, state: &AppState) {
        let blob = match serde_json::to_string(state) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::error!("failed to serialize state: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(STORAGE_KEY, &blob) {
            tracing::error!("failed to save state: {e}");
        }
    }
}
