use std::sync::Mutex;
use tracing::{debug, error, warn};

use super::backend::StorageBackend;
use super::model::*;
use crate::tmdb::MediaType;

pub const PROGRESS_KEY: &str = "vitro_watch_progress";
pub const DEFAULT_MAX_HISTORY: usize = 20;

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// Recency-ordered watch history, one entry per (id, type), newest first.
///
/// Storage failures never reach the caller: reads degrade to an empty list
/// and writes are dropped, both with a log line.
pub struct ProgressStore {
    backend: Box<dyn StorageBackend>,
    max_history: usize,
    clock: Clock,
    write_lock: Mutex<()>,
}

impl ProgressStore {
    pub fn new(backend: Box<dyn StorageBackend>, max_history: usize) -> Self {
        Self::with_clock(backend, max_history, || chrono::Utc::now().timestamp_millis())
    }

    pub fn with_clock(
        backend: Box<dyn StorageBackend>,
        max_history: usize,
        clock: impl Fn() -> i64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            backend,
            max_history: max_history.max(1),
            clock: Box::new(clock),
            write_lock: Mutex::new(()),
        }
    }

    pub fn list(&self) -> Vec<WatchProgressEntry> {
        match self.read() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Error reading watch progress: {}", e);
                Vec::new()
            }
        }
    }

    pub fn find(&self, id: u64, media_type: MediaType) -> Option<WatchProgressEntry> {
        self.list().into_iter().find(|p| p.matches(id, media_type))
    }

    /// Record a playback event. Any earlier entry for the same title is
    /// dropped and the new one goes to the head of the list.
    pub fn save(&self, update: ProgressUpdate) {
        let _guard = self.lock();
        let entry = update.stamp((self.clock)());

        let mut all = self.list();
        all.retain(|p| !p.matches(entry.id, entry.media_type));
        all.insert(0, entry);
        if all.len() > self.max_history {
            debug!("Trimming watch progress to {} entries", self.max_history);
            all.truncate(self.max_history);
        }

        if let Err(e) = self.write(&all) {
            error!("Error saving watch progress: {}", e);
        }
    }

    pub fn remove(&self, id: u64, media_type: MediaType) {
        let _guard = self.lock();
        let mut all = self.list();
        let before = all.len();
        all.retain(|p| !p.matches(id, media_type));
        if all.len() == before {
            return;
        }

        if let Err(e) = self.write(&all) {
            error!("Error removing watch progress: {}", e);
        }
    }

    pub fn clear(&self) {
        let _guard = self.lock();
        if let Err(e) = self.backend.remove(PROGRESS_KEY) {
            error!("Error clearing watch progress: {}", e);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self) -> StorageResult<Vec<WatchProgressEntry>> {
        let Some(data) = self.backend.get(PROGRESS_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<StoredProgress>(&data)? {
            StoredProgress::Versioned { version, entries } if version == SCHEMA_VERSION => Ok(entries),
            StoredProgress::Versioned { version, .. } => Err(StorageError::UnsupportedVersion(version)),
            StoredProgress::Legacy(entries) => Ok(entries),
        }
    }

    fn write(&self, entries: &[WatchProgressEntry]) -> StorageResult<()> {
        let data = serde_json::to_string(&StoredProgressRef {
            version: SCHEMA_VERSION,
            entries,
        })?;
        self.backend.set(PROGRESS_KEY, &data)
    }
}
