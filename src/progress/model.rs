use serde::{Deserialize, Serialize};

use crate::tmdb::MediaType;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchProgressEntry {
    pub id: u64,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_name: Option<String>,
    /// Playback position in seconds, when the player reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Epoch milliseconds, stamped by the store.
    pub last_watched: i64,
}

impl WatchProgressEntry {
    pub fn matches(&self, id: u64, media_type: MediaType) -> bool {
        self.id == id && self.media_type == media_type
    }
}

/// A progress record as callers submit it; the store adds the timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub id: u64,
    pub media_type: MediaType,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub episode_name: Option<String>,
    pub timestamp: Option<i64>,
}

impl ProgressUpdate {
    pub fn movie(id: u64) -> Self {
        Self {
            id,
            media_type: MediaType::Movie,
            season: None,
            episode: None,
            episode_name: None,
            timestamp: None,
        }
    }

    pub fn episode(id: u64, season: u32, episode: u32, episode_name: Option<String>) -> Self {
        Self {
            id,
            media_type: MediaType::Tv,
            season: Some(season),
            episode: Some(episode),
            episode_name,
            timestamp: None,
        }
    }

    pub fn at_position(mut self, seconds: i64) -> Self {
        self.timestamp = Some(seconds);
        self
    }

    pub(crate) fn stamp(self, last_watched: i64) -> WatchProgressEntry {
        WatchProgressEntry {
            id: self.id,
            media_type: self.media_type,
            season: self.season,
            episode: self.episode,
            episode_name: self.episode_name,
            timestamp: self.timestamp,
            last_watched,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StoredProgressRef<'a> {
    pub version: u32,
    pub entries: &'a [WatchProgressEntry],
}

/// Either layout found on disk: the versioned envelope or the bare array
/// written before versioning existed.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum StoredProgress {
    Versioned {
        version: u32,
        entries: Vec<WatchProgressEntry>,
    },
    Legacy(Vec<WatchProgressEntry>),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt progress data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported progress schema version {0}")]
    UnsupportedVersion(u32),
}

pub type StorageResult<T> = Result<T, StorageError>;
