//! Bounded download history
//!
//! A fixed-capacity, most-recent-first list of completed downloads kept on
//! the client side. Serialization is isolated in pure functions so the list
//! type itself stays storage-agnostic; [`HistoryStore`] adds the file-backed
//! persistence the terminal client uses.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::core::models::{AppError, AppResult};

/// Maximum number of entries retained; inserting past this evicts the oldest.
pub const HISTORY_CAPACITY: usize = 10;

/// One completed download.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub video_id: String,

    pub title: String,

    pub quality: String,

    pub file_name: String,

    pub timestamp: DateTime<Utc>,
}

/// Most-recent-first list of downloads, capped at [`HISTORY_CAPACITY`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DownloadHistory {
    entries: VecDeque<HistoryEntry>,
}

impl DownloadHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front, evicting the oldest entry past capacity.
    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn most_recent(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serialize a history to JSON, newest entry first.
pub fn serialize_history(history: &DownloadHistory) -> AppResult<String> {
    serde_json::to_string_pretty(&history.entries.iter().collect::<Vec<_>>())
        .map_err(|e| AppError::Parse(format!("Failed to serialize history: {e}")))
}

/// Deserialize a history from JSON, clamping to capacity.
///
/// A blob written by an older build with more entries loads fine; everything
/// past [`HISTORY_CAPACITY`] is dropped from the old end.
pub fn deserialize_history(json: &str) -> AppResult<DownloadHistory> {
    let entries: Vec<HistoryEntry> = serde_json::from_str(json)
        .map_err(|e| AppError::Parse(format!("Failed to parse history: {e}")))?;

    let mut history = DownloadHistory::new();
    for entry in entries.into_iter().rev() {
        history.record(entry);
    }
    Ok(history)
}

/// File-backed history storage under a fixed path.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    /// Store under the platform data directory.
    pub fn open_default() -> AppResult<Self> {
        let dirs = ProjectDirs::from("com", "tuberelay", "tube-relay").ok_or_else(|| {
            AppError::Config("Failed to resolve project data directory".to_string())
        })?;
        Ok(Self::at(dirs.data_dir().join("history.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored history; a missing file is an empty history.
    pub fn load(&self) -> AppResult<DownloadHistory> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => deserialize_history(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(DownloadHistory::new()),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    pub fn save(&self, history: &DownloadHistory) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serialize_history(history)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> HistoryEntry {
        HistoryEntry {
            video_id: format!("vid{n}"),
            title: format!("Video {n}"),
            quality: "720p".to_string(),
            file_name: format!("vid{n}_22.mp4"),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_most_recent_first() {
        let mut history = DownloadHistory::new();
        history.record(entry(1));
        history.record(entry(2));

        assert_eq!(history.len(), 2);
        assert_eq!(history.most_recent().unwrap().video_id, "vid2");
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = DownloadHistory::new();
        for n in 1..=11 {
            history.record(entry(n));
        }

        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.most_recent().unwrap().video_id, "vid11");
        // entry 1 fell off the old end
        assert!(history.entries().all(|e| e.video_id != "vid1"));
        assert!(history.entries().any(|e| e.video_id == "vid2"));
    }

    #[test]
    fn test_json_round_trip_preserves_order() {
        let mut history = DownloadHistory::new();
        for n in 1..=3 {
            history.record(entry(n));
        }

        let json = serialize_history(&history).unwrap();
        let restored = deserialize_history(&json).unwrap();
        assert_eq!(restored, history);
        assert_eq!(restored.most_recent().unwrap().video_id, "vid3");
    }

    #[test]
    fn test_deserialize_clamps_oversized_blob() {
        let oversized: Vec<HistoryEntry> = (1..=15).rev().map(entry).collect();
        let json = serde_json::to_string(&oversized).unwrap();

        let history = deserialize_history(&json).unwrap();
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.most_recent().unwrap().video_id, "vid15");
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(matches!(
            deserialize_history("not json"),
            Err(AppError::Parse(_))
        ));
    }

    #[test]
    fn test_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::at(dir.path().join("nested").join("history.json"));

        assert!(store.load().unwrap().is_empty());

        let mut history = DownloadHistory::new();
        history.record(entry(1));
        store.save(&history).unwrap();

        assert_eq!(store.load().unwrap(), history);
    }
}
