use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;
use valuation_core::{HistoryEntry, ValuationResult};

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;
const FORMAT_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("History serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct HistoryFileRef<'a> {
    version: u32,
    entries: &'a [HistoryEntry],
}

#[derive(Deserialize)]
struct HistoryFile {
    #[allow(dead_code)]
    version: u32,
    entries: Vec<HistoryEntry>,
}

/// On-disk layouts accepted on load
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredHistory {
    Versioned(HistoryFile),
    Legacy(Vec<HistoryEntry>),
}

impl StoredHistory {
    fn into_entries(self) -> Vec<HistoryEntry> {
        match self {
            StoredHistory::Versioned(file) => file.entries,
            StoredHistory::Legacy(entries) => entries,
        }
    }
}

/// Bounded, newest-first log of past valuations with optional JSON persistence.
pub struct HistoryLog {
    path: Option<PathBuf>,
    capacity: usize,
    entries: Mutex<Vec<HistoryEntry>>,
}

impl HistoryLog {
    pub fn in_memory(capacity: usize) -> Self {
        Self {
            path: None,
            capacity: capacity.max(1),
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Load the log stored at `path`. A missing file starts empty, and so does
    /// an unreadable document (after a warning); the next write replaces it.
    pub async fn open(path: impl Into<PathBuf>, capacity: usize) -> Result<Self, HistoryError> {
        let path = path.into();
        let capacity = capacity.max(1);

        let mut entries = match tokio::fs::read_to_string(&path).await {
            Ok(text) => match serde_json::from_str::<StoredHistory>(&text) {
                Ok(stored) => stored.into_entries(),
                Err(e) => {
                    tracing::warn!("Ignoring corrupt history file {}: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        entries.truncate(capacity);

        tracing::debug!("Loaded {} history entries from {}", entries.len(), path.display());

        Ok(Self {
            path: Some(path),
            capacity,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn record(&self, result: &ValuationResult) -> Result<HistoryEntry, HistoryError> {
        self.record_at(result, Utc::now()).await
    }

    /// Prepend an entry for `result` and drop anything past capacity. The
    /// in-memory log is updated even when persisting fails.
    pub async fn record_at(
        &self,
        result: &ValuationResult,
        valuation_date: DateTime<Utc>,
    ) -> Result<HistoryEntry, HistoryError> {
        let entry = HistoryEntry::from_result(result, valuation_date);

        let mut entries = self.entries.lock().await;
        entries.insert(0, entry.clone());
        entries.truncate(self.capacity);
        self.persist(&entries).await?;

        Ok(entry)
    }

    pub async fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().await.clone()
    }

    pub async fn clear(&self) -> Result<(), HistoryError> {
        let mut entries = self.entries.lock().await;
        entries.clear();
        self.persist(&entries).await
    }

    async fn persist(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(&HistoryFileRef {
            version: FORMAT_VERSION,
            entries,
        })?;

        // replace via rename so readers never see a half-written file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}
