use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use valuation_core::{normalize_ticker, FetchError, FinancialSnapshot, SnapshotProvider};

use crate::payload::parse_snapshot_payload;

/// Reads snapshots from `{dir}/{TICKER}.json`.
#[derive(Debug, Clone)]
pub struct FileSnapshotProvider {
    dir: PathBuf,
}

impl FileSnapshotProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.json", ticker))
    }
}

#[async_trait]
impl SnapshotProvider for FileSnapshotProvider {
    async fn fetch_snapshot(&self, ticker: &str) -> Result<FinancialSnapshot, FetchError> {
        let ticker = normalize_ticker(ticker)?;
        let path = self.path_for(&ticker);
        tracing::debug!("Reading snapshot for {} from {}", ticker, path.display());

        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(FetchError::InvalidTicker(ticker));
            }
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                return Err(FetchError::Transport(format!("{}: {}", path.display(), e)));
            }
        };

        parse_snapshot_payload(&ticker, &text)
    }
}
