use async_trait::async_trait;
use crate::{FetchError, FinancialSnapshot, ValuationResult};

/// Source of financial snapshots (HTTP provider, local files, caches)
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn fetch_snapshot(&self, ticker: &str) -> Result<FinancialSnapshot, FetchError>;
}

/// Trait for value analysis engines. Total: every well-formed snapshot yields a result.
pub trait ValueAnalyzer: Send + Sync {
    fn analyze(&self, snapshot: FinancialSnapshot) -> ValuationResult;
}
