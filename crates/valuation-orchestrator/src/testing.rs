use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use valuation_core::{FetchError, FinancialSnapshot, SnapshotProvider};

pub(crate) fn acme_snapshot() -> FinancialSnapshot {
    let mut snapshot: FinancialSnapshot =
        serde_json::from_str(include_str!("../../../snapshots/ACME.json")).unwrap();
    snapshot.sort_history();
    snapshot
}

pub(crate) fn renamed(ticker: &str, eps: f64) -> FinancialSnapshot {
    let mut snapshot = acme_snapshot();
    snapshot.ticker = ticker.to_string();
    snapshot.company_name = format!("{} Holdings", ticker);
    snapshot.eps = eps;
    snapshot
}

/// Serves canned snapshots by ticker and counts calls.
pub(crate) struct MockProvider {
    snapshots: HashMap<String, FinancialSnapshot>,
    failure: Option<FetchError>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub(crate) fn with_snapshots(snapshots: Vec<FinancialSnapshot>) -> Self {
        Self {
            snapshots: snapshots.into_iter().map(|s| (s.ticker.clone(), s)).collect(),
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_snapshot(snapshot: FinancialSnapshot) -> Self {
        Self::with_snapshots(vec![snapshot])
    }

    pub(crate) fn failing(error: FetchError) -> Self {
        Self {
            snapshots: HashMap::new(),
            failure: Some(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotProvider for MockProvider {
    async fn fetch_snapshot(&self, ticker: &str) -> Result<FinancialSnapshot, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.snapshots
            .get(ticker)
            .cloned()
            .ok_or_else(|| FetchError::InvalidTicker(ticker.to_string()))
    }
}
