//! Fetch → analyze → record pipeline around the value analysis engine.

use futures_util::future::join_all;
use std::sync::Arc;
use valuation_core::{FetchError, SnapshotProvider, ValuationResult, ValueAnalyzer};
use value_analysis::ValueAnalysisEngine;

pub mod cache;
pub mod history;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{CachedSnapshotProvider, DEFAULT_CACHE_TTL_MINUTES};
pub use history::{HistoryError, HistoryLog, DEFAULT_HISTORY_CAPACITY};

pub struct ValuationOrchestrator<P> {
    provider: CachedSnapshotProvider<P>,
    analyzer: ValueAnalysisEngine,
    history: Arc<HistoryLog>,
}

impl<P: SnapshotProvider> ValuationOrchestrator<P> {
    pub fn new(provider: CachedSnapshotProvider<P>, history: Arc<HistoryLog>) -> Self {
        Self {
            provider,
            analyzer: ValueAnalysisEngine::new(),
            history,
        }
    }

    pub fn provider(&self) -> &CachedSnapshotProvider<P> {
        &self.provider
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Value one ticker and append it to history.
    pub async fn evaluate(&self, ticker: &str) -> Result<ValuationResult, FetchError> {
        tracing::info!("Evaluating {}", ticker.trim());

        let snapshot = self.provider.fetch_snapshot(ticker).await.map_err(|e| {
            tracing::warn!("Fetch failed for {}: {}", ticker.trim(), e);
            e
        })?;

        let result = self.analyzer.analyze(snapshot);

        if let Err(e) = self.history.record(&result).await {
            tracing::warn!("Failed to record history for {}: {}", result.snapshot.ticker, e);
        }

        tracing::info!(
            "{}: {} ({:.1}/100)",
            result.snapshot.ticker,
            result.summary.recommendation,
            result.summary.composite_score
        );

        Ok(result)
    }

    /// Value several tickers with their fetches in flight together.
    /// Results come back in input order.
    pub async fn evaluate_many(
        &self,
        tickers: &[String],
    ) -> Vec<(String, Result<ValuationResult, FetchError>)> {
        let futures = tickers.iter().map(|ticker| async move {
            (ticker.clone(), self.evaluate(ticker).await)
        });
        join_all(futures).await
    }

    /// Re-fetch a ticker, bypassing any cached snapshot.
    pub async fn refresh(&self, ticker: &str) -> Result<ValuationResult, FetchError> {
        if self.provider.invalidate(ticker) {
            tracing::debug!("Dropped cached snapshot for {}", ticker.trim());
        }
        self.evaluate(ticker).await
    }
}
