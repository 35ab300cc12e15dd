use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use valuation_core::{normalize_ticker, FetchError, FinancialSnapshot, SnapshotProvider};

pub const DEFAULT_CACHE_TTL_MINUTES: i64 = 15;

struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

/// Wraps any provider with a per-ticker snapshot cache.
///
/// Only successful fetches are stored, so a failed lookup is retried on the
/// next request. Concurrent misses for the same ticker may both reach the
/// inner provider; the later insert wins.
pub struct CachedSnapshotProvider<P> {
    inner: P,
    entries: DashMap<String, CacheEntry<FinancialSnapshot>>,
    ttl: Duration,
}

impl<P: SnapshotProvider> CachedSnapshotProvider<P> {
    pub fn new(inner: P) -> Self {
        Self::with_ttl(inner, Duration::minutes(DEFAULT_CACHE_TTL_MINUTES))
    }

    pub fn with_ttl(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    fn is_fresh(&self, cached_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        now - cached_at < self.ttl
    }

    /// Drop the cached snapshot for `ticker`; returns whether one was present.
    pub fn invalidate(&self, ticker: &str) -> bool {
        match normalize_ticker(ticker) {
            Ok(key) => self.entries.remove(&key).is_some(),
            Err(_) => false,
        }
    }

    /// Remove every stale entry and return how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| self.is_fresh(entry.cached_at, now));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl<P: SnapshotProvider> SnapshotProvider for CachedSnapshotProvider<P> {
    async fn fetch_snapshot(&self, ticker: &str) -> Result<FinancialSnapshot, FetchError> {
        let key = normalize_ticker(ticker)?;

        if let Some(entry) = self.entries.get(&key) {
            if self.is_fresh(entry.cached_at, Utc::now()) {
                tracing::debug!("Snapshot cache hit for {}", key);
                return Ok(entry.data.clone());
            }
        }

        let snapshot = self.inner.fetch_snapshot(&key).await?;
        self.entries.insert(
            key,
            CacheEntry {
                data: snapshot.clone(),
                cached_at: Utc::now(),
            },
        );

        Ok(snapshot)
    }
}
