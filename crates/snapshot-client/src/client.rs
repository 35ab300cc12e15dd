use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use valuation_core::{normalize_ticker, FetchError, FinancialSnapshot, SnapshotProvider};

use crate::payload::parse_snapshot_payload;

const MAX_ATTEMPTS: u32 = 3;

/// Sliding-window rate limiter: at most `max_requests` per `window` duration.
#[derive(Clone)]
struct RateLimiter {
    timestamps: Arc<Mutex<VecDeque<Instant>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            timestamps: Arc::new(Mutex::new(VecDeque::new())),
            max_requests: max_requests.max(1),
            window,
        }
    }

    async fn acquire(&self) {
        loop {
            let mut ts = self.timestamps.lock().await;
            let now = Instant::now();

            while let Some(&front) = ts.front() {
                if now.duration_since(front) >= self.window {
                    ts.pop_front();
                } else {
                    break;
                }
            }

            if ts.len() < self.max_requests {
                ts.push_back(now);
                return;
            }

            // Wait until the oldest request falls out of the window
            let sleep_dur = match ts.front() {
                Some(&oldest) => {
                    (oldest + self.window).saturating_duration_since(now) + Duration::from_millis(50)
                }
                None => Duration::from_millis(50),
            };
            drop(ts);
            tracing::debug!("Rate limiter: waiting {:.1}s for snapshot API slot", sleep_dur.as_secs_f64());
            tokio::time::sleep(sleep_dur).await;
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    /// Requests allowed per minute
    pub rate_limit: usize,
    /// Pause before retrying a 429 response
    pub retry_backoff: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(90),
            rate_limit: 60,
            retry_backoff: Duration::from_secs(15),
        }
    }
}

/// HTTP snapshot provider: `GET {base_url}/snapshots/{TICKER}` returning the snapshot document.
#[derive(Clone)]
pub struct SnapshotClient {
    config: ClientConfig,
    client: Client,
    rate_limiter: RateLimiter,
}

impl SnapshotClient {
    pub fn new(config: ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            rate_limiter: RateLimiter::new(config.rate_limit, Duration::from_secs(60)),
            config,
            client,
        }
    }

    fn snapshot_url(&self, ticker: &str) -> String {
        format!("{}/snapshots/{}", self.config.base_url.trim_end_matches('/'), ticker)
    }

    /// Send a request with rate limiting and automatic 429 retry.
    async fn send_request(&self, url: &str) -> Result<reqwest::Response, FetchError> {
        for attempt in 0..MAX_ATTEMPTS {
            self.rate_limiter.acquire().await;

            let mut builder = self.client.get(url);
            if let Some(key) = &self.config.api_key {
                builder = builder.bearer_auth(key);
            }
            let response = builder
                .send()
                .await
                .map_err(|e| FetchError::Transport(e.to_string()))?;

            if response.status() != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }
            if attempt + 1 == MAX_ATTEMPTS {
                break;
            }

            tracing::warn!(
                "Snapshot API rate limited, waiting {}s before retry {}/{}",
                self.config.retry_backoff.as_secs(),
                attempt + 1,
                MAX_ATTEMPTS
            );
            tokio::time::sleep(self.config.retry_backoff).await;
        }

        Err(FetchError::Transport(format!(
            "Rate limited by snapshot API after {} attempts",
            MAX_ATTEMPTS
        )))
    }

    pub async fn get_snapshot(&self, ticker: &str) -> Result<FinancialSnapshot, FetchError> {
        let ticker = normalize_ticker(ticker)?;
        tracing::info!("Fetching snapshot for {} from {}", ticker, self.config.base_url);

        let response = self.send_request(&self.snapshot_url(&ticker)).await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::InvalidTicker(ticker));
        }
        if !status.is_success() {
            return Err(FetchError::Transport(format!(
                "HTTP {}: {}",
                status,
                response.text().await.unwrap_or_default()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        parse_snapshot_payload(&ticker, &body)
    }
}

#[async_trait]
impl SnapshotProvider for SnapshotClient {
    async fn fetch_snapshot(&self, ticker: &str) -> Result<FinancialSnapshot, FetchError> {
        self.get_snapshot(ticker).await
    }
}
