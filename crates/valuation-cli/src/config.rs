use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use snapshot_client::ClientConfig;
use valuation_orchestrator::{DEFAULT_CACHE_TTL_MINUTES, DEFAULT_HISTORY_CAPACITY};

/// Where snapshots come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    Http,
    File,
}

impl FromStr for SnapshotSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(SnapshotSource::Http),
            "file" => Ok(SnapshotSource::File),
            other => bail!("unknown snapshot source {:?} (expected \"http\" or \"file\")", other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: SnapshotSource,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub snapshot_dir: PathBuf,
    pub rate_limit: usize,          // requests per minute
    pub timeout_secs: u64,
    pub cache_ttl: chrono::Duration,
    pub history_path: PathBuf,
    pub history_capacity: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let source = match get("SNAPSHOT_SOURCE") {
            Some(raw) => raw
                .parse::<SnapshotSource>()
                .context("Invalid SNAPSHOT_SOURCE")?,
            None => SnapshotSource::File,
        };
        let api_url = get("SNAPSHOT_API_URL");
        if source == SnapshotSource::Http && api_url.is_none() {
            bail!("SNAPSHOT_API_URL must be set when SNAPSHOT_SOURCE=http");
        }

        let cache_ttl_minutes: i64 =
            parse_var(&get, "CACHE_TTL_MINUTES", DEFAULT_CACHE_TTL_MINUTES)?;
        if cache_ttl_minutes < 0 {
            bail!("CACHE_TTL_MINUTES cannot be negative");
        }
        let cache_ttl = chrono::Duration::try_minutes(cache_ttl_minutes)
            .with_context(|| format!("CACHE_TTL_MINUTES out of range: {}", cache_ttl_minutes))?;

        let config = Self {
            source,
            api_url,
            api_key: get("SNAPSHOT_API_KEY"),
            snapshot_dir: get("SNAPSHOT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./snapshots")),
            rate_limit: parse_var(&get, "SNAPSHOT_RATE_LIMIT", 60)?,
            timeout_secs: parse_var(&get, "SNAPSHOT_TIMEOUT_SECS", 90)?,
            cache_ttl,
            history_path: get("HISTORY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_history_path),
            history_capacity: parse_var(&get, "HISTORY_CAPACITY", DEFAULT_HISTORY_CAPACITY)?,
        };

        if config.rate_limit == 0 {
            bail!("SNAPSHOT_RATE_LIMIT must be at least 1");
        }

        Ok(config)
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut client = ClientConfig::new(self.api_url.clone().unwrap_or_default());
        client.api_key = self.api_key.clone();
        client.timeout = Duration::from_secs(self.timeout_secs);
        client.rate_limit = self.rate_limit;
        client
    }
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

fn default_history_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("intelligent-investor"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("history.json")
}
