//! Snapshot providers: a rate-limited HTTP client and a local JSON directory.

mod client;
mod file;
mod payload;

pub use client::{ClientConfig, SnapshotClient};
pub use file::FileSnapshotProvider;
pub use payload::parse_snapshot_payload;
