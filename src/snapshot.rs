//! Snapshot: stable JSON of scored items + summary, for re-rendering later
//! without re-scoring.
//!
//! Persisting is the caller's side effect; the engine only builds the value.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::aggregate::{aggregate, Aggregation};
use crate::config::EngineConfig;
use crate::engine::Analysis;
use crate::summary::Summary;
use crate::taxonomy::Taxonomy;
use crate::types::ScoredItem;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    pub items: Vec<ScoredItem>,
    pub summary: Summary,
}

impl Snapshot {
    pub fn from_analysis(a: &Analysis) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            generated_at: a.generated_at,
            items: a.items.clone(),
            summary: a.summary.clone(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing snapshot")
    }

    pub fn from_json(s: &str) -> Result<Self> {
        let snap: Snapshot = serde_json::from_str(s).context("parsing snapshot json")?;
        if snap.schema_version != SCHEMA_VERSION {
            bail!(
                "unsupported snapshot schema_version {} (expected {})",
                snap.schema_version,
                SCHEMA_VERSION
            );
        }
        Ok(snap)
    }

    pub fn file_name(&self) -> String {
        snapshot_file_name(self.generated_at)
    }

    /// Write into `dir` (created if missing); returns the file path.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating snapshot dir {}", dir.display()))?;
        let path = dir.join(self.file_name());
        std::fs::write(&path, self.to_json()?)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        info!(target: "snapshot", path = %path.display(), items = self.items.len(), "snapshot saved");
        Ok(path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading snapshot {}", path.display()))?;
        Self::from_json(&s).with_context(|| format!("loading snapshot {}", path.display()))
    }
}

/// `analyzed_items_%Y%m%d_%H%M%S.json`
pub fn snapshot_file_name(ts: DateTime<Utc>) -> String {
    format!("analyzed_items_{}.json", ts.format("%Y%m%d_%H%M%S"))
}

/// Re-derive buckets/rankings from stored items, no re-scoring.
pub fn aggregate_snapshot(snap: &Snapshot, taxonomy: &Taxonomy, cfg: &EngineConfig) -> Aggregation {
    aggregate(&snap.items, taxonomy, cfg)
}

#[async_trait::async_trait]
pub trait SnapshotSink: Send + Sync {
    async fn store(&self, snapshot: &Snapshot) -> Result<()>;
}

/// Writes snapshots as files under a directory.
pub struct FileSink {
    pub dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait::async_trait]
impl SnapshotSink for FileSink {
    async fn store(&self, snapshot: &Snapshot) -> Result<()> {
        let dir = self.dir.clone();
        let snap = snapshot.clone();
        tokio::task::spawn_blocking(move || snap.save_to(&dir))
            .await
            .context("snapshot writer task")??;
        Ok(())
    }
}

// --- Test helper ---
#[derive(Default)]
pub struct MemorySink {
    pub stored: std::sync::Mutex<Vec<Snapshot>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl SnapshotSink for MemorySink {
    async fn store(&self, snapshot: &Snapshot) -> Result<()> {
        self.stored
            .lock()
            .map_err(|_| anyhow::anyhow!("memory sink mutex poisoned"))?
            .push(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_uses_timestamp() {
        let ts = Utc.with_ymd_and_hms(2025, 7, 28, 16, 0, 41).unwrap();
        assert_eq!(snapshot_file_name(ts), "analyzed_items_20250728_160041.json");
    }

    #[test]
    fn rejects_unknown_schema_version() {
        let json = r#"{
            "schema_version": 99,
            "generated_at": "2025-07-28T16:00:41Z",
            "items": [],
            "summary": {
                "total_items": 0,
                "categories": [],
                "importance_levels": {"high":0,"medium":0,"low":0},
                "attention_levels": {"high":0,"medium":0,"low":0},
                "top_items": []
            }
        }"#;
        let err = Snapshot::from_json(json).unwrap_err();
        assert!(err.to_string().contains("schema_version"));
    }
}
