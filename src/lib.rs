// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod aggregate;
pub mod categorize;
pub mod config;
pub mod dedup;
pub mod devlog;
pub mod engine;
pub mod scoring;
pub mod snapshot;
pub mod summary;
pub mod taxonomy;
pub mod types;

// Collector side: providers, normalization, exclusion and recency filters
pub mod ingest;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::{Aggregation, CategoryBucket, Counts, LevelCounts, Trends};
pub use crate::config::EngineConfig;
pub use crate::engine::{run, Analysis, Engine};
pub use crate::scoring::{Clock, FixedClock, ScoringLexicon, SystemClock};
pub use crate::snapshot::{FileSink, MemorySink, Snapshot, SnapshotSink};
pub use crate::summary::Summary;
pub use crate::taxonomy::{Category, Taxonomy};
pub use crate::types::{Item, Level, ScoredItem, SourcePriority};
