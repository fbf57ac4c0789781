//! genai-digest: batch entrypoint.
//!
//! ```text
//! genai-digest <items.json> [--out DIR]
//! genai-digest --regenerate <snapshot.json>
//! ```

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use genai_digest::devlog::init_tracing;
use genai_digest::snapshot::aggregate_snapshot;
use genai_digest::{
    Engine, EngineConfig, FileSink, Item, ScoringLexicon, Snapshot, SnapshotSink, SystemClock,
    Taxonomy,
};

const DEFAULT_OUT_DIR: &str = "data/collected";

enum Command {
    Analyze { input: PathBuf, out: PathBuf },
    Regenerate { snapshot: PathBuf },
}

fn parse_args(args: &[String]) -> Result<Command> {
    let mut input = None;
    let mut out = PathBuf::from(DEFAULT_OUT_DIR);
    let mut regenerate = None;

    let mut it = args.iter();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--out" => {
                out = it.next().map(PathBuf::from).context("--out needs a directory")?;
            }
            "--regenerate" => {
                regenerate = Some(
                    it.next()
                        .map(PathBuf::from)
                        .context("--regenerate needs a snapshot path")?,
                );
            }
            other if other.starts_with("--") => bail!("unknown flag {other}"),
            other => input = Some(PathBuf::from(other)),
        }
    }

    match (regenerate, input) {
        (Some(snapshot), _) => Ok(Command::Regenerate { snapshot }),
        (None, Some(input)) => Ok(Command::Analyze { input, out }),
        (None, None) => {
            bail!("usage: genai-digest <items.json> [--out DIR] | --regenerate <snapshot.json>")
        }
    }
}

fn read_items(path: &Path) -> Result<Vec<Item>> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("reading items from {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parsing items json {}", path.display()))
}

async fn analyze(engine: &Engine, input: &Path, out: PathBuf) -> Result<()> {
    let items = read_items(input)?;
    let analysis = engine.run(&items, &SystemClock);
    let snapshot = Snapshot::from_analysis(&analysis);

    let sink = FileSink::new(out);
    sink.store(&snapshot).await?;

    for top in &analysis.summary.top_items {
        info!(
            target: "digest",
            category = %top.category,
            importance = top.importance_score,
            attention = top.attention_score,
            "top item"
        );
    }
    Ok(())
}

fn regenerate(engine: &Engine, path: &Path) -> Result<()> {
    let snap = Snapshot::load_from(path)?;
    let agg = aggregate_snapshot(&snap, &engine.taxonomy, &engine.config);
    for bucket in &agg.per_category {
        info!(
            target: "digest",
            category = %bucket.category_id,
            items = bucket.items.len(),
            "category"
        );
    }
    info!(
        target: "digest",
        total = agg.counts.total,
        important = agg.important.len(),
        "snapshot regenerated"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cmd = parse_args(&args)?;

    let taxonomy = Taxonomy::load_default()?;
    let config = EngineConfig::load_default()?;
    let engine = Engine::new(taxonomy, ScoringLexicon::default(), config);

    match cmd {
        Command::Analyze { input, out } => analyze(&engine, &input, out).await,
        Command::Regenerate { snapshot } => regenerate(&engine, &snapshot),
    }
}
