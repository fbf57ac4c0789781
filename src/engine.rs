//! # Digest Engine
//! One synchronous batch pass: exact dedup → categorize → score → aggregate.
//! No I/O; every stage returns a new collection and the input is never mutated.
//!
//! Degenerate input (empty batch, empty text, missing dates) has defined
//! fallbacks, so nothing here returns an error.

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use tracing::info;

use crate::aggregate::{aggregate, Aggregation};
use crate::categorize::categorize;
use crate::config::EngineConfig;
use crate::dedup::dedup_exact;
use crate::devlog::{dev_log_scored, dev_logging_enabled};
use crate::scoring::{Clock, Scorer, ScoringLexicon};
use crate::summary::{summarize, Summary};
use crate::taxonomy::Taxonomy;
use crate::types::{Item, ScoredItem};

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("engine_items_in_total", "Items handed to the engine.");
        describe_counter!(
            "engine_exact_dedup_total",
            "Items removed by exact title dedup."
        );
        describe_counter!(
            "engine_fuzzy_dedup_total",
            "Items removed by fuzzy title dedup inside category buckets."
        );
        describe_counter!(
            "engine_unknown_category_total",
            "Scored items whose category id is outside the taxonomy."
        );
        describe_histogram!("engine_run_ms", "Engine pass duration in milliseconds.");
    });
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub generated_at: DateTime<Utc>,
    /// Scored items in input order (after exact dedup).
    pub items: Vec<ScoredItem>,
    pub aggregation: Aggregation,
    pub summary: Summary,
}

/// Categorize and score each item, preserving input order.
pub fn score_items(
    items: &[Item],
    taxonomy: &Taxonomy,
    lexicon: &ScoringLexicon,
    clock: &dyn Clock,
) -> Vec<ScoredItem> {
    let scorer = Scorer::new(taxonomy, lexicon, clock);
    let dev_log = dev_logging_enabled();
    items
        .iter()
        .map(|item| {
            let m = categorize(item, taxonomy);
            let b = scorer.breakdown(item, m.match_ratio);
            if dev_log {
                dev_log_scored(item, &m.category_id, &b);
            }
            scorer.score_from(item, &m, b)
        })
        .collect()
}

/// Immutable configuration bundle for repeated runs.
#[derive(Debug, Clone)]
pub struct Engine {
    pub taxonomy: Taxonomy,
    pub lexicon: ScoringLexicon,
    pub config: EngineConfig,
}

impl Engine {
    pub fn new(taxonomy: Taxonomy, lexicon: ScoringLexicon, config: EngineConfig) -> Self {
        Self {
            taxonomy,
            lexicon,
            config,
        }
    }

    pub fn with_taxonomy(taxonomy: Taxonomy) -> Self {
        Self::new(taxonomy, ScoringLexicon::default(), EngineConfig::default())
    }

    pub fn run(&self, items: &[Item], clock: &dyn Clock) -> Analysis {
        run(items, &self.taxonomy, &self.lexicon, clock, &self.config)
    }
}

/// Full pass over one materialized batch.
pub fn run(
    items: &[Item],
    taxonomy: &Taxonomy,
    lexicon: &ScoringLexicon,
    clock: &dyn Clock,
    cfg: &EngineConfig,
) -> Analysis {
    ensure_metrics_described();
    let t0 = std::time::Instant::now();
    let generated_at = clock.now();

    counter!("engine_items_in_total").increment(items.len() as u64);
    let (unique, exact_removed) = dedup_exact(items.to_vec());
    counter!("engine_exact_dedup_total").increment(exact_removed as u64);

    let scored = score_items(&unique, taxonomy, lexicon, clock);
    let aggregation = aggregate(&scored, taxonomy, cfg);
    let summary = summarize(&aggregation, taxonomy);

    histogram!("engine_run_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    info!(
        target: "engine",
        items_in = items.len(),
        exact_dedup = exact_removed,
        scored = scored.len(),
        high_importance = summary.importance_levels.high,
        high_attention = summary.attention_levels.high,
        "engine pass finished"
    );

    Analysis {
        generated_at,
        items: scored,
        aggregation,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::FixedClock;
    use chrono::TimeZone;

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2025, 7, 28, 9, 0, 0).unwrap())
    }

    #[test]
    fn empty_batch_is_well_formed() {
        let tx = Taxonomy::default_seed();
        let a = run(&[], &tx, &ScoringLexicon::default(), &clock(), &EngineConfig::default());
        assert!(a.items.is_empty());
        assert_eq!(a.aggregation.per_category.len(), tx.categories.len());
        assert_eq!(a.summary.total_items, 0);
    }

    #[test]
    fn exact_duplicates_are_scored_once() {
        let items = vec![
            Item::new("Claude gets a new model", "anthropic"),
            Item::new("CLAUDE GETS A NEW MODEL", "anthropic"),
        ];
        let engine = Engine::with_taxonomy(Taxonomy::default_seed());
        let a = engine.run(&items, &clock());
        assert_eq!(a.items.len(), 1);
        assert_eq!(a.items[0].item.title, "Claude gets a new model");
    }

    #[test]
    fn score_items_preserves_input_order() {
        let items = vec![
            Item::new("NVIDIA GPU news", ""),
            Item::new("", ""),
            Item::new("Funding round for a startup", ""),
        ];
        let tx = Taxonomy::default_seed();
        let scored = score_items(&items, &tx, &ScoringLexicon::default(), &clock());
        let titles: Vec<&str> = scored.iter().map(|s| s.title()).collect();
        assert_eq!(titles, vec!["NVIDIA GPU news", "", "Funding round for a startup"]);
        assert_eq!(scored[0].category_id, "hardware_chip");
        assert_eq!(scored[1].category_id, "llm_chatbot");
        assert_eq!(scored[2].category_id, "startups_funding");
    }

    #[test]
    fn batch_scoring_matches_single_item_scoring() {
        use crate::scoring::Scorer;
        use chrono::Duration;

        let now = clock().0;
        let items = vec![
            Item::new("OpenAI releases GPT-4 breakthrough", "model benchmark")
                .published(now - Duration::days(2)),
            Item::new("NVIDIA GPU news", "hardware"),
        ];
        let tx = Taxonomy::default_seed();
        let lx = ScoringLexicon::default();
        let c = clock();
        let batch = score_items(&items, &tx, &lx, &c);

        let scorer = Scorer::new(&tx, &lx, &c);
        for (item, scored) in items.iter().zip(&batch) {
            assert_eq!(scored, &scorer.score(item, &categorize(item, &tx)));
        }
    }
}
