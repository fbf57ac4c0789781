//! Aggregation / ranking over scored items.
//!
//! - Every taxonomy category gets a bucket, even when empty.
//! - Bucket: fuzzy dedup → sort by `combined_score` desc (stable) → top_n.
//! - `top_overall`: whole set sorted the same way → top_overall.
//! - Counts: importance/attention level tallies per category and globally,
//!   taken over every scored item.
//! - Items whose category id is not in the taxonomy are left out of the
//!   buckets (logged + counted) but still rank in `top_overall`.

use metrics::counter;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::warn;

use crate::config::EngineConfig;
use crate::dedup::dedup_fuzzy;
use crate::devlog::item_id;
use crate::taxonomy::Taxonomy;
use crate::types::{Level, ScoredItem};

/// Keywords checked against the concatenated titles for the trends view.
pub const EMERGING_TOPIC_KEYWORDS: [&str; 12] = [
    "AI", "machine learning", "deep learning", "generative",
    "automation", "robotics", "autonomous", "intelligent",
    "neural", "algorithm", "model", "framework",
];
const MAX_EMERGING_TOPICS: usize = 5;
const MAX_TOP_CATEGORIES: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl LevelCounts {
    pub fn add(&mut self, level: Level) {
        match level {
            Level::High => self.high += 1,
            Level::Medium => self.medium += 1,
            Level::Low => self.low += 1,
        }
    }

    pub fn get(&self, level: Level) -> usize {
        match level {
            Level::High => self.high,
            Level::Medium => self.medium,
            Level::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub category_id: String,
    pub count: usize,
    pub importance: LevelCounts,
    pub attention: LevelCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub total: usize,
    pub importance: LevelCounts,
    pub attention: LevelCounts,
    /// Taxonomy order.
    pub per_category: Vec<CategoryCounts>,
    /// Items whose category id is not in the taxonomy.
    pub unknown_category: usize,
}

impl Counts {
    pub fn category(&self, id: &str) -> Option<&CategoryCounts> {
        self.per_category.iter().find(|c| c.category_id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBucket {
    pub category_id: String,
    pub display_name: String,
    pub items: Vec<ScoredItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trends {
    /// (category id, item count), largest first, at most three.
    pub top_categories: Vec<(String, usize)>,
    pub emerging_topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    /// One bucket per taxonomy category, taxonomy order.
    pub per_category: Vec<CategoryBucket>,
    pub top_overall: Vec<ScoredItem>,
    pub counts: Counts,
    /// High importance OR high attention, best first.
    pub important: Vec<ScoredItem>,
    pub trends: Trends,
}

impl Aggregation {
    pub fn bucket(&self, category_id: &str) -> Option<&CategoryBucket> {
        self.per_category.iter().find(|b| b.category_id == category_id)
    }
}

fn by_combined_desc(a: &ScoredItem, b: &ScoredItem) -> Ordering {
    b.combined_score.total_cmp(&a.combined_score)
}

/// Stable sort by `combined_score` descending; equal scores keep input order.
pub fn rank(mut items: Vec<ScoredItem>) -> Vec<ScoredItem> {
    items.sort_by(by_combined_desc);
    items
}

pub fn rank_top(items: Vec<ScoredItem>, limit: usize) -> Vec<ScoredItem> {
    let mut ranked = rank(items);
    ranked.truncate(limit);
    ranked
}

/// Items with a high importance or attention level, best first.
pub fn important_items(items: &[ScoredItem], limit: usize) -> Vec<ScoredItem> {
    let picked: Vec<ScoredItem> = items.iter().filter(|s| s.is_important()).cloned().collect();
    rank_top(picked, limit)
}

pub fn count_levels(items: &[ScoredItem], taxonomy: &Taxonomy) -> Counts {
    let mut counts = Counts {
        per_category: taxonomy
            .ids()
            .map(|id| CategoryCounts {
                category_id: id.to_string(),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    };
    let slot: HashMap<&str, usize> = taxonomy.ids().enumerate().map(|(i, id)| (id, i)).collect();

    for s in items {
        counts.total += 1;
        counts.importance.add(s.importance_level);
        counts.attention.add(s.attention_level);
        match slot.get(s.category_id.as_str()) {
            Some(&i) => {
                let c = &mut counts.per_category[i];
                c.count += 1;
                c.importance.add(s.importance_level);
                c.attention.add(s.attention_level);
            }
            None => counts.unknown_category += 1,
        }
    }
    counts
}

pub fn trends(items: &[ScoredItem], counts: &Counts) -> Trends {
    let mut top: Vec<(String, usize)> = counts
        .per_category
        .iter()
        .filter(|c| c.count > 0)
        .map(|c| (c.category_id.clone(), c.count))
        .collect();
    top.sort_by(|a, b| b.1.cmp(&a.1));
    top.truncate(MAX_TOP_CATEGORIES);

    let titles = items
        .iter()
        .map(|s| s.item.title.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let emerging_topics = EMERGING_TOPIC_KEYWORDS
        .iter()
        .filter(|k| titles.contains(&k.to_lowercase()))
        .take(MAX_EMERGING_TOPICS)
        .map(|k| k.to_string())
        .collect();

    Trends {
        top_categories: top,
        emerging_topics,
    }
}

/// Bucket, rank and tally `items` against `taxonomy`.
pub fn aggregate(items: &[ScoredItem], taxonomy: &Taxonomy, cfg: &EngineConfig) -> Aggregation {
    let mut grouped: Vec<Vec<ScoredItem>> = vec![Vec::new(); taxonomy.categories.len()];
    let slot: HashMap<&str, usize> = taxonomy.ids().enumerate().map(|(i, id)| (id, i)).collect();

    for s in items {
        match slot.get(s.category_id.as_str()) {
            Some(&i) => grouped[i].push(s.clone()),
            None => {
                warn!(
                    target: "aggregate",
                    id = %item_id(&s.item),
                    category = %s.category_id,
                    "item carries a category id outside the taxonomy; kept out of buckets"
                );
                counter!("engine_unknown_category_total").increment(1);
            }
        }
    }

    let mut fuzzy_removed = 0usize;
    let per_category: Vec<CategoryBucket> = taxonomy
        .categories
        .iter()
        .zip(grouped)
        .map(|(cat, bucket)| {
            let (unique, removed) = dedup_fuzzy(bucket);
            fuzzy_removed += removed;
            CategoryBucket {
                category_id: cat.id.clone(),
                display_name: cat.display_name.clone(),
                items: rank_top(unique, cfg.top_n),
            }
        })
        .collect();
    counter!("engine_fuzzy_dedup_total").increment(fuzzy_removed as u64);

    let counts = count_levels(items, taxonomy);
    let trends = trends(items, &counts);

    Aggregation {
        per_category,
        top_overall: rank_top(items.to_vec(), cfg.top_overall),
        important: important_items(items, cfg.important_limit),
        counts,
        trends,
    }
}
