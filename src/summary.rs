//! Report-facing summary: totals, per-category highlights, top list.
//!
//! Stored inside snapshots so a report can be rendered again later.

use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregation, LevelCounts};
use crate::taxonomy::Taxonomy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub count: usize,
    pub high_importance: usize,
    pub high_attention: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopItem {
    pub title: String,
    pub link: String,
    pub category: String,
    pub importance_score: f32,
    pub attention_score: f32,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_items: usize,
    /// Taxonomy order, zero-count categories included.
    pub categories: Vec<CategorySummary>,
    pub importance_levels: LevelCounts,
    pub attention_levels: LevelCounts,
    pub top_items: Vec<TopItem>,
}

impl Summary {
    pub fn category(&self, id: &str) -> Option<&CategorySummary> {
        self.categories.iter().find(|c| c.id == id)
    }
}

pub fn summarize(agg: &Aggregation, taxonomy: &Taxonomy) -> Summary {
    let categories = taxonomy
        .categories
        .iter()
        .map(|cat| {
            let counts = agg.counts.category(&cat.id);
            CategorySummary {
                id: cat.id.clone(),
                display_name: cat.display_name.clone(),
                description: cat.description.clone(),
                count: counts.map(|c| c.count).unwrap_or(0),
                high_importance: counts.map(|c| c.importance.high).unwrap_or(0),
                high_attention: counts.map(|c| c.attention.high).unwrap_or(0),
            }
        })
        .collect();

    let top_items = agg
        .top_overall
        .iter()
        .map(|s| TopItem {
            title: s.item.title.clone(),
            link: s.item.link.clone(),
            category: s.category_name.clone(),
            importance_score: s.importance_score,
            attention_score: s.attention_score,
            source: s.item.source_name.clone(),
        })
        .collect();

    Summary {
        total_items: agg.counts.total,
        categories,
        importance_levels: agg.counts.importance,
        attention_levels: agg.counts.attention,
        top_items,
    }
}
