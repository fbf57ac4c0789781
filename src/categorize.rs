//! Keyword-overlap categorizer.
//!
//! Haystack = lowercase `title + " " + description`. A category's match ratio
//! is the share of its keywords found as literal substrings. Strictly highest
//! ratio wins, ties keep taxonomy order, zero overlap goes to the taxonomy's
//! default category.

use crate::taxonomy::Taxonomy;
use crate::types::{clamp01, Item};

/// Outcome of categorizing one item.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMatch {
    pub category_id: String,
    pub match_ratio: f32,
}

/// Fraction of `keywords` contained in `haystack` (already lowercase).
/// Empty keyword lists score 0.
pub fn match_ratio(haystack: &str, keywords: &[String]) -> f32 {
    if haystack.is_empty() || keywords.is_empty() {
        return 0.0;
    }
    let hits = keywords
        .iter()
        .filter(|k| haystack.contains(&k.to_lowercase()))
        .count();
    clamp01(hits as f32 / keywords.len() as f32)
}

pub fn haystack(item: &Item) -> String {
    format!("{} {}", item.title, item.description).to_lowercase()
}

/// Assign exactly one category to `item`.
pub fn categorize(item: &Item, taxonomy: &Taxonomy) -> CategoryMatch {
    let text = haystack(item);

    let mut best: Option<(&str, f32)> = None;
    for cat in &taxonomy.categories {
        let ratio = match_ratio(&text, &cat.keywords);
        let better = match best {
            None => ratio > 0.0,
            Some((_, b)) => ratio > b,
        };
        if better {
            best = Some((cat.id.as_str(), ratio));
        }
    }

    match best {
        Some((id, ratio)) => CategoryMatch {
            category_id: id.to_string(),
            match_ratio: ratio,
        },
        None => CategoryMatch {
            category_id: taxonomy
                .fallback()
                .map(|c| c.id.clone())
                .unwrap_or_else(|| taxonomy.default_category.clone()),
            match_ratio: 0.0,
        },
    }
}
