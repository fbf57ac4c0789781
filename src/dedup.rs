//! Title-based deduplication. Both passes keep first-seen order.
//!
//! - `dedup_exact`: lowercase title, exact match. Runs on the raw collection.
//! - `dedup_fuzzy`: lowercase + trimmed titles; a later title is a duplicate
//!   when one title contains the other and the shorter one is longer than
//!   `FUZZY_MIN_LEN` chars. Empty titles are dropped. Greedy O(n²) over the
//!   kept set, meant for per-category buckets.

use std::collections::HashSet;

use crate::types::{Item, ScoredItem};

/// Shorter title must exceed this many chars before substring containment counts.
pub const FUZZY_MIN_LEN: usize = 10;

/// Anything with a title.
pub trait Titled {
    fn title_text(&self) -> &str;
}

impl Titled for Item {
    fn title_text(&self) -> &str {
        &self.title
    }
}

impl Titled for ScoredItem {
    fn title_text(&self) -> &str {
        &self.item.title
    }
}

pub fn exact_key(title: &str) -> String {
    title.to_lowercase()
}

pub fn fuzzy_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// True when `a` and `b` (already fuzzy-normalized) collide.
pub fn is_fuzzy_duplicate(a: &str, b: &str) -> bool {
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    shorter.chars().count() > FUZZY_MIN_LEN && longer.contains(shorter)
}

/// Returns (kept, removed_count).
pub fn dedup_exact<T: Titled>(items: Vec<T>) -> (Vec<T>, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut keep = Vec::with_capacity(items.len());
    let mut removed = 0usize;
    for it in items {
        if !seen.insert(exact_key(it.title_text())) {
            removed += 1;
            continue;
        }
        keep.push(it);
    }
    (keep, removed)
}

/// Returns (kept, removed_count). Removed includes empty-title drops.
pub fn dedup_fuzzy<T: Titled>(items: Vec<T>) -> (Vec<T>, usize) {
    let mut kept_titles: Vec<String> = Vec::new();
    let mut keep = Vec::with_capacity(items.len());
    let mut removed = 0usize;
    for it in items {
        let t = fuzzy_key(it.title_text());
        if t.is_empty() {
            removed += 1;
            continue;
        }
        if kept_titles.iter().any(|k| is_fuzzy_duplicate(&t, k)) {
            removed += 1;
            continue;
        }
        kept_titles.push(t);
        keep.push(it);
    }
    (keep, removed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(titles: &[&str]) -> Vec<Item> {
        titles.iter().map(|t| Item::new(*t, "")).collect()
    }

    fn titles(v: &[Item]) -> Vec<&str> {
        v.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn exact_is_case_insensitive_and_keeps_first() {
        let (kept, removed) = dedup_exact(items(&["Hello World", "hello world", "Other"]));
        assert_eq!(titles(&kept), vec!["Hello World", "Other"]);
        assert_eq!(removed, 1);
    }

    #[test]
    fn fuzzy_prefix_collapses_to_first_seen() {
        let (kept, removed) = dedup_fuzzy(items(&[
            "GPT-4 launches today",
            "gpt-4 launches today with new features",
        ]));
        assert_eq!(titles(&kept), vec!["GPT-4 launches today"]);
        assert_eq!(removed, 1);
    }

    #[test]
    fn fuzzy_works_when_longer_comes_first() {
        let (kept, _) = dedup_fuzzy(items(&[
            "gpt-4 launches today with new features",
            "GPT-4 launches today",
        ]));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].title, "gpt-4 launches today with new features");
    }

    #[test]
    fn short_titles_do_not_collide() {
        // "AI news" (7 chars) is inside the second title but too short to count.
        let (kept, _) = dedup_fuzzy(items(&["AI news", "AI news roundup for the week"]));
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn ten_char_boundary_is_exclusive() {
        // exactly 10 chars: not enough
        let (kept, _) = dedup_fuzzy(items(&["abcdefghij", "abcdefghij and more"]));
        assert_eq!(kept.len(), 2);
        // 11 chars: collides
        let (kept, _) = dedup_fuzzy(items(&["abcdefghijk", "abcdefghijk and more"]));
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn fuzzy_drops_empty_titles() {
        let (kept, removed) = dedup_fuzzy(items(&["", "   ", "A real headline here"]));
        assert_eq!(titles(&kept), vec!["A real headline here"]);
        assert_eq!(removed, 2);
    }

    #[test]
    fn both_passes_are_idempotent() {
        let raw = items(&[
            "OpenAI ships a new model",
            "openai ships a new model",
            "OpenAI ships a new model to everyone",
            "Short",
            "short",
            "",
            "NVIDIA unveils Blackwell Ultra",
        ]);
        let (once, _) = dedup_exact(raw.clone());
        let (twice, removed) = dedup_exact(once.clone());
        assert_eq!(once, twice);
        assert_eq!(removed, 0);

        let (once, _) = dedup_fuzzy(raw);
        let (twice, removed) = dedup_fuzzy(once.clone());
        assert_eq!(once, twice);
        assert_eq!(removed, 0);
    }
}
