//! Importance / attention scoring.
//!
//! Both scores are weighted sums of signals in [0,1], clamped to [0,1]:
//!
//! importance = priority(0.3|0.2|0.1) + 0.3*match_ratio + 0.2*title + 0.2*content
//! attention  = 0.4*importance + 0.3*match_ratio + 0.3*recency
//!
//! `title`   = min(0.15 * importance keyword hits in the title, 1.0)
//! `content` = (min(len/500, 1.0) + min(0.1 * technical term hits, 0.5)) / 2
//! `recency` = max(0, 1 - days_old/7), missing date → days_old = 7
//!
//! The current time comes from an injected `Clock`, read once per `Scorer`.

use chrono::{DateTime, Utc};

use crate::categorize::CategoryMatch;
use crate::taxonomy::Taxonomy;
use crate::types::{clamp01, Item, Level, ScoredItem, SourcePriority};

pub const W_IMPORTANCE_MATCH: f32 = 0.3;
pub const W_IMPORTANCE_TITLE: f32 = 0.2;
pub const W_IMPORTANCE_CONTENT: f32 = 0.2;

pub const W_ATTENTION_IMPORTANCE: f32 = 0.4;
pub const W_ATTENTION_MATCH: f32 = 0.3;
pub const W_ATTENTION_RECENCY: f32 = 0.3;

const TITLE_HIT: f32 = 0.15;
const CONTENT_FULL_LEN: f32 = 500.0;
const TECH_HIT: f32 = 0.1;
const TECH_CAP: f32 = 0.5;

/// Age after which recency reaches zero; also the age assumed for undated items.
pub const RECENCY_HORIZON_DAYS: i64 = 7;

/// Source of "now" for recency.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant (tests, snapshot replays).
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Curated term lists feeding the title and content signals.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringLexicon {
    /// Product-launch / breakthrough terms, matched against the title.
    pub importance_keywords: Vec<String>,
    /// Technical-depth terms, matched against the description.
    pub technical_terms: Vec<String>,
}

impl ScoringLexicon {
    pub fn new<S: AsRef<str>>(importance_keywords: &[S], technical_terms: &[S]) -> Self {
        fn lower<S: AsRef<str>>(v: &[S]) -> Vec<String> {
            v.iter().map(|s| s.as_ref().to_lowercase()).collect()
        }
        Self {
            importance_keywords: lower(importance_keywords),
            technical_terms: lower(technical_terms),
        }
    }
}

impl Default for ScoringLexicon {
    fn default() -> Self {
        Self::new(
            &[
                "breakthrough", "new", "first", "launch", "release",
                "announcement", "innovation", "revolutionary", "groundbreaking",
                "major", "significant", "important", "key", "critical",
                "GPT", "DALL-E", "Midjourney", "Stable Diffusion", "Sora",
                "Copilot", "code generation", "generative", "diffusion",
                "transformer", "LLM", "large language model",
            ],
            &[
                "algorithm", "model", "architecture", "framework",
                "performance", "accuracy", "benchmark", "evaluation",
                "research", "study", "analysis", "implementation",
            ],
        )
    }
}

fn count_hits(haystack_lower: &str, terms: &[String]) -> usize {
    terms
        .iter()
        .filter(|t| haystack_lower.contains(t.as_str()))
        .count()
}

/// `min(0.15 * hits, 1.0)` over the lowercase title.
pub fn title_signal(title: &str, lexicon: &ScoringLexicon) -> f32 {
    if title.is_empty() {
        return 0.0;
    }
    let hits = count_hits(&title.to_lowercase(), &lexicon.importance_keywords);
    (TITLE_HIT * hits as f32).min(1.0)
}

/// Average of a length component and a capped technical-term component.
pub fn content_signal(description: &str, lexicon: &ScoringLexicon) -> f32 {
    if description.is_empty() {
        return 0.0;
    }
    let length = (description.chars().count() as f32 / CONTENT_FULL_LEN).min(1.0);
    let hits = count_hits(&description.to_lowercase(), &lexicon.technical_terms);
    let technical = (TECH_HIT * hits as f32).min(TECH_CAP);
    (length + technical) / 2.0
}

/// Whole days between `published` and `now`, never negative.
pub fn days_old(published: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    match published {
        Some(p) => (now - p).num_days().max(0),
        None => RECENCY_HORIZON_DAYS,
    }
}

pub fn recency_score(days_old: i64) -> f32 {
    (1.0 - days_old as f32 / RECENCY_HORIZON_DAYS as f32).max(0.0)
}

pub fn importance_score(priority: SourcePriority, match_ratio: f32, title: f32, content: f32) -> f32 {
    clamp01(
        priority.weight()
            + W_IMPORTANCE_MATCH * match_ratio
            + W_IMPORTANCE_TITLE * title
            + W_IMPORTANCE_CONTENT * content,
    )
}

pub fn attention_score(importance: f32, match_ratio: f32, recency: f32) -> f32 {
    clamp01(
        W_ATTENTION_IMPORTANCE * importance
            + W_ATTENTION_MATCH * match_ratio
            + W_ATTENTION_RECENCY * recency,
    )
}

/// Every intermediate signal for one item; useful for dev logs and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub priority: f32,
    pub match_ratio: f32,
    pub title: f32,
    pub content: f32,
    pub days_old: i64,
    pub recency: f32,
    pub importance: f32,
    pub attention: f32,
}

/// Scores items against one taxonomy and one instant.
pub struct Scorer<'a> {
    taxonomy: &'a Taxonomy,
    lexicon: &'a ScoringLexicon,
    now: DateTime<Utc>,
}

impl<'a> Scorer<'a> {
    pub fn new(taxonomy: &'a Taxonomy, lexicon: &'a ScoringLexicon, clock: &dyn Clock) -> Self {
        Self {
            taxonomy,
            lexicon,
            now: clock.now(),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn breakdown(&self, item: &Item, match_ratio: f32) -> ScoreBreakdown {
        let match_ratio = clamp01(match_ratio);
        let title = title_signal(&item.title, self.lexicon);
        let content = content_signal(&item.description, self.lexicon);
        let importance = importance_score(item.source_priority, match_ratio, title, content);
        let age = days_old(item.published_at, self.now);
        let recency = recency_score(age);
        let attention = attention_score(importance, match_ratio, recency);
        ScoreBreakdown {
            priority: item.source_priority.weight(),
            match_ratio,
            title,
            content,
            days_old: age,
            recency,
            importance,
            attention,
        }
    }

    /// Produce the enriched copy of `item`.
    pub fn score(&self, item: &Item, category: &CategoryMatch) -> ScoredItem {
        self.score_from(item, category, self.breakdown(item, category.match_ratio))
    }

    /// Enriched copy from an already computed breakdown.
    pub fn score_from(&self, item: &Item, category: &CategoryMatch, b: ScoreBreakdown) -> ScoredItem {
        let importance_level = Level::from_score(b.importance);
        let category_name = self
            .taxonomy
            .get(&category.category_id)
            .map(|c| c.display_name.clone())
            .unwrap_or_default();

        ScoredItem {
            item: item.clone(),
            category_id: category.category_id.clone(),
            category_name,
            category_match_ratio: b.match_ratio,
            importance_score: b.importance,
            importance_level,
            importance_description: self
                .taxonomy
                .importance
                .get(importance_level)
                .description
                .clone(),
            attention_score: b.attention,
            attention_level: Level::from_score(b.attention),
            combined_score: b.importance + b.attention,
        }
    }
}
