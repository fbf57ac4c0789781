//! Records flowing through the digest engine.
//!
//! `Item` is what collectors hand over; `ScoredItem` is the enriched copy the
//! engine produces. Nothing here mutates an `Item` in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::ingest::dates::parse_published;

/// Trust tier of the source an item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourcePriority {
    High,
    #[default]
    Medium,
    Low,
}

impl SourcePriority {
    /// Effective contribution of the source tier to the importance score.
    pub fn weight(self) -> f32 {
        match self {
            SourcePriority::High => 0.3,
            SourcePriority::Medium => 0.2,
            SourcePriority::Low => 0.1,
        }
    }
}

/// Three-bucket discretization shared by importance and attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    pub const HIGH_THRESHOLD: f32 = 0.7;
    pub const MEDIUM_THRESHOLD: f32 = 0.4;

    /// `score >= 0.7` → high, `0.4 <= score < 0.7` → medium, else low.
    pub fn from_score(score: f32) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            Level::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            Level::Medium
        } else {
            Level::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::High => "high",
            Level::Medium => "medium",
            Level::Low => "low",
        }
    }
}

/// One externally sourced article/post, already fetched and filtered.
///
/// Deserialization is lenient: `null` text fields become empty, and a
/// `published_at` that does not parse becomes `None` instead of failing
/// the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub link: String,
    /// Missing or unparseable dates arrive as `None`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_published"
    )]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source_name: String,
    #[serde(default, deserialize_with = "lenient_priority")]
    pub source_priority: SourcePriority,
}

fn null_as_empty<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn lenient_published<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?
        .as_deref()
        .and_then(parse_published))
}

/// Unknown tiers fall back to medium.
fn lenient_priority<'de, D>(d: D) -> Result<SourcePriority, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
    Ok(match raw.trim().to_ascii_lowercase().as_str() {
        "high" => SourcePriority::High,
        "low" => SourcePriority::Low,
        _ => SourcePriority::Medium,
    })
}

impl Item {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            link: String::new(),
            published_at: None,
            source_name: String::new(),
            source_priority: SourcePriority::default(),
        }
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn published(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    pub fn source(mut self, name: impl Into<String>, priority: SourcePriority) -> Self {
        self.source_name = name.into();
        self.source_priority = priority;
        self
    }
}

/// An `Item` enriched with category, importance, and attention fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredItem {
    #[serde(flatten)]
    pub item: Item,
    pub category_id: String,
    #[serde(default)]
    pub category_name: String,
    pub category_match_ratio: f32,
    pub importance_score: f32,
    pub importance_level: Level,
    #[serde(default)]
    pub importance_description: String,
    pub attention_score: f32,
    pub attention_level: Level,
    /// importance + attention; ranking only, not bounded to [0,1].
    pub combined_score: f32,
}

impl ScoredItem {
    pub fn title(&self) -> &str {
        &self.item.title
    }

    pub fn is_important(&self) -> bool {
        self.importance_level == Level::High || self.attention_level == Level::High
    }
}

/// Clamp to [0.0, 1.0].
pub(crate) fn clamp01(x: f32) -> f32 {
    if x < 0.0 {
        0.0
    } else if x > 1.0 {
        1.0
    } else {
        x
    }
}
