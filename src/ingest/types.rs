// src/ingest/types.rs
use anyhow::Result;

use crate::ingest::config::SourceSpec;
use crate::ingest::dates::parse_published;
use crate::ingest::normalize_text;
use crate::types::Item;

/// One entry as a feed/API/scraper hands it over, before normalization.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>, // free-form date string
}

impl RawEntry {
    /// Normalize text, parse the date and attach source metadata.
    pub fn into_item(self, source: &SourceSpec) -> Item {
        Item {
            title: normalize_text(self.title.as_deref().unwrap_or_default()),
            description: normalize_text(self.description.as_deref().unwrap_or_default()),
            link: self.link.unwrap_or_default().trim().to_string(),
            published_at: self.published.as_deref().and_then(parse_published),
            source_name: source.name.clone(),
            source_priority: source.priority,
        }
    }
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<Item>>;
    fn name(&self) -> &str;
}
