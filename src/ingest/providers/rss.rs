// src/ingest/providers/rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::ingest::config::SourceSpec;
use crate::ingest::types::{RawEntry, SourceProvider};
use crate::types::Item;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<RssItem>,
}

#[derive(Debug, Deserialize)]
struct RssItem {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

impl From<RssItem> for RawEntry {
    fn from(it: RssItem) -> Self {
        RawEntry {
            title: it.title,
            description: it.description,
            link: it.link,
            published: it.pub_date,
        }
    }
}

/// RSS 2.0 provider over XML the caller already fetched.
pub struct RssProvider {
    pub source: SourceSpec,
    pub rss_content: String,
    pub max_items: usize,
}

impl RssProvider {
    pub fn new(source: SourceSpec, rss_content: impl Into<String>, max_items: usize) -> Self {
        Self {
            source,
            rss_content: rss_content.into(),
            max_items,
        }
    }

    pub fn parse(&self) -> Result<Vec<Item>> {
        let rss: Rss = from_str(&self.rss_content)
            .with_context(|| format!("parsing rss xml for {}", self.source.name))?;
        Ok(rss
            .channel
            .item
            .into_iter()
            .take(self.max_items)
            .map(|it| RawEntry::from(it).into_item(&self.source))
            .collect())
    }
}

#[async_trait]
impl SourceProvider for RssProvider {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        let t0 = std::time::Instant::now();
        let out = self.parse()?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_events_total").increment(out.len() as u64);

        Ok(out)
    }

    fn name(&self) -> &str {
        &self.source.name
    }
}
