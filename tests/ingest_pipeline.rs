// tests/ingest_pipeline.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use genai_digest::ingest::config::{SourceSpec, SourcesConfig};
use genai_digest::ingest::providers::rss::RssProvider;
use genai_digest::ingest::types::SourceProvider;
use genai_digest::ingest::{run_once, IngestStats};
use genai_digest::{Item, SourcePriority};
use std::fs;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 7, 28, 12, 0, 0).unwrap()
}

fn fixture_provider() -> RssProvider {
    let xml = fs::read_to_string("tests/fixtures/genai_rss.xml").expect("fixture");
    RssProvider::new(SourceSpec::new("GenAI Weekly", SourcePriority::High), xml, 10)
}

struct FailingProvider;

#[async_trait]
impl SourceProvider for FailingProvider {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        Err(anyhow!("connection reset"))
    }
    fn name(&self) -> &str {
        "Failing"
    }
}

struct StaticProvider(Vec<Item>);

#[async_trait]
impl SourceProvider for StaticProvider {
    async fn fetch_latest(&self) -> Result<Vec<Item>> {
        Ok(self.0.clone())
    }
    fn name(&self) -> &str {
        "Static"
    }
}

#[tokio::test]
async fn fixture_is_normalized_and_filtered() {
    let providers: Vec<Box<dyn SourceProvider>> = vec![Box::new(fixture_provider())];
    let cfg = SourcesConfig {
        max_articles_per_source: 10,
        ..SourcesConfig::default()
    };
    let (items, stats) = run_once(&providers, &cfg, now()).await;

    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "OpenAI releases GPT-5 with new reasoning",
            "Stable Diffusion 4 image model announced",
            "NVIDIA unveils a new GPU for inference",
        ]
    );
    assert_eq!(items[0].description, "The model tops every benchmark we tried.");
    assert!(items[2].published_at.is_none());
    assert!(items.iter().all(|i| i.source_priority == SourcePriority::High));
    assert_eq!(
        stats,
        IngestStats {
            fetched: 6,
            excluded: 1,
            stale: 1,
            duplicates: 1,
            provider_errors: 0,
        }
    );
}

#[tokio::test]
async fn per_source_cap_applies_before_filters() {
    let providers: Vec<Box<dyn SourceProvider>> = vec![Box::new(fixture_provider())];
    let cfg = SourcesConfig {
        max_articles_per_source: 2,
        ..SourcesConfig::default()
    };
    let (items, stats) = run_once(&providers, &cfg, now()).await;
    assert_eq!(stats.fetched, 2);
    assert_eq!(stats.excluded, 1);
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn failing_provider_does_not_stop_the_batch() {
    let providers: Vec<Box<dyn SourceProvider>> = vec![
        Box::new(FailingProvider),
        Box::new(StaticProvider(vec![
            Item::new("Claude ships tool use", "").published(now()),
        ])),
    ];
    let (items, stats) = run_once(&providers, &SourcesConfig::default(), now()).await;
    assert_eq!(items.len(), 1);
    assert_eq!(stats.provider_errors, 1);
    assert_eq!(stats.fetched, 1);
}

#[tokio::test]
async fn provider_order_decides_which_duplicate_survives() {
    let providers: Vec<Box<dyn SourceProvider>> = vec![
        Box::new(StaticProvider(vec![
            Item::new("Gemini 2 released", "").source("Google", SourcePriority::High),
        ])),
        Box::new(StaticProvider(vec![
            Item::new("GEMINI 2 RELEASED", "").source("Aggregator", SourcePriority::Low),
        ])),
    ];
    let (items, stats) = run_once(&providers, &SourcesConfig::default(), now()).await;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].source_name, "Google");
    assert_eq!(stats.duplicates, 1);
}
