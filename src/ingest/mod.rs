// src/ingest/mod.rs
//! Collector side: normalize, filter and exact-dedup what providers return,
//! producing the immutable `Item` batch the engine scores. Fetching itself
//! (HTTP, rate limits) belongs to whoever builds the providers.

pub mod config;
pub mod dates;
pub mod providers;
pub mod types;

use chrono::{DateTime, Duration, Utc};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

use crate::dedup::dedup_exact;
use crate::ingest::config::SourcesConfig;
use crate::ingest::types::SourceProvider;
use crate::types::Item;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_events_total", "Total items parsed from providers.");
        describe_counter!(
            "ingest_excluded_total",
            "Items dropped by the exclusion keyword list."
        );
        describe_counter!(
            "ingest_stale_total",
            "Items dropped for being older than the recency window."
        );
        describe_counter!(
            "ingest_dedup_total",
            "Items removed by exact title dedup."
        );
        describe_counter!(
            "ingest_provider_errors_total",
            "Provider fetch/parse errors."
        );
        describe_histogram!("ingest_parse_ms", "Provider parse time in milliseconds.");
        describe_gauge!(
            "ingest_pipeline_last_run_ts",
            "Unix timestamp of the last collector pass."
        );
    });
}

/// Normalize text: decode entities, strip tags, collapse whitespace, trim.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    out = re_ws.replace_all(&out, " ").to_string();
    out = out.trim().to_string();

    // 5) Length cap: 1500 chars
    if out.chars().count() > 1500 {
        out = out.chars().take(1500).collect();
    }

    out
}

/// Case-insensitive substring match of the title against the exclusion list.
pub fn is_excluded<S: AsRef<str>>(title: &str, keywords: &[S]) -> bool {
    let t = title.to_lowercase();
    keywords
        .iter()
        .any(|k| !k.as_ref().is_empty() && t.contains(&k.as_ref().to_lowercase()))
}

/// Undated items pass; dated ones must be within `window_days` of `now`.
pub fn is_recent(published: Option<DateTime<Utc>>, now: DateTime<Utc>, window_days: i64) -> bool {
    match published {
        Some(p) => p >= now - Duration::days(window_days),
        None => true,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub fetched: usize,
    pub excluded: usize,
    pub stale: usize,
    pub duplicates: usize,
    pub provider_errors: usize,
}

/// Exclusion + recency filter + exact dedup, preserving order.
pub fn filter_and_dedup(
    now: DateTime<Utc>,
    raw: Vec<Item>,
    cfg: &SourcesConfig,
) -> (Vec<Item>, IngestStats) {
    let mut stats = IngestStats {
        fetched: raw.len(),
        ..Default::default()
    };
    let mut filtered = Vec::with_capacity(raw.len());
    for it in raw {
        if is_excluded(&it.title, &cfg.exclude_keywords) {
            stats.excluded += 1;
            continue;
        }
        if !is_recent(it.published_at, now, cfg.recency_window_days) {
            stats.stale += 1;
            continue;
        }
        filtered.push(it);
    }
    let (kept, dup) = dedup_exact(filtered);
    stats.duplicates = dup;
    (kept, stats)
}

/// Collect from every provider in order, then filter and dedup.
/// A failing provider is logged and skipped.
pub async fn run_once(
    providers: &[Box<dyn SourceProvider>],
    cfg: &SourcesConfig,
    now: DateTime<Utc>,
) -> (Vec<Item>, IngestStats) {
    ensure_metrics_described();

    let mut raw = Vec::new();
    let mut errors = 0usize;
    for p in providers {
        match p.fetch_latest().await {
            Ok(mut v) => {
                v.truncate(cfg.max_articles_per_source);
                tracing::info!(target: "ingest", provider = p.name(), items = v.len(), "provider done");
                raw.append(&mut v);
            }
            Err(e) => {
                tracing::warn!(target: "ingest", error = ?e, provider = p.name(), "provider error");
                counter!("ingest_provider_errors_total").increment(1);
                errors += 1;
            }
        }
    }

    let (kept, mut stats) = filter_and_dedup(now, raw, cfg);
    stats.provider_errors = errors;

    counter!("ingest_excluded_total").increment(stats.excluded as u64);
    counter!("ingest_stale_total").increment(stats.stale as u64);
    counter!("ingest_dedup_total").increment(stats.duplicates as u64);
    gauge!("ingest_pipeline_last_run_ts").set(now.timestamp() as f64);

    (kept, stats)
}
