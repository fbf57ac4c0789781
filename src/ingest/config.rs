// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::SourcePriority;

const ENV_PATH: &str = "DIGEST_SOURCES_PATH";

fn default_max_articles() -> usize {
    5
}
fn default_recency_window_days() -> i64 {
    7
}
fn default_exclude_keywords() -> Vec<String> {
    [
        "sponsored", "advertisement", "promoted", "clickbait", "fake news",
        "広告", "宣伝", "スポンサード",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub priority: SourcePriority,
}

impl SourceSpec {
    pub fn new(name: impl Into<String>, priority: SourcePriority) -> Self {
        Self {
            name: name.into(),
            url: String::new(),
            priority,
        }
    }
}

/// Collector settings: per-source cap, age window, exclusion list, sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_max_articles")]
    pub max_articles_per_source: usize,
    #[serde(default = "default_recency_window_days")]
    pub recency_window_days: i64,
    #[serde(default = "default_exclude_keywords")]
    pub exclude_keywords: Vec<String>,
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            max_articles_per_source: default_max_articles(),
            recency_window_days: default_recency_window_days(),
            exclude_keywords: default_exclude_keywords(),
            sources: Vec::new(),
        }
    }
}

/// Load from an explicit path. Supports TOML or JSON formats.
pub fn load_sources_from(path: &Path) -> Result<SourcesConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let cfg = parse_sources(&content, ext.as_str())
        .with_context(|| format!("parsing sources config {}", path.display()))?;
    Ok(clean(cfg))
}

/// Load using env var + fallbacks:
/// 1) $DIGEST_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
pub fn load_sources_default() -> Result<SourcesConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        } else {
            return Err(anyhow!("DIGEST_SOURCES_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_sources_from(&json_p);
    }
    Ok(SourcesConfig::default())
}

fn parse_sources(s: &str, hint_ext: &str) -> Result<SourcesConfig> {
    let try_toml = hint_ext == "toml" || s.contains("[[sources]]");
    if try_toml {
        if let Ok(v) = toml::from_str::<SourcesConfig>(s) {
            return Ok(v);
        }
    }
    if let Ok(v) = serde_json::from_str::<SourcesConfig>(s) {
        return Ok(v);
    }
    if !try_toml {
        if let Ok(v) = toml::from_str::<SourcesConfig>(s) {
            return Ok(v);
        }
    }
    Err(anyhow!("unsupported sources config format"))
}

fn clean(mut cfg: SourcesConfig) -> SourcesConfig {
    use std::collections::BTreeSet;
    let mut seen = BTreeSet::new();
    cfg.exclude_keywords = cfg
        .exclude_keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && seen.insert(k.to_lowercase()))
        .collect();
    cfg.sources.retain(|s| !s.name.trim().is_empty());
    if cfg.recency_window_days <= 0 {
        cfg.recency_window_days = default_recency_window_days();
    }
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_sources_with_defaults() {
        let src = r#"
max_articles_per_source = 3

[[sources]]
name = "OpenAI Blog"
url = "https://openai.com/blog/rss.xml"
priority = "high"

[[sources]]
name = "  "
"#;
        let cfg = clean(parse_sources(src, "toml").unwrap());
        assert_eq!(cfg.max_articles_per_source, 3);
        assert_eq!(cfg.recency_window_days, 7);
        assert_eq!(cfg.sources.len(), 1);
        assert_eq!(cfg.sources[0].priority, SourcePriority::High);
        assert!(cfg.exclude_keywords.iter().any(|k| k == "sponsored"));
    }

    #[test]
    fn exclusion_list_is_trimmed_and_deduped() {
        let src = r#"{"exclude_keywords": [" Sponsored ", "sponsored", "", "promo"]}"#;
        let cfg = clean(parse_sources(src, "json").unwrap());
        assert_eq!(cfg.exclude_keywords, vec!["Sponsored".to_string(), "promo".to_string()]);
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("sources.json");
        fs::write(&p, "{ not json").unwrap();
        let err = load_sources_from(&p).unwrap_err();
        assert!(err.to_string().contains("sources.json"), "{err:#}");
    }
}
