// src/config.rs
//! Engine limits: bucket size, overall list size, important-view size.
//!
//! Lookup: `$DIGEST_ENGINE_CONFIG_PATH` → `config/engine.toml` → defaults.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

pub const ENV_ENGINE_CONFIG_PATH: &str = "DIGEST_ENGINE_CONFIG_PATH";
pub const DEFAULT_ENGINE_CONFIG_PATH: &str = "config/engine.toml";

fn default_top_n() -> usize {
    10
}
fn default_top_overall() -> usize {
    10
}
fn default_important_limit() -> usize {
    15
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Max items per category bucket.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_top_overall")]
    pub top_overall: usize,
    #[serde(default = "default_important_limit")]
    pub important_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            top_overall: default_top_overall(),
            important_limit: default_important_limit(),
        }
    }
}

impl EngineConfig {
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading engine config from {}", path.display()))?;
        let is_json = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let cfg: EngineConfig = if is_json {
            serde_json::from_str(&data)
                .with_context(|| format!("parsing engine config json {}", path.display()))?
        } else {
            toml::from_str(&data)
                .with_context(|| format!("parsing engine config toml {}", path.display()))?
        };
        Ok(cfg.sanitized())
    }

    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_ENGINE_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("{ENV_ENGINE_CONFIG_PATH} points to non-existent path"));
        }
        let pb = PathBuf::from(DEFAULT_ENGINE_CONFIG_PATH);
        if pb.exists() {
            return Self::load_from(&pb);
        }
        Ok(Self::default())
    }

    /// Zero limits fall back to defaults.
    pub fn sanitized(mut self) -> Self {
        if self.top_n == 0 {
            self.top_n = default_top_n();
        }
        if self.top_overall == 0 {
            self.top_overall = default_top_overall();
        }
        if self.important_limit == 0 {
            self.important_limit = default_important_limit();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: EngineConfig = toml::from_str("top_n = 5").unwrap();
        assert_eq!(cfg.top_n, 5);
        assert_eq!(cfg.top_overall, 10);
        assert_eq!(cfg.important_limit, 15);
    }

    #[test]
    fn zero_limits_are_sanitized() {
        let cfg = EngineConfig {
            top_n: 0,
            top_overall: 3,
            important_limit: 0,
        }
        .sanitized();
        assert_eq!(cfg, EngineConfig { top_n: 10, top_overall: 3, important_limit: 15 });
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("engine.toml");
        fs::write(&p, "top_n = \"many\"").unwrap();
        let err = EngineConfig::load_from(&p).unwrap_err();
        assert!(err.to_string().contains("engine.toml"), "{err:#}");
    }
}
