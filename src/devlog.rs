//! Tracing setup and dev-only diagnostics.
//!
//! Per-item traces are gated: `DIGEST_DEV_LOG=1` AND a dev environment
//! (debug build OR `DIGEST_ENV` in {local, development, dev}). Item text is
//! never logged; items are identified by a short SHA-256 prefix.

use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::scoring::ScoreBreakdown;
use crate::types::Item;

pub const ENV_DEV_LOG: &str = "DIGEST_DEV_LOG";
pub const ENV_DIGEST_ENV: &str = "DIGEST_ENV";
pub const ENV_LOG_FORMAT: &str = "DIGEST_LOG_FORMAT";
const DEFAULT_FILTER: &str = "genai_digest=info,warn";

/// Install a fmt subscriber honoring `RUST_LOG`. Compact by default,
/// JSON lines when `DIGEST_LOG_FORMAT=json`. Safe to call twice.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let json = std::env::var(ENV_LOG_FORMAT)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
}

pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    if !on {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        std::env::var(ENV_DIGEST_ENV)
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str(),
        "local" | "development" | "dev"
    )
}

/// 12 hex chars of SHA-256.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Stable anonymized id: link when present, title otherwise.
pub fn item_id(item: &Item) -> String {
    if item.link.is_empty() {
        anon_hash(&item.title)
    } else {
        anon_hash(&item.link)
    }
}

/// Per-item trace; callers check `dev_logging_enabled()` once per batch.
pub(crate) fn dev_log_scored(item: &Item, category_id: &str, b: &ScoreBreakdown) {
    debug!(
        target: "engine",
        id = %item_id(item),
        category = category_id,
        match_ratio = b.match_ratio,
        title = b.title,
        content = b.content,
        days_old = b.days_old,
        importance = b.importance,
        attention = b.attention,
        "scored"
    );
}
