// src/ingest/dates.rs
//! Published-date parsing for heterogeneous feeds.
//!
//! Tried in order: RFC 3339, RFC 2822, then a few strftime shapes seen in
//! the wild. Zone names (`%Z`) and naive timestamps are read as UTC.
//! Anything else is `None`; the engine scores undated items as stale.

use chrono::{DateTime, NaiveDateTime, Utc};
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%SZ",
    "%a, %d %b %Y %H:%M:%S %Z",
    "%Y-%m-%d %H:%M:%S",
];
const OFFSET_FORMATS: [&str; 1] = ["%Y-%m-%dT%H:%M:%S%z"];

fn from_offset(dt: OffsetDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.unix_timestamp(), dt.nanosecond())
}

pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return from_offset(dt);
    }
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc2822) {
        return from_offset(dt);
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn rfc3339_with_z() {
        assert_eq!(
            parse_published("2025-07-28T10:00:00Z"),
            Some(utc(2025, 7, 28, 10, 0, 0))
        );
    }

    #[test]
    fn rfc2822_with_offset() {
        assert_eq!(
            parse_published("Mon, 28 Jul 2025 12:00:00 +0200"),
            Some(utc(2025, 7, 28, 10, 0, 0))
        );
    }

    #[test]
    fn compact_offset_without_colon() {
        assert_eq!(
            parse_published("2025-07-28T12:00:00+0200"),
            Some(utc(2025, 7, 28, 10, 0, 0))
        );
    }

    #[test]
    fn gmt_zone_name() {
        assert_eq!(
            parse_published("Mon, 28 Jul 2025 10:00:00 GMT"),
            Some(utc(2025, 7, 28, 10, 0, 0))
        );
    }

    #[test]
    fn naive_space_separated_is_utc() {
        assert_eq!(
            parse_published("2025-07-28 10:00:00"),
            Some(utc(2025, 7, 28, 10, 0, 0))
        );
    }

    #[test]
    fn garbage_and_empty_are_none() {
        assert_eq!(parse_published(""), None);
        assert_eq!(parse_published("last tuesday"), None);
    }
}
