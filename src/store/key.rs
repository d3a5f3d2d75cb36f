//! Snapshot key normalization.
//!
//! A key is either a timestamp (the usual case, one snapshot per save) or a
//! user-chosen name. Timestamps are rendered in one canonical UTC form so
//! that `2024-03-01T10:00:00+02:00` and `2024-03-01T08:00:00Z` name the same
//! record. Anything else is made path-safe by replacing reserved characters.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical timestamp form. Colons are path-unsafe on some platforms.
const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3fZ";

/// Naive forms accepted as UTC timestamps.
const NAIVE_FORMATS: &[&str] = &[
    CANONICAL_FORMAT,
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Characters that may not appear in a storage identifier.
const RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Key used when the caller supplies an empty key.
const EMPTY_KEY: &str = "null";

/// A normalized, path-safe snapshot key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotKey(String);

impl SnapshotKey {
    /// Normalize a raw key.
    ///
    /// 1. Empty → `"null"`
    /// 2. Parses as an ISO-8601 timestamp → canonical UTC form
    /// 3. Otherwise → reserved and control characters replaced by `_`
    pub fn normalize(raw: &str) -> Self {
        if raw.is_empty() {
            return Self(EMPTY_KEY.to_string());
        }
        if let Some(ts) = parse_timestamp(raw) {
            return Self::from_timestamp(ts);
        }
        Self(sanitize(raw))
    }

    /// Key for a given instant.
    pub fn from_timestamp(ts: DateTime<Utc>) -> Self {
        Self(ts.format(CANONICAL_FORMAT).to_string())
    }

    /// Key for the current instant.
    pub fn now() -> Self {
        Self::from_timestamp(Utc::now())
    }

    /// Wrap an already-normalized key (e.g. a file stem read back from disk).
    pub(crate) fn from_stored(stored: String) -> Self {
        Self(stored)
    }

    /// The timestamp this key names, if it is a timestamp key.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.0)
    }

    /// Human-readable label: RFC 3339 for timestamp keys, the key otherwise.
    pub fn label(&self) -> String {
        match self.timestamp() {
            Some(ts) => ts.to_rfc3339_opts(SecondsFormat::Secs, true),
            None => self.0.clone(),
        }
    }

    /// The key as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sort keys newest first.
///
/// Canonical timestamp keys sort chronologically as strings, so reverse
/// lexicographic order is reverse chronological.
pub fn sort_keys_recent_first(keys: &mut [SnapshotKey]) {
    keys.sort_by(|a, b| b.cmp(a));
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if RESERVED.contains(&c) || c.is_control() { '_' } else { c })
        .collect()
}
