use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// One synchronizable bookmark.
///
/// Records are value snapshots: merge code never edits a record in place,
/// it builds a copy with a new `updated` stamp. Field names on the wire are
/// camelCase, timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub updated: i64,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub index: Option<u32>,
}

impl BookmarkRecord {
    /// Creates a live record with no position and no timestamps.
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            created: None,
            updated: 0,
            deleted: false,
            parent_id: None,
            index: None,
        }
    }

    /// Two records are content-equal when title, url, parent and index match.
    ///
    /// `created`, `updated` and `deleted` are deliberately ignored here; they
    /// drive merge decisions but never make two records "different content".
    pub fn content_eq(&self, other: &BookmarkRecord) -> bool {
        self.title == other.title
            && self.url == other.url
            && self.parent_id == other.parent_id
            && self.index == other.index
    }

    /// Returns a copy stamped with `updated`.
    pub fn stamped(&self, updated: i64) -> Self {
        Self {
            updated,
            ..self.clone()
        }
    }

    /// Returns a tombstoned copy of this record.
    pub fn tombstoned(&self, now: i64) -> Self {
        Self {
            deleted: true,
            updated: bump_timestamp(self.updated, now),
            ..self.clone()
        }
    }
}

/// Next `updated` value for a record whose previous stamp was `previous`.
///
/// Normally just `now`; a clock that runs behind the stored stamp still
/// yields a strictly larger value so `updated` never goes backwards.
pub fn bump_timestamp(previous: i64, now: i64) -> i64 {
    if now > previous {
        now
    } else {
        previous.saturating_add(1)
    }
}

/// Current UNIX time in milliseconds.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}
