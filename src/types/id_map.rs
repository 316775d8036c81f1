use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::bookmark::BookmarkRecord;

/// Links record ids from other devices to the ids this device's native tree
/// assigned when the applier created them.
///
/// A record without an entry is one this device created itself, so its
/// record id and native id are the same.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdMap {
    native_by_record: BTreeMap<String, String>,
}

impl IdMap {
    pub fn is_empty(&self) -> bool {
        self.native_by_record.is_empty()
    }

    /// Native id to address when touching `record_id` in the tree.
    pub fn native_id<'a>(&'a self, record_id: &'a str) -> &'a str {
        self.native_by_record
            .get(record_id)
            .map(String::as_str)
            .unwrap_or(record_id)
    }

    /// Record id that the native node `native_id` stands for.
    pub fn record_id<'a>(&'a self, native_id: &'a str) -> &'a str {
        self.native_by_record
            .iter()
            .find(|(_, native)| native.as_str() == native_id)
            .map(|(record, _)| record.as_str())
            .unwrap_or(native_id)
    }

    pub fn link(&mut self, record_id: impl Into<String>, native_id: impl Into<String>) {
        let (record_id, native_id) = (record_id.into(), native_id.into());
        if record_id == native_id {
            self.native_by_record.remove(&record_id);
        } else {
            self.native_by_record.insert(record_id, native_id);
        }
    }

    pub fn unlink(&mut self, record_id: &str) {
        self.native_by_record.remove(record_id);
    }

    /// Rewrites the ids of a fresh tree snapshot to record ids.
    pub fn to_record_ids(&self, snapshot: Vec<BookmarkRecord>) -> Vec<BookmarkRecord> {
        if self.is_empty() {
            return snapshot;
        }
        let record_by_native: HashMap<&str, &str> = self
            .native_by_record
            .iter()
            .map(|(record, native)| (native.as_str(), record.as_str()))
            .collect();
        snapshot
            .into_iter()
            .map(|mut record| {
                if let Some(record_id) = record_by_native.get(record.id.as_str()) {
                    record.id = record_id.to_string();
                }
                record
            })
            .collect()
    }
}
