//! Event-driven triggers.
//!
//! Whatever watches the browser (alarms, bookmark listeners, buttons) turns
//! what it sees into a [`BookmarkEvent`] and hands it to
//! [`SyncEngine::handle_event`]. Native change events that arrive while the
//! engine is applying its own mutations are ignored.

use serde::Serialize;
use tracing::debug;

use crate::services::native_tree::NativeTree;
use crate::services::remote_store::RemoteStore;
use crate::services::sync_engine::SyncEngine;
use crate::types::errors::SyncError;
use crate::types::sync::{ImportOutcome, SyncOutcome};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookmarkEvent {
    /// First run after installation.
    Installed,
    /// Periodic timer fired.
    Alarm,
    /// A native bookmark's title or url changed.
    Changed { id: String },
    /// A native bookmark moved to another folder or position.
    Moved { id: String },
    /// A native bookmark was removed.
    Removed { id: String },
    SyncRequested,
    ImportRequested,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum EventOutcome {
    Imported(ImportOutcome),
    Synced(SyncOutcome),
    /// The removed bookmark was tombstoned; `sync` carries the follow-up sync
    /// that pushed the tombstone, if there was anything to tombstone.
    Removed { id: String, sync: Option<SyncOutcome> },
    Ignored,
}

impl<R: RemoteStore, T: NativeTree> SyncEngine<R, T> {
    /// Runs the operation an event calls for.
    ///
    /// Removals tombstone the stored record and sync straight away. A failed
    /// sync leaves the tombstone stored for the next one.
    pub async fn handle_event(&self, event: BookmarkEvent) -> Result<EventOutcome, SyncError> {
        let native_change = matches!(
            event,
            BookmarkEvent::Changed { .. } | BookmarkEvent::Moved { .. } | BookmarkEvent::Removed { .. }
        );
        if native_change && self.is_applying() {
            debug!(?event, "Ignoring native change made by the applier");
            return Ok(EventOutcome::Ignored);
        }

        match event {
            BookmarkEvent::Installed
            | BookmarkEvent::ImportRequested
            | BookmarkEvent::Changed { .. }
            | BookmarkEvent::Moved { .. } => Ok(EventOutcome::Imported(self.import_bookmarks().await?)),
            BookmarkEvent::Alarm | BookmarkEvent::SyncRequested => {
                Ok(EventOutcome::Synced(self.sync_bookmarks().await?))
            }
            BookmarkEvent::Removed { id } => {
                let sync = if self.mark_deleted(&id).await? {
                    Some(self.sync_bookmarks().await?)
                } else {
                    None
                };
                Ok(EventOutcome::Removed { id, sync })
            }
        }
    }
}
