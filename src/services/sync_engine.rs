//! Sync Engine for marksync.
//!
//! Drives the import and sync flows against the three collaborators (local
//! store, remote store, native tree) and owns the in-flight slot that keeps
//! two runs from reading the same pre-sync state.
//!
//! Sync commit order: the remote document is replaced first and the local
//! collection is written only after that succeeded. A failed PUT leaves the
//! local store exactly as it was before the run. Remote changes are applied
//! to the native tree after both writes; the applier recreates bookmarks the
//! tree lost, so an applied update is never stranded in the stores only.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::managers::local_store::{LocalStore, LocalStoreTrait};
use crate::services::applier::apply_remote_changes;
use crate::services::import_merger::merge_bookmarks;
use crate::services::native_tree::NativeTree;
use crate::services::reconciler::reconcile;
use crate::services::remote_store::RemoteStore;
use crate::services::snapshot::collect_bookmarks;
use crate::types::bookmark::now_millis;
use crate::types::errors::SyncError;
use crate::types::sync::{ImportOutcome, StoreDocument, SyncOutcome};

pub struct SyncEngine<R, T> {
    store: LocalStore,
    remote: R,
    tree: T,
    in_flight: Mutex<()>,
    applying: AtomicBool,
    reimport_after_delete: bool,
    api_url_override: Option<String>,
}

/// Clears the applying flag when the applier finishes or fails.
struct ApplyingGuard<'a>(&'a AtomicBool);

impl<'a> ApplyingGuard<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for ApplyingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<R: RemoteStore, T: NativeTree> SyncEngine<R, T> {
    pub fn new(store: LocalStore, remote: R, tree: T) -> Self {
        Self {
            store,
            remote,
            tree,
            in_flight: Mutex::new(()),
            applying: AtomicBool::new(false),
            reimport_after_delete: true,
            api_url_override: None,
        }
    }

    /// Uses `api_url` instead of the persisted one, without persisting it.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url_override = Some(api_url.into());
        self
    }

    /// Whether a sync that removed native bookmarks re-imports the tree afterwards.
    pub fn with_reimport_after_delete(mut self, enabled: bool) -> Self {
        self.reimport_after_delete = enabled;
        self
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// True while the engine itself is mutating the native tree.
    pub fn is_applying(&self) -> bool {
        self.applying.load(Ordering::SeqCst)
    }

    /// Imports the native tree into the local collection.
    pub async fn import_bookmarks(&self) -> Result<ImportOutcome, SyncError> {
        let result = match self.in_flight.try_lock() {
            Ok(_slot) => self.import_locked().await,
            Err(_) => Err(SyncError::AlreadyRunning),
        };
        report_failure("Import", result)
    }

    /// Runs one full sync with the remote store.
    pub async fn sync_bookmarks(&self) -> Result<SyncOutcome, SyncError> {
        let result = match self.in_flight.try_lock() {
            Ok(_slot) => self.sync_locked().await,
            Err(_) => Err(SyncError::AlreadyRunning),
        };
        report_failure("Sync", result)
    }

    /// Tombstones the stored record behind the native bookmark `id`. Returns
    /// false if there was no live record for it. Waits for any running import
    /// or sync to finish.
    pub async fn mark_deleted(&self, id: &str) -> Result<bool, SyncError> {
        let _slot = self.in_flight.lock().await;
        let mut ids = self.store.get_id_map()?;
        let record_id = ids.record_id(id).to_string();

        let mut bookmarks = self.store.get_bookmarks()?;
        let Some(record) = bookmarks.iter_mut().find(|b| b.id == record_id && !b.deleted) else {
            return Ok(false);
        };
        *record = record.tombstoned(now_millis());
        self.store.save_bookmarks(&bookmarks)?;
        if record_id != id {
            ids.unlink(&record_id);
            self.store.save_id_map(&ids)?;
        }
        info!(id = %record_id, "Marked bookmark as deleted");
        Ok(true)
    }

    async fn import_locked(&self) -> Result<ImportOutcome, SyncError> {
        let root = self.tree.get_tree().await?;
        let now = now_millis();
        let imported = self
            .store
            .get_id_map()?
            .to_record_ids(collect_bookmarks(&root, now));
        let current = self.store.get_bookmarks()?;
        let (bookmarks, stats) = merge_bookmarks(&current, &imported, now);

        let persisted = stats.has_changes();
        if persisted {
            self.store.save_bookmarks(&bookmarks)?;
            info!(
                new = stats.new,
                updated = stats.updated,
                removed = stats.removed,
                "Imported bookmarks from browser"
            );
        } else {
            info!("No new or updated bookmarks found");
        }

        Ok(ImportOutcome {
            bookmarks,
            stats,
            persisted,
        })
    }

    async fn sync_locked(&self) -> Result<SyncOutcome, SyncError> {
        let local = self.store.get_bookmarks()?;
        let mut config = self.store.get_config()?;
        if let Some(api_url) = &self.api_url_override {
            config = config.with_api_url(api_url.as_str());
        }

        let (store_id, remote) = match config.store_id {
            Some(store_id) => {
                let remote = self
                    .remote
                    .fetch_store(&config.api_url, &store_id)
                    .await?
                    .into_bookmarks();
                if remote.is_empty() {
                    info!("Empty bookmark store, this is probably the first sync");
                }
                (store_id, remote)
            }
            None => {
                let store_id = self.remote.create_store(&config.api_url).await?;
                self.store.set_store_id(&store_id)?;
                info!(%store_id, "Created store");
                (store_id, Vec::new())
            }
        };

        let result = reconcile(&local, &remote);

        self.remote
            .update_store(&config.api_url, &store_id, &StoreDocument::new(result.bookmarks.clone()))
            .await?;
        self.store.save_bookmarks(&result.bookmarks)?;

        if result.has_changes() {
            info!(
                local_updates = result.local_updates.len(),
                local_new = result.local_new.len(),
                remote_updates = result.remote_updates.len(),
                remote_new = result.remote_new.len(),
                "Sync completed"
            );
        } else {
            info!("Sync completed. No changes");
        }

        let mut ids = self.store.get_id_map()?;
        let applied = {
            let _applying = ApplyingGuard::raise(&self.applying);
            apply_remote_changes(&self.tree, &result, &mut ids).await
        };
        // Links for bookmarks created before a failure must survive it.
        self.store.save_id_map(&ids)?;
        let applied = applied?;

        let reimport = if applied.needs_reimport() && self.reimport_after_delete {
            info!(removed = applied.removed, "Re-importing after native removals");
            Some(self.import_locked().await?.stats)
        } else {
            None
        };

        Ok(SyncOutcome {
            store_id,
            result,
            applied,
            reimport,
        })
    }
}

fn report_failure<V>(operation: &str, result: Result<V, SyncError>) -> Result<V, SyncError> {
    match &result {
        Err(SyncError::AlreadyRunning) => warn!("{} skipped: another run is in flight", operation),
        Err(e) => error!(error = %e, "{} failed", operation),
        Ok(_) => {}
    }
    result
}
