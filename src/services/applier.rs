//! Applies remote-origin changes to the native tree.
//!
//! Remote updates go first (remove for tombstones, title/url update
//! otherwise), then remote creates. Position changes of existing bookmarks
//! are not replayed into the tree.
//!
//! Record ids are translated through the [`IdMap`]; every bookmark this run
//! creates is linked there so later imports and syncs find it again.

use tracing::{debug, info, warn};

use crate::services::native_tree::NativeTree;
use crate::types::bookmark::BookmarkRecord;
use crate::types::errors::TreeError;
use crate::types::id_map::IdMap;
use crate::types::sync::{ApplyReport, SyncResult};
use crate::types::tree::{CreateDetails, UpdateChanges};

/// Issues the native create/update/remove calls implied by `result`.
///
/// A bookmark the tree no longer has is recreated on update and skipped on
/// remove. Unmodifiable targets are skipped.
pub async fn apply_remote_changes<T: NativeTree + ?Sized>(
    tree: &T,
    result: &SyncResult,
    ids: &mut IdMap,
) -> Result<ApplyReport, TreeError> {
    let mut report = ApplyReport::default();

    for change in &result.remote_updates {
        let native_id = ids.native_id(&change.id).to_string();
        if change.deleted {
            info!(id = %change.id, title = %change.title, "Deleting bookmark");
            match tree.remove(&native_id).await {
                Ok(()) => report.removed += 1,
                Err(TreeError::NotFound(_)) => {
                    debug!(id = %change.id, "Bookmark already gone from tree");
                    report.skipped += 1;
                }
                Err(TreeError::Unmodifiable(_)) => {
                    warn!(id = %change.id, "Bookmark is unmodifiable, not deleting");
                    report.skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            }
            ids.unlink(&change.id);
        } else {
            info!(id = %change.id, title = %change.title, "Updating bookmark");
            let changes = UpdateChanges {
                title: change.title.clone(),
                url: change.url.clone(),
            };
            match tree.update(&native_id, changes).await {
                Ok(()) => report.updated += 1,
                Err(TreeError::NotFound(_)) => {
                    warn!(id = %change.id, "Updated bookmark missing from tree, recreating");
                    let created = create_with_fallback(tree, change).await?;
                    ids.link(change.id.clone(), created.clone());
                    report.created.push((change.id.clone(), created));
                }
                Err(TreeError::Unmodifiable(_)) => {
                    warn!(id = %change.id, "Bookmark is unmodifiable, not updating");
                    report.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    let mut creates: Vec<&BookmarkRecord> = result.remote_new.iter().collect();
    creates.sort_by_key(|record| record.index.unwrap_or(u32::MAX));

    for record in creates {
        if record.deleted {
            debug!(id = %record.id, "Skipping tombstone from another device");
            report.skipped += 1;
            continue;
        }
        info!(id = %record.id, title = %record.title, "Creating bookmark");
        let native_id = create_with_fallback(tree, record).await?;
        ids.link(record.id.clone(), native_id.clone());
        report.created.push((record.id.clone(), native_id));
    }

    Ok(report)
}

/// Creates `record`, retrying at the default location when its parent
/// folder does not exist on this device.
async fn create_with_fallback<T: NativeTree + ?Sized>(
    tree: &T,
    record: &BookmarkRecord,
) -> Result<String, TreeError> {
    let details = CreateDetails {
        title: record.title.clone(),
        url: record.url.clone(),
        index: record.index,
        parent_id: record.parent_id.clone(),
    };
    match tree.create(details.clone()).await {
        Err(TreeError::ParentNotFound(parent)) if details.parent_id.is_some() => {
            warn!(id = %record.id, parent = %parent, "Unknown parent folder, creating at default location");
            tree.create(CreateDetails {
                index: None,
                parent_id: None,
                ..details
            })
            .await
        }
        other => other,
    }
}
