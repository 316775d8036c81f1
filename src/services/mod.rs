// marksync services
// Pure merge functions (snapshot, import merge, reconcile) plus the I/O
// boundary: native tree and remote store contracts, applier and engine.

pub mod applier;
pub mod import_merger;
pub mod native_tree;
pub mod reconciler;
pub mod remote_store;
pub mod snapshot;
pub mod sync_engine;
