// marksync state managers
// Managers own persistent state: the local key-value store and the native tree.

pub mod local_store;
pub mod memory_tree;
