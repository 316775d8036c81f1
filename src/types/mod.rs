// marksync shared type definitions
// Plain data exchanged between the merge functions and their collaborators.

pub mod bookmark;
pub mod errors;
pub mod id_map;
pub mod settings;
pub mod sync;
pub mod tree;
