//! marksync keeps browser bookmarks synchronized between a local store and
//! a shared remote store.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod database;
pub mod events;
pub mod managers;
pub mod services;
pub mod types;
