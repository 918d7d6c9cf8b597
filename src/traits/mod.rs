//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`KeyValueStore`] - Per-device preference storage
//! - [`ChatBackend`] - Conversation backend operations

pub mod backend;
pub mod store;

pub use backend::ChatBackend;
pub use store::{KeyValueStore, StoreError};
