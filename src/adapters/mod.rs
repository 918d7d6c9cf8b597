//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`FileStore`] - JSON-file key-value store
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MemoryStore`] - In-memory store with failure switches
//! - [`mock::MockBackend`] - Backend that records requests

pub mod file_store;
pub mod mock;

pub use file_store::FileStore;
pub use mock::{MemoryStore, MockBackend};
