//! Mock implementations for testing.
//!
//! # Available Mocks
//!
//! - [`MemoryStore`] - In-memory key-value store
//! - [`MockBackend`] - Backend that records every request

pub mod backend;
pub mod store;

pub use backend::{MockBackend, RecordedCall};
pub use store::MemoryStore;
