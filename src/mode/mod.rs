//! Operational mode resolution.
//!
//! [`ModeCache`] is the only code that touches stored mode preferences;
//! [`ModeResolver`] decides the effective mode from the cache, the server's
//! last-known value and explicit user selection.

mod cache;
mod resolver;

pub use cache::{ModeCache, ModeKeyScope, ParseScopeError, CONVERSATION_KEY_PREFIX, GLOBAL_KEY};
pub use resolver::ModeResolver;
