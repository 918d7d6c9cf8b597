//! Error handling at the command boundary.
//!
//! Library modules return their own error types (`ApiError`,
//! `SessionError`). Preference store failures never reach this layer; the
//! mode cache degrades instead. Commands convert them into [`ConverseError`], which adds
//! a category, a stable code and a user-facing message.
//!
//! # Error Categories
//!
//! | Category | Description | Retryable |
//! |----------|-------------|-----------|
//! | Network | Connection, DNS, timeout | Yes |
//! | Auth | Token rejected (401/403) | No |
//! | Server | Backend errors (5xx, 429) | Yes |
//! | Client | Unexpected payloads, bad requests | No |
//! | User | Invalid command | No |
//! | Configuration | Bad settings | No |

mod category;
mod converse_error;

pub use category::ErrorCategory;
pub use converse_error::ConverseError;

/// Result alias used by CLI commands
pub type ConverseResult<T> = Result<T, ConverseError>;
