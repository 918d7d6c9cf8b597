//! Error category classification.
//!
//! Categories drive retry decisions and the recovery hint printed by the CLI.

use std::fmt;

/// High-level categorization of errors for handling decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Connection, DNS, timeout. Generally transient.
    Network,

    /// Backend rejected the bearer token (401/403).
    Auth,

    /// Backend errors (HTTP 5xx, 429). Retryable after a delay.
    Server,

    /// Unexpected payloads or invalid requests built by this client.
    Client,

    /// The user asked for something that cannot be done as given.
    User,

    /// Missing or invalid settings.
    Configuration,
}

impl ErrorCategory {
    /// Returns true if errors in this category are generally transient
    /// and the operation can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Server => "server",
            ErrorCategory::Client => "client",
            ErrorCategory::User => "user",
            ErrorCategory::Configuration => "configuration",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Could not reach the chat backend",
            ErrorCategory::Auth => "The chat backend rejected the credentials",
            ErrorCategory::Server => "The chat backend reported an error",
            ErrorCategory::Client => "Unexpected response or request",
            ErrorCategory::User => "Invalid command",
            ErrorCategory::Configuration => "Configuration problem",
        }
    }

    /// Suggested recovery action, shown as a `color-eyre` suggestion.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => {
                "Check that the backend is running and CONVERSE_API_URL points at it"
            }
            ErrorCategory::Auth => "Check the token in CONVERSE_TOKEN",
            ErrorCategory::Server => {
                "The backend may be experiencing issues. Please try again later"
            }
            ErrorCategory::Client => {
                "This may be a bug. Please report this issue if it persists"
            }
            ErrorCategory::User => "Run `converse help` for usage",
            ErrorCategory::Configuration => "Check the CONVERSE_* environment variables",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
