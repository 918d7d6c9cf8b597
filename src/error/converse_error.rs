//! Unified error type for the client.

use crate::api::ApiError;
use crate::session::SessionError;

use super::category::ErrorCategory;

/// Top-level error returned by CLI commands.
///
/// Library modules keep their own error types; this one only exists at the
/// outer boundary where errors are classified and shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum ConverseError {
    #[error(transparent)]
    Api(ApiError),

    /// Session-level failures other than backend errors
    #[error(transparent)]
    Session(SessionError),

    /// Settings that cannot work, caught before any request is made
    #[error("Configuration error: {0}")]
    Config(String),

    /// Bad command line
    #[error("{0}")]
    Usage(String),
}

impl ConverseError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConverseError::Api(err) => match err {
                ApiError::Http(e) if e.is_decode() => ErrorCategory::Client,
                ApiError::Http(_) => ErrorCategory::Network,
                ApiError::ServerError { status, .. } => match status {
                    401 | 403 => ErrorCategory::Auth,
                    429 | 500..=599 => ErrorCategory::Server,
                    _ => ErrorCategory::Client,
                },
                ApiError::Json(_) => ErrorCategory::Client,
                ApiError::InvalidUrl(_) => ErrorCategory::Configuration,
            },
            ConverseError::Session(_) => ErrorCategory::User,
            ConverseError::Config(_) => ErrorCategory::Configuration,
            ConverseError::Usage(_) => ErrorCategory::User,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            ConverseError::Api(err) => err.is_retryable(),
            ConverseError::Session(SessionError::SendInProgress) => true,
            _ => false,
        }
    }

    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            ConverseError::Api(ApiError::ServerError { status: 404, .. }) => {
                "Conversation not found".to_string()
            }
            ConverseError::Api(ApiError::ServerError { status, message }) if message.is_empty() => {
                format!("Backend returned status {}", status)
            }
            ConverseError::Api(err) => format!("{}: {}", self.category().description(), err),
            ConverseError::Session(err) => err.to_string(),
            ConverseError::Config(msg) => format!("Configuration error: {}", msg),
            ConverseError::Usage(msg) => msg.clone(),
        }
    }

    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConverseError::Api(ApiError::Http(_)) => "API_HTTP",
            ConverseError::Api(ApiError::Json(_)) => "API_JSON",
            ConverseError::Api(ApiError::ServerError { .. }) => "API_STATUS",
            ConverseError::Api(ApiError::InvalidUrl(_)) => "API_URL",
            ConverseError::Session(SessionError::SendInProgress) => "SEND_IN_PROGRESS",
            ConverseError::Session(_) => "SESSION",
            ConverseError::Config(_) => "CONFIG",
            ConverseError::Usage(_) => "USAGE",
        }
    }

    /// Recovery hint for this error's category.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

impl From<ApiError> for ConverseError {
    fn from(err: ApiError) -> Self {
        ConverseError::Api(err)
    }
}

/// Backend failures inside a session surface as API errors.
impl From<SessionError> for ConverseError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Api(api) => ConverseError::Api(api),
            other => ConverseError::Session(other),
        }
    }
}
