//! Client configuration.
//!
//! Defaults suit a local backend; every field can be overridden through the
//! builder methods or the `CONVERSE_*` environment variables.

use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::error::{ConverseError, ConverseResult};
use crate::mode::ModeKeyScope;

/// Default backend base URL
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

pub const ENV_API_URL: &str = "CONVERSE_API_URL";
pub const ENV_TOKEN: &str = "CONVERSE_TOKEN";
pub const ENV_DATA_DIR: &str = "CONVERSE_DATA_DIR";
pub const ENV_MODE_SCOPE: &str = "CONVERSE_MODE_SCOPE";

/// Configuration for the chat client.
///
/// # Example
///
/// ```ignore
/// let config = ClientConfig::default()
///     .with_api_base_url("https://chat.example.com/api")
///     .with_mode_scope(ModeKeyScope::Global);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash
    pub api_base_url: String,
    /// Bearer token sent with every request
    pub auth_token: Option<String>,
    /// Directory holding `preferences.json`
    pub data_dir: PathBuf,
    /// Whether mode preferences are per conversation or global
    pub mode_scope: ModeKeyScope,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            auth_token: None,
            data_dir: default_data_dir(),
            mode_scope: ModeKeyScope::default(),
        }
    }
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the backend base URL. A trailing slash is dropped.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the bearer token.
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Set the mode preference scope.
    pub fn with_mode_scope(mut self, scope: ModeKeyScope) -> Self {
        self.mode_scope = scope;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Create config from the `CONVERSE_*` environment variables.
    ///
    /// Unset or empty variables keep their defaults. An unrecognized
    /// `CONVERSE_MODE_SCOPE` is logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(url) = env_value(ENV_API_URL) {
            config = config.with_api_base_url(url);
        }
        if let Some(token) = env_value(ENV_TOKEN) {
            config = config.with_auth_token(token);
        }
        if let Some(dir) = env_value(ENV_DATA_DIR) {
            config = config.with_data_dir(dir);
        }
        if let Some(scope) = env_value(ENV_MODE_SCOPE) {
            match scope.parse::<ModeKeyScope>() {
                Ok(scope) => config = config.with_mode_scope(scope),
                Err(e) => tracing::warn!(value = %scope, error = %e, "Ignoring {}", ENV_MODE_SCOPE),
            }
        }

        config
    }

    /// Reject settings no command can work with.
    ///
    /// The base URL must be an absolute http(s) URL with a host.
    pub fn validate(&self) -> ConverseResult<()> {
        let valid = Url::parse(&self.api_base_url)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
            .unwrap_or(false);
        if !valid {
            return Err(ConverseError::Config(format!(
                "{} is not an http(s) URL: {}",
                ENV_API_URL, self.api_base_url
            )));
        }
        Ok(())
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("converse"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [ENV_API_URL, ENV_TOKEN, ENV_DATA_DIR, ENV_MODE_SCOPE] {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
        assert!(config.auth_token.is_none());
        assert_eq!(config.mode_scope, ModeKeyScope::Conversation);
        assert!(config.data_dir.ends_with("converse") || config.data_dir.ends_with("data"));
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_api_base_url("https://chat.example.com/api/")
            .with_auth_token("secret")
            .with_data_dir("/tmp/converse-test")
            .with_mode_scope(ModeKeyScope::Global);

        assert_eq!(config.api_base_url, "https://chat.example.com/api");
        assert_eq!(config.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.data_dir(), Path::new("/tmp/converse-test"));
        assert_eq!(config.mode_scope, ModeKeyScope::Global);
    }

    #[test]
    #[serial]
    fn test_from_env_reads_variables() {
        clear_env();
        std::env::set_var(ENV_API_URL, "http://backend:9000/api");
        std::env::set_var(ENV_TOKEN, "tok");
        std::env::set_var(ENV_DATA_DIR, "/var/lib/converse");
        std::env::set_var(ENV_MODE_SCOPE, "global");

        let config = ClientConfig::from_env();
        clear_env();

        assert_eq!(config.api_base_url, "http://backend:9000/api");
        assert_eq!(config.auth_token.as_deref(), Some("tok"));
        assert_eq!(config.data_dir(), Path::new("/var/lib/converse"));
        assert_eq!(config.mode_scope, ModeKeyScope::Global);
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_blank_and_invalid() {
        clear_env();
        std::env::set_var(ENV_TOKEN, "  ");
        std::env::set_var(ENV_MODE_SCOPE, "per-tab");

        let config = ClientConfig::from_env();
        clear_env();

        assert!(config.auth_token.is_none());
        assert_eq!(config.mode_scope, ModeKeyScope::Conversation);
        assert_eq!(config.api_base_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_validate_base_url() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::default()
            .with_api_base_url("https://chat.example.com/api/")
            .validate()
            .is_ok());

        for bad in ["chat.example.com/api", "ftp://chat.example.com", "not a url"] {
            let err = ClientConfig::default()
                .with_api_base_url(bad)
                .validate()
                .unwrap_err();
            assert!(matches!(err, ConverseError::Config(_)), "{}", bad);
            assert!(err.user_message().contains(ENV_API_URL));
        }
    }
}
