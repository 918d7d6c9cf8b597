use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::models::OperationalMode;
use crate::traits::KeyValueStore;

/// Prefix of per-conversation preference keys
pub const CONVERSATION_KEY_PREFIX: &str = "conversation_mode_";
/// Key of the single device-wide preference
pub const GLOBAL_KEY: &str = "user_mode_preference";

/// How mode preferences are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeKeyScope {
    /// One preference per conversation id
    #[default]
    Conversation,
    /// One preference for the whole device
    Global,
}

impl ModeKeyScope {
    /// Storage key for a conversation, or `None` when there is nothing to key on.
    pub fn key(&self, conversation_id: Option<&str>) -> Option<String> {
        match self {
            ModeKeyScope::Conversation => conversation_id
                .filter(|id| !id.is_empty())
                .map(|id| format!("{}{}", CONVERSATION_KEY_PREFIX, id)),
            ModeKeyScope::Global => Some(GLOBAL_KEY.to_string()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModeKeyScope::Conversation => "conversation",
            ModeKeyScope::Global => "global",
        }
    }
}

impl fmt::Display for ModeKeyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid mode scope: {0:?} (expected \"conversation\" or \"global\")")]
pub struct ParseScopeError(pub String);

impl FromStr for ModeKeyScope {
    type Err = ParseScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conversation" => Ok(ModeKeyScope::Conversation),
            "global" => Ok(ModeKeyScope::Global),
            _ => Err(ParseScopeError(s.to_string())),
        }
    }
}

/// Typed, failure-tolerant access to stored mode preferences.
///
/// Store errors and unrecognized stored text are logged and read as "no
/// value"; failed writes are logged and dropped. Nothing here returns an error.
#[derive(Clone)]
pub struct ModeCache {
    store: Arc<dyn KeyValueStore>,
    scope: ModeKeyScope,
}

impl fmt::Debug for ModeCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModeCache")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl ModeCache {
    pub fn new(store: Arc<dyn KeyValueStore>, scope: ModeKeyScope) -> Self {
        Self { store, scope }
    }

    pub fn scope(&self) -> ModeKeyScope {
        self.scope
    }

    /// Stored mode for a conversation.
    pub fn get(&self, conversation_id: Option<&str>) -> Option<OperationalMode> {
        let key = self.scope.key(conversation_id)?;

        let raw = match self.store.get(&key) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read mode preference");
                return None;
            }
        };

        match raw.parse::<OperationalMode>() {
            Ok(mode) => Some(mode),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Ignoring stored mode preference");
                None
            }
        }
    }

    /// Store a mode for a conversation. Returns whether it was written.
    pub fn set(&self, conversation_id: Option<&str>, mode: OperationalMode) -> bool {
        let Some(key) = self.scope.key(conversation_id) else {
            return false;
        };

        match self.store.set(&key, mode.as_str()) {
            Ok(()) => {
                tracing::debug!(key = %key, mode = %mode, "Stored mode preference");
                true
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to store mode preference");
                false
            }
        }
    }

    /// Whether a valid preference exists for this conversation.
    pub fn contains(&self, conversation_id: Option<&str>) -> bool {
        self.get(conversation_id).is_some()
    }

    /// Delete the preference for a conversation.
    pub fn clear(&self, conversation_id: Option<&str>) {
        let Some(key) = self.scope.key(conversation_id) else {
            return;
        };

        if let Err(e) = self.store.remove(&key) {
            tracing::warn!(key = %key, error = %e, "Failed to clear mode preference");
        }
    }
}
