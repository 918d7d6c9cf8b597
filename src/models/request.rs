use serde::{Deserialize, Serialize};

use super::{ModeOverride, OperationalMode, UiMessage};

/// Body of `POST /chat/conversations/{id}/messages`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagesRequest {
    pub messages: Vec<UiMessage>,
    /// Present only for an explicit fast/thinking choice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode_override: Option<ModeOverride>,
}

impl SendMessagesRequest {
    pub fn new(messages: Vec<UiMessage>) -> Self {
        Self {
            messages,
            mode_override: None,
        }
    }

    /// Attach the resolved mode (builder pattern). Auto attaches nothing.
    pub fn with_mode(mut self, mode: OperationalMode) -> Self {
        self.mode_override = mode.as_override();
        self
    }
}

/// Body of `POST /chat/conversations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    pub title: String,
    pub first_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    pub operational_mode: OperationalMode,
}

impl CreateConversationRequest {
    pub fn new(first_message: impl Into<String>) -> Self {
        Self {
            title: "Untitled".to_string(),
            first_message: first_message.into(),
            system_prompt: None,
            operational_mode: OperationalMode::Auto,
        }
    }

    /// Set the system prompt; blank prompts are dropped (builder pattern)
    pub fn with_system_prompt(mut self, prompt: Option<String>) -> Self {
        self.system_prompt = prompt.filter(|p| !p.trim().is_empty());
        self
    }

    pub fn with_mode(mut self, mode: OperationalMode) -> Self {
        self.operational_mode = mode;
        self
    }
}

/// Body of the conversation mode update call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateModeRequest {
    pub operational_mode: OperationalMode,
}
