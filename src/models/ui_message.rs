//! Render-ready message model.
//!
//! A [`UiMessage`] is rebuilt from a backend [`Message`](super::Message) on
//! every render and is never persisted. Its body is an ordered list of
//! [`Part`]s, a closed sum type the renderer matches exhaustively.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use super::{MessageRole, OperationalMode, ToolCallState};

/// State-dependent payload of a tool-call part.
///
/// Each state carries at most the one field that belongs to it, so a pending
/// call can never hold output and a successful call can never hold error text.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolPayload {
    Pending,
    OutputAvailable { output: Option<Value> },
    OutputError { error_text: Option<String> },
}

impl ToolPayload {
    pub fn state(&self) -> ToolCallState {
        match self {
            ToolPayload::Pending => ToolCallState::Pending,
            ToolPayload::OutputAvailable { .. } => ToolCallState::OutputAvailable,
            ToolPayload::OutputError { .. } => ToolCallState::OutputError,
        }
    }

    pub fn output(&self) -> Option<&Value> {
        match self {
            ToolPayload::OutputAvailable { output } => output.as_ref(),
            _ => None,
        }
    }

    pub fn error_text(&self) -> Option<&str> {
        match self {
            ToolPayload::OutputError { error_text } => error_text.as_deref(),
            _ => None,
        }
    }
}

/// A tool invocation and its outcome, attached to an assistant message.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallPart {
    /// Discriminator copied from the backend record
    pub tool_type: String,
    pub tool_name: Option<String>,
    pub payload: ToolPayload,
    pub args: Option<Value>,
}

impl ToolCallPart {
    pub fn state(&self) -> ToolCallState {
        self.payload.state()
    }
}

/// One renderable unit of a message body.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text { text: String },
    ToolCall(ToolCallPart),
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// The `type` discriminator as the UI wire format spells it.
    pub fn part_type(&self) -> &str {
        match self {
            Part::Text { .. } => "text",
            Part::ToolCall(call) => &call.tool_type,
        }
    }
}

impl Serialize for Part {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Part::Text { text } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "text")?;
                map.serialize_entry("text", text)?;
                map.end()
            }
            Part::ToolCall(call) => {
                let mut map = serializer.serialize_map(None)?;
                map.serialize_entry("type", &call.tool_type)?;
                map.serialize_entry("state", call.state().as_str())?;
                if let Some(name) = &call.tool_name {
                    map.serialize_entry("toolName", name)?;
                }
                match &call.payload {
                    ToolPayload::Pending => {}
                    ToolPayload::OutputAvailable { output } => {
                        if let Some(output) = output {
                            map.serialize_entry("output", output)?;
                        }
                    }
                    ToolPayload::OutputError { error_text } => {
                        if let Some(error_text) = error_text {
                            map.serialize_entry("errorText", error_text)?;
                        }
                    }
                }
                if let Some(args) = &call.args {
                    map.serialize_entry("args", args)?;
                }
                map.end()
            }
        }
    }
}

/// A message ready for display.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct UiMessage {
    pub id: String,
    pub role: MessageRole,
    pub parts: Vec<Part>,
    pub metadata: Map<String, Value>,
}

impl UiMessage {
    /// A user message consisting of a single text part.
    pub fn user_text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: MessageRole::User,
            parts: vec![Part::text(text)],
            metadata: Map::new(),
        }
    }

    pub fn created_at(&self) -> Option<&str> {
        self.metadata.get("createdAt").and_then(Value::as_str)
    }

    /// Mode the server actually used, shown as a badge on assistant messages.
    ///
    /// Reads `effectiveMode` first and falls back to `operationalMode`. Auto is
    /// never a badge.
    pub fn effective_mode(&self) -> Option<OperationalMode> {
        ["effectiveMode", "operationalMode"]
            .iter()
            .filter_map(|key| self.metadata.get(*key).and_then(Value::as_str))
            .filter_map(|s| s.parse::<OperationalMode>().ok())
            .find(|mode| *mode != OperationalMode::Auto)
    }

    /// Whether the server picked the mode on its own.
    pub fn was_auto_selected(&self) -> bool {
        self.metadata
            .get("wasAutoSelected")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Concatenation of all text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                Part::ToolCall(_) => None,
            })
            .collect()
    }
}
