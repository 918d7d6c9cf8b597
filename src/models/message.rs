use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{deserialize_id, deserialize_lenient_string, OperationalMode};

/// Role of a message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// Execution state of a backend tool call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolCallState {
    /// Tool is still running. Also stands in for states this client does
    /// not know.
    #[default]
    Pending,
    /// Tool finished and produced output
    OutputAvailable,
    /// Tool failed
    OutputError,
}

fn deserialize_type<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(deserialize_lenient_string(deserializer)?.unwrap_or_default())
}

impl ToolCallState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCallState::Pending => "pending",
            ToolCallState::OutputAvailable => "output-available",
            ToolCallState::OutputError => "output-error",
        }
    }

    fn from_wire(value: &str) -> Self {
        match value {
            "output-available" => ToolCallState::OutputAvailable,
            "output-error" => ToolCallState::OutputError,
            _ => ToolCallState::Pending,
        }
    }
}

fn deserialize_lenient_state<'de, D>(deserializer: D) -> Result<ToolCallState, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(deserialize_lenient_string(deserializer)?
        .map(|s| ToolCallState::from_wire(&s))
        .unwrap_or_default())
}

/// A tool-call record as stored by the backend inside message metadata.
///
/// Deserialization never rejects an object: ill-typed string fields read as
/// absent and an unknown or missing state reads as [`ToolCallState::Pending`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallRecord {
    /// Part discriminator, e.g. "tool-tavily_web_search" or "dynamic-tool"
    #[serde(rename = "type", default, deserialize_with = "deserialize_type")]
    pub tool_type: String,
    /// Tool name; absent for tools that are named by their type alone
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub tool_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_state")]
    pub state: ToolCallState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(
        default,
        deserialize_with = "deserialize_lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub error_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
}

/// Free-form message metadata.
///
/// The backend attaches the mode used, tool-call records, sources and
/// whatever else it grows in the future. The object is kept verbatim so it
/// can be passed through to the UI untouched; typed views are read on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageMetadata(pub Map<String, Value>);

impl MessageMetadata {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    /// Mode the server ran this message under, if recorded and valid.
    pub fn operational_mode(&self) -> Option<OperationalMode> {
        self.0
            .get("operationalMode")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }

    /// Tool-call records in backend order, one per entry.
    ///
    /// A missing or non-array `toolCalls` field yields an empty list. An entry
    /// that is not an object yields an empty pending record.
    pub fn tool_calls(&self) -> Vec<ToolCallRecord> {
        let Some(Value::Array(entries)) = self.0.get("toolCalls") else {
            return Vec::new();
        };

        entries
            .iter()
            .map(|entry| {
                serde_json::from_value(entry.clone()).unwrap_or_else(|e| {
                    tracing::debug!(error = %e, "Tool call record is not an object");
                    ToolCallRecord::default()
                })
            })
            .collect()
    }
}

/// A message record as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub role: MessageRole,
    /// Message text; the backend may send null
    #[serde(default)]
    pub content: Option<String>,
    /// ISO-8601 creation time, kept as sent
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl Message {
    /// Create a user message stamped with the current time.
    pub fn user(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: MessageRole::User,
            content: Some(content.into()),
            created_at: Utc::now().to_rfc3339(),
            metadata: None,
        }
    }

    /// Parsed creation time, if `created_at` is valid RFC 3339.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
