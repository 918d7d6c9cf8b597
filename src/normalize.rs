//! Backend message records to render-ready messages.
//!
//! Every message maps to exactly one leading text part followed by one
//! tool-call part per backend tool-call record, in backend order. Metadata is
//! passed through untouched on top of the message's `createdAt`.

use serde_json::{Map, Value};

use crate::models::{
    Message, Part, ToolCallPart, ToolCallRecord, ToolCallState, ToolPayload, UiMessage,
};

/// Convert one backend message into a [`UiMessage`].
pub fn to_ui_message(message: &Message) -> UiMessage {
    let mut parts = Vec::with_capacity(1);
    parts.push(Part::text(message.content.clone().unwrap_or_default()));

    if let Some(metadata) = &message.metadata {
        parts.extend(
            metadata
                .tool_calls()
                .into_iter()
                .map(|record| Part::ToolCall(to_tool_part(record))),
        );
    }

    let mut merged = Map::new();
    merged.insert(
        "createdAt".to_string(),
        Value::String(message.created_at.clone()),
    );
    if let Some(metadata) = &message.metadata {
        // Last write wins: a createdAt inside metadata replaces the one above
        for (key, value) in metadata.as_map() {
            merged.insert(key.clone(), value.clone());
        }
    }

    UiMessage {
        id: message.id.clone(),
        role: message.role,
        parts,
        metadata: merged,
    }
}

/// Convert a list of backend messages. An absent list yields an empty one.
pub fn to_ui_messages(messages: Option<&[Message]>) -> Vec<UiMessage> {
    messages
        .map(|messages| messages.iter().map(to_ui_message).collect())
        .unwrap_or_default()
}

fn to_tool_part(record: ToolCallRecord) -> ToolCallPart {
    let payload = match record.state {
        ToolCallState::Pending => ToolPayload::Pending,
        ToolCallState::OutputAvailable => ToolPayload::OutputAvailable {
            output: record.output.filter(|v| !v.is_null()),
        },
        ToolCallState::OutputError => ToolPayload::OutputError {
            error_text: record.error_text.filter(|t| !t.is_empty()),
        },
    };

    ToolCallPart {
        tool_type: record.tool_type,
        tool_name: record.tool_name.filter(|n| !n.is_empty()),
        payload,
        args: record.args.filter(|v| !v.is_null()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageMetadata, MessageRole};
    use serde_json::json;

    fn message(content: Option<&str>, metadata: Option<Value>) -> Message {
        Message {
            id: "m1".to_string(),
            role: MessageRole::Assistant,
            content: content.map(str::to_string),
            created_at: "2024-05-01T10:00:00Z".to_string(),
            metadata: metadata.map(|v| serde_json::from_value::<MessageMetadata>(v).unwrap()),
        }
    }

    #[test]
    fn test_null_content_yields_empty_text_part() {
        let ui = to_ui_message(&message(None, None));
        assert_eq!(ui.parts, vec![Part::text("")]);
        assert_eq!(
            serde_json::to_value(&ui.parts[0]).unwrap(),
            json!({"type": "text", "text": ""})
        );
    }

    #[test]
    fn test_text_part_always_first() {
        let ui = to_ui_message(&message(
            Some("Answer"),
            Some(json!({"toolCalls": [{"type": "dynamic-tool", "state": "pending"}]})),
        ));
        assert_eq!(ui.parts.len(), 2);
        assert_eq!(ui.parts[0], Part::text("Answer"));
    }

    #[test]
    fn test_two_tool_calls_in_order_with_state_payloads() {
        let ui = to_ui_message(&message(
            Some("Here you go"),
            Some(json!({
                "toolCalls": [
                    {
                        "type": "tool-tavily_web_search",
                        "state": "pending",
                        "output": {"ignored": true},
                        "errorText": "ignored too"
                    },
                    {
                        "type": "dynamic-tool",
                        "toolName": "web_search",
                        "state": "output-error",
                        "output": {"ignored": true},
                        "errorText": "rate limited"
                    }
                ]
            })),
        ));

        assert_eq!(ui.parts.len(), 3);

        let Part::ToolCall(first) = &ui.parts[1] else {
            panic!("expected tool call part");
        };
        assert_eq!(first.tool_type, "tool-tavily_web_search");
        assert_eq!(first.payload, ToolPayload::Pending);
        assert_eq!(first.tool_name, None);

        let Part::ToolCall(second) = &ui.parts[2] else {
            panic!("expected tool call part");
        };
        assert_eq!(second.tool_name.as_deref(), Some("web_search"));
        assert_eq!(
            second.payload,
            ToolPayload::OutputError {
                error_text: Some("rate limited".to_string())
            }
        );

        let pending = serde_json::to_value(&ui.parts[1]).unwrap();
        assert!(pending.get("output").is_none());
        assert!(pending.get("errorText").is_none());
    }

    #[test]
    fn test_ill_typed_tool_calls_still_yield_parts() {
        let ui = to_ui_message(&message(
            Some("Searching"),
            Some(json!({
                "toolCalls": [
                    {"type": "tool-tavily_web_search", "state": "output-error", "errorText": {"code": 429}},
                    {"type": "dynamic-tool", "toolName": 7, "state": "pending"},
                    {"type": "tool-tavily_web_search", "state": "output-available", "output": {"results": []}}
                ]
            })),
        ));

        assert_eq!(ui.parts.len(), 4);

        let Part::ToolCall(failed) = &ui.parts[1] else {
            panic!("expected tool call part");
        };
        assert_eq!(failed.payload, ToolPayload::OutputError { error_text: None });

        let Part::ToolCall(unnamed) = &ui.parts[2] else {
            panic!("expected tool call part");
        };
        assert_eq!(unnamed.tool_type, "dynamic-tool");
        assert_eq!(unnamed.tool_name, None);
    }

    #[test]
    fn test_unknown_state_reads_as_pending() {
        let ui = to_ui_message(&message(
            None,
            Some(json!({"toolCalls": [{"type": "tool-x", "state": "streaming-input"}]})),
        ));
        let Part::ToolCall(call) = &ui.parts[1] else {
            panic!("expected tool call part");
        };
        assert_eq!(call.payload, ToolPayload::Pending);
        assert_eq!(call.tool_type, "tool-x");
    }

    #[test]
    fn test_output_available_without_output_carries_nothing() {
        let ui = to_ui_message(&message(
            Some(""),
            Some(json!({"toolCalls": [{"type": "dynamic-tool", "state": "output-available"}]})),
        ));
        let Part::ToolCall(call) = &ui.parts[1] else {
            panic!("expected tool call part");
        };
        assert_eq!(call.payload, ToolPayload::OutputAvailable { output: None });
        assert_eq!(call.state(), ToolCallState::OutputAvailable);
    }

    #[test]
    fn test_args_are_copied() {
        let ui = to_ui_message(&message(
            Some(""),
            Some(json!({"toolCalls": [{
                "type": "dynamic-tool",
                "state": "output-available",
                "output": {"results": []},
                "args": {"query": "weather"}
            }]})),
        ));
        let Part::ToolCall(call) = &ui.parts[1] else {
            panic!("expected tool call part");
        };
        assert_eq!(call.args, Some(json!({"query": "weather"})));
        assert_eq!(call.payload.output(), Some(&json!({"results": []})));
    }

    #[test]
    fn test_metadata_passthrough_and_created_at() {
        let ui = to_ui_message(&message(
            Some("x"),
            Some(json!({
                "operationalMode": "fast",
                "sources": [{"url": "http://a"}],
                "futureField": 3
            })),
        ));

        assert_eq!(ui.created_at(), Some("2024-05-01T10:00:00Z"));
        assert_eq!(ui.metadata["operationalMode"], "fast");
        assert_eq!(ui.metadata["sources"], json!([{"url": "http://a"}]));
        assert_eq!(ui.metadata["futureField"], 3);
    }

    #[test]
    fn test_metadata_created_at_overrides() {
        let ui = to_ui_message(&message(
            Some("x"),
            Some(json!({"createdAt": "2030-01-01T00:00:00Z"})),
        ));
        assert_eq!(ui.created_at(), Some("2030-01-01T00:00:00Z"));
    }

    #[test]
    fn test_absent_list_maps_to_empty() {
        assert!(to_ui_messages(None).is_empty());
        assert!(to_ui_messages(Some(&[][..])).is_empty());
    }

    #[test]
    fn test_batch_preserves_order() {
        let mut second = message(Some("b"), None);
        second.id = "m2".to_string();
        let messages = vec![message(Some("a"), None), second];

        let ui = to_ui_messages(Some(messages.as_slice()));
        assert_eq!(
            ui.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(),
            vec!["m1", "m2"]
        );
    }
}
