//! Message and part rendering
//!
//! Everything here produces owned `Line<'static>`s so callers can cache the
//! result or hand it straight to a `Paragraph`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::citations::ExpandedCitations;
use crate::models::{MessageRole, Part, ToolCallPart, ToolCallState, UiMessage};
use crate::search::parse_tool_output;

use super::mode::render_mode_indicator;
use super::sources::{render_sources, render_summary};
use super::theme::{COLOR_ACCENT, COLOR_DIM, COLOR_MUTED, COLOR_USER};
use super::time::format_relative_str;
use super::tool_status::{is_expandable, render_tool_strip};

/// Per-part interaction state
#[derive(Debug, Clone, Default)]
pub struct PartViewState {
    /// Source list under the tool strip is open
    pub sources_expanded: bool,
    /// Citations opened in the summary
    pub citations: ExpandedCitations,
}

/// Interaction state for one message, keyed by part index.
#[derive(Debug, Clone, Default)]
pub struct MessageViewState {
    parts: HashMap<usize, PartViewState>,
}

impl MessageViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn part(&self, index: usize) -> Option<&PartViewState> {
        self.parts.get(&index)
    }

    pub fn part_mut(&mut self, index: usize) -> &mut PartViewState {
        self.parts.entry(index).or_default()
    }

    /// Flip the source list of a part. Returns the new state.
    pub fn toggle_sources(&mut self, index: usize) -> bool {
        let part = self.part_mut(index);
        part.sources_expanded = !part.sources_expanded;
        part.sources_expanded
    }

    /// Flip one citation preview of a part. Returns the new state.
    pub fn toggle_citation(&mut self, index: usize, source_index: usize) -> bool {
        self.part_mut(index).citations.toggle(source_index)
    }
}

/// Render one part of a message body.
pub fn render_part(part: &Part, state: Option<&PartViewState>) -> Vec<Line<'static>> {
    match part {
        Part::Text { text } => render_text(text),
        Part::ToolCall(call) => render_tool_call(call, state),
    }
}

fn render_text(text: &str) -> Vec<Line<'static>> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| {
            Line::from(Span::styled(
                line.to_string(),
                Style::default().fg(COLOR_ACCENT),
            ))
        })
        .collect()
}

fn render_tool_call(call: &ToolCallPart, state: Option<&PartViewState>) -> Vec<Line<'static>> {
    let parsed = parse_tool_output(call.payload.output());
    let sources_expanded = state.map(|s| s.sources_expanded).unwrap_or(false);

    let mut lines = render_tool_strip(call, &parsed, sources_expanded);

    if sources_expanded && is_expandable(call, &parsed) {
        lines.extend(render_sources(&parsed.sources));
    }

    if call.state() == ToolCallState::OutputAvailable && !parsed.sources.is_empty() {
        if let Some(summary) = &parsed.summary {
            let empty = ExpandedCitations::new();
            let citations = state.map(|s| &s.citations).unwrap_or(&empty);
            lines.extend(render_summary(summary, &parsed.sources, citations));
        }
    }

    lines
}

/// Render a whole message: role header, parts, then the footer.
///
/// Assistant footers carry the mode badge; both roles show a relative
/// timestamp when `createdAt` is present.
pub fn render_message(
    message: &UiMessage,
    state: &MessageViewState,
    now: DateTime<Utc>,
) -> Vec<Line<'static>> {
    let (label, color) = match message.role {
        MessageRole::User => ("You", COLOR_USER),
        MessageRole::Assistant => ("Assistant", COLOR_ACCENT),
        MessageRole::System => ("System", COLOR_DIM),
    };

    let mut lines = vec![Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];

    for (index, part) in message.parts.iter().enumerate() {
        lines.extend(render_part(part, state.part(index)));
    }

    let mut footer: Vec<Span<'static>> = Vec::new();
    if message.role == MessageRole::Assistant {
        if let Some(badge) = render_mode_indicator(message) {
            footer.extend(badge);
        }
    }
    if let Some(time) = message
        .created_at()
        .and_then(|ts| format_relative_str(ts, now))
    {
        if !footer.is_empty() {
            footer.push(Span::styled(" \u{00B7} ", Style::default().fg(COLOR_DIM)));
        }
        footer.push(Span::styled(time, Style::default().fg(COLOR_MUTED)));
    }
    if !footer.is_empty() {
        lines.push(Line::from(footer));
    }

    lines
}

/// Plain text of a message, text parts only.
pub fn message_text(message: &UiMessage) -> String {
    message.text()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ToolPayload;
    use chrono::TimeZone;
    use serde_json::json;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn search_part(output: serde_json::Value) -> Part {
        Part::ToolCall(ToolCallPart {
            tool_type: "tool-tavily_web_search".to_string(),
            tool_name: None,
            payload: ToolPayload::OutputAvailable {
                output: Some(output),
            },
            args: None,
        })
    }

    fn search_output() -> serde_json::Value {
        json!({
            "results": [
                {"title": "Rust", "url": "https://www.rust-lang.org", "snippet": "A language", "relevanceScore": 0.92},
                {"title": "Docs", "url": "https://docs.rs"}
            ],
            "summary": "Rust is fast [1].",
            "citations": []
        })
    }

    #[test]
    fn test_text_part_lines() {
        let lines = render_part(&Part::text("one\ntwo"), None);
        assert_eq!(plain(&lines), vec!["one", "two"]);
        assert!(render_part(&Part::text(""), None).is_empty());
    }

    #[test]
    fn test_collapsed_search_shows_strip_and_summary() {
        let lines = render_part(&search_part(search_output()), None);
        let text = plain(&lines).join("\n");
        assert!(text.contains("Found 2 sources"));
        assert!(text.contains("Summary \u{2022} 2 sources"));
        assert!(text.contains("Rust is fast [1]."));
        assert!(!text.contains("All Sources:"));
    }

    #[test]
    fn test_expanded_search_lists_sources() {
        let mut state = MessageViewState::new();
        assert!(state.toggle_sources(0));
        assert!(state.toggle_citation(0, 0));

        let lines = render_part(&search_part(search_output()), state.part(0));
        let text = plain(&lines).join("\n");
        assert!(text.contains("All Sources:"));
        assert!(text.contains("docs.rs"));
        assert!(text.contains("92% match"));
    }

    #[test]
    fn test_summary_hidden_without_sources() {
        let output = json!({"results": [], "summary": "Nothing [1]", "citations": []});
        let text = plain(&render_part(&search_part(output), None)).join("\n");
        assert!(text.contains("Found 0 sources"));
        assert!(!text.contains("Summary"));
    }

    #[test]
    fn test_assistant_footer() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut message = UiMessage::user_text("a1", "Hello");
        message.role = MessageRole::Assistant;
        message
            .metadata
            .insert("effectiveMode".to_string(), json!("fast"));
        message
            .metadata
            .insert("wasAutoSelected".to_string(), json!(true));
        message
            .metadata
            .insert("createdAt".to_string(), json!("2024-05-01T11:55:00Z"));

        let lines = plain(&render_message(&message, &MessageViewState::new(), now));
        assert_eq!(lines[0], "Assistant");
        assert_eq!(lines[1], "Hello");
        assert!(lines[2].contains("Fast (Auto)"));
        assert!(lines[2].ends_with("5m ago"));
    }

    #[test]
    fn test_user_message_has_no_badge() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut message = UiMessage::user_text("u1", "Hi");
        message
            .metadata
            .insert("effectiveMode".to_string(), json!("thinking"));

        let lines = plain(&render_message(&message, &MessageViewState::new(), now));
        assert_eq!(lines, vec!["You", "Hi"]);
        assert_eq!(message_text(&message), "Hi");
    }
}
