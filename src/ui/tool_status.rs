//! Tool-call status strip
//!
//! Renders one line per tool call with an icon, a color-coded status glyph
//! and a status text. Successful searches can be expanded to show sources.
//!
//! # Display format
//! - Pending: `○ Web Search  Searching the web...` (gray)
//! - Success: `✓ Web Search  Found 3 sources ▸` (green)
//! - Failed:  `✗ Web Search  Search failed` (red), then the error text

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::models::{ToolCallPart, ToolCallState};
use crate::search::ParsedToolOutput;

use super::theme::{
    COLOR_ACCENT, COLOR_DIM, COLOR_TOOL_ERROR, COLOR_TOOL_ICON, COLOR_TOOL_RUNNING,
    COLOR_TOOL_SUCCESS,
};

const WEB_SEARCH_LABEL: &str = "Web Search";

/// Display status of a tool call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolStatus {
    Running,
    Success,
    Failed,
}

impl From<ToolCallState> for ToolStatus {
    fn from(state: ToolCallState) -> Self {
        match state {
            ToolCallState::Pending => ToolStatus::Running,
            ToolCallState::OutputAvailable => ToolStatus::Success,
            ToolCallState::OutputError => ToolStatus::Failed,
        }
    }
}

/// Tool name, falling back to the type with its `tool-` prefix removed.
fn tool_name(part: &ToolCallPart) -> Option<&str> {
    part.tool_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .or_else(|| part.tool_type.strip_prefix("tool-"))
}

/// Whether a tool call is a web search.
///
/// A `dynamic-tool` without a name is treated as one.
pub fn is_web_search(part: &ToolCallPart) -> bool {
    match tool_name(part) {
        Some(name) => name.ends_with("web_search"),
        None => part.tool_type == "dynamic-tool",
    }
}

/// Label shown on the strip
pub fn tool_label(part: &ToolCallPart) -> String {
    if is_web_search(part) {
        return WEB_SEARCH_LABEL.to_string();
    }
    tool_name(part).unwrap_or(&part.tool_type).to_string()
}

/// Status text for a tool call; `parsed` supplies the source count.
pub fn status_text(part: &ToolCallPart, parsed: &ParsedToolOutput) -> String {
    let search = is_web_search(part);
    match (ToolStatus::from(part.state()), search) {
        (ToolStatus::Running, true) => "Searching the web...".to_string(),
        (ToolStatus::Success, true) => format!("Found {} sources", parsed.sources.len()),
        (ToolStatus::Failed, true) => "Search failed".to_string(),
        (ToolStatus::Running, false) => "Running...".to_string(),
        (ToolStatus::Success, false) => "Done".to_string(),
        (ToolStatus::Failed, false) => "Failed".to_string(),
    }
}

/// Whether the strip offers an expandable source list.
pub fn is_expandable(part: &ToolCallPart, parsed: &ParsedToolOutput) -> bool {
    part.state() == ToolCallState::OutputAvailable && !parsed.sources.is_empty()
}

/// Render the status strip, plus the error text for failed calls.
pub fn render_tool_strip(
    part: &ToolCallPart,
    parsed: &ParsedToolOutput,
    expanded: bool,
) -> Vec<Line<'static>> {
    let status = ToolStatus::from(part.state());
    let (glyph, color) = match status {
        ToolStatus::Running => ("\u{25CB}", COLOR_TOOL_RUNNING),
        ToolStatus::Success => ("\u{2713}", COLOR_TOOL_SUCCESS),
        ToolStatus::Failed => ("\u{2717}", COLOR_TOOL_ERROR),
    };

    let mut spans = vec![
        Span::raw("  "),
        Span::styled(format!("{} ", glyph), Style::default().fg(color)),
        Span::styled(
            tool_label(part),
            Style::default()
                .fg(COLOR_TOOL_ICON)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", status_text(part, parsed)),
            Style::default().fg(color),
        ),
    ];
    if is_expandable(part, parsed) {
        let arrow = if expanded { " \u{25BE}" } else { " \u{25B8}" };
        spans.push(Span::styled(arrow, Style::default().fg(COLOR_DIM)));
    }

    let mut lines = vec![Line::from(spans)];

    if let Some(error) = part.payload.error_text().filter(|e| !e.is_empty()) {
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(error.to_string(), Style::default().fg(COLOR_TOOL_ERROR)),
        ]));
    } else if status == ToolStatus::Failed {
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled("No details available", Style::default().fg(COLOR_ACCENT)),
        ]));
    }

    lines
}
